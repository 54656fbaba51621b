//! In-process store used by the service tests. A transaction works on a
//! copy of the shared state that is written back on commit.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::core::models::{
    comment::{Comment, Insert as CommentInsert, Update as CommentUpdate},
    common::Pagination,
    membership::{Insert as MembershipInsert, MemberDetail, Membership, Role},
    organization::{ImpactDocument, Insert as OrganizationInsert, NorthStarDocument, Organization, Update as OrganizationUpdate},
    photo::{Insert as PhotoInsert, Photo, Update as PhotoUpdate},
    post::{Insert as PostInsert, Post, PostOwner, PostScope, Update as PostUpdate},
    profile::{Profile, Query as ProfileQuery, Update as ProfileUpdate},
    reaction::{ReactionTarget, ReactionType, Reactor},
    social::{FollowEdge, FollowTarget},
};
use crate::core::ports::repository::{
    BookmarkCommon, CommentCommon, Common, DocumentCommon, FollowCommon, MembershipCommon, OrganizationCommon, PhotoCommon, PostCommon,
    ProfileCommon, ReactionCommon, Store, TxStore,
};
use crate::core::services::organization::slugify;
use crate::error::Error;

#[derive(Debug, Clone)]
pub struct ReactionRow {
    pub target: ReactionTarget,
    pub user_id: Uuid,
    pub reaction_type: ReactionType,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub profiles: Vec<Profile>,
    pub organizations: Vec<Organization>,
    pub focus_areas: HashMap<i32, Vec<String>>,
    pub memberships: Vec<Membership>,
    pub follows: Vec<FollowEdge>,
    pub bookmarks: Vec<(Uuid, i32)>,
    pub posts: HashMap<(PostScope, i32), Post>,
    pub comments: HashMap<(PostScope, i32), Comment>,
    pub reactions: Vec<ReactionRow>,
    pub photos: Vec<Photo>,
    pub impact: HashMap<i32, ImpactDocument>,
    pub north_star: HashMap<i32, NorthStarDocument>,
    pub next_id: i32,
    pub likes_count_refreshes: usize,
    pub comment_count_refreshes: usize,
    pub post_locks: Vec<(PostScope, i32)>,
    pub organization_locks: Vec<i32>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn profile(&self, id: Uuid) -> Result<&Profile, Error> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("profile(id: {})", id)))
    }

    fn organization(&self, id: i32) -> Result<&Organization, Error> {
        self.organizations
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::NotFound(format!("organization(id: {})", id)))
    }

    fn profiles_by_id(&self, ids: impl IntoIterator<Item = Uuid>) -> Vec<Profile> {
        ids.into_iter().filter_map(|id| self.profile(id).ok().cloned()).collect()
    }

    fn remove_post_rows(&mut self, scope: PostScope, id: i32) {
        self.posts.remove(&(scope, id));
        let comment_ids: Vec<i32> = self
            .comments
            .iter()
            .filter(|((s, _), c)| *s == scope && c.post_id == id)
            .map(|((_, comment_id), _)| *comment_id)
            .collect();
        for comment_id in comment_ids {
            self.remove_comment_rows(scope, comment_id);
        }
        self.reactions.retain(|r| r.target != ReactionTarget::post(scope, id));
    }

    fn remove_comment_rows(&mut self, scope: PostScope, id: i32) {
        self.comments.remove(&(scope, id));
        self.reactions.retain(|r| r.target != ReactionTarget::comment(scope, id));
    }
}

pub struct MemoryStore {
    shared: Rc<RefCell<State>>,
    state: State,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(State::default())),
            state: State::default(),
        }
    }

    pub fn tx(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            state: self.shared.borrow().clone(),
        }
    }

    /// Committed state.
    pub fn snapshot(&self) -> State {
        self.shared.borrow().clone()
    }

    pub fn seed_profile(&self, full_name: &str, is_omega_admin: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.shared.borrow_mut().profiles.push(Profile {
            id,
            full_name: full_name.into(),
            is_omega_admin,
            ..Default::default()
        });
        id
    }

    /// Creates an organization with `owner` as its super admin.
    pub fn seed_organization(&self, name: &str, owner: Uuid) -> i32 {
        let mut state = self.shared.borrow_mut();
        let id = state.next_id();
        let now = Utc::now();
        state.organizations.push(Organization {
            id,
            slug: slugify(name),
            name: name.into(),
            org_type: "nonprofit".into(),
            description: None,
            mission: None,
            image_url: None,
            banner_image_url: None,
            mission_image_url: None,
            location: None,
            website: None,
            year_founded: None,
            ein: None,
            created_at: now,
            updated_at: now,
        });
        state.memberships.push(Membership {
            organization_id: id,
            profile_id: owner,
            role: Role::SuperAdmin,
            joined_at: now,
            is_public: true,
        });
        id
    }

    pub fn seed_membership(&self, organization_id: i32, profile_id: Uuid, role: Role) {
        self.shared.borrow_mut().memberships.push(Membership {
            organization_id,
            profile_id,
            role,
            joined_at: Utc::now(),
            is_public: true,
        });
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ProfileCommon for MemoryStore {
    async fn get(&mut self, id: Uuid) -> Result<Profile, Error> {
        self.state.profile(id).cloned()
    }

    async fn exists(&mut self, id: Uuid) -> Result<bool, Error> {
        Ok(self.state.profile(id).is_ok())
    }

    async fn query(&mut self, query: &ProfileQuery, pagination: Pagination) -> Result<Vec<Profile>, Error> {
        let mut list: Vec<Profile> = self
            .state
            .profiles
            .iter()
            .filter(|p| query.exclude_id != Some(p.id))
            .filter(|p| query.name_like.as_deref().map_or(true, |n| contains_ci(&p.full_name, n)))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(pagination.apply(list))
    }

    async fn count(&mut self, query: &ProfileQuery) -> Result<i64, Error> {
        Ok(ProfileCommon::query(self, query, Pagination::new(i64::MAX, None)).await?.len() as i64)
    }

    async fn update(&mut self, id: Uuid, data: ProfileUpdate) -> Result<(), Error> {
        let profile = self
            .state
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("profile(id: {})", id)))?;
        profile.full_name = data.full_name;
        profile.avatar_url = data.avatar_url;
        profile.role = data.role;
        profile.organization_name = data.organization_name;
        profile.title = data.title;
        profile.bio = data.bio;
        Ok(())
    }

    async fn search(&mut self, term: &str, limit: i64) -> Result<Vec<Profile>, Error> {
        let query = ProfileQuery {
            name_like: Some(term.to_owned()),
            exclude_id: None,
        };
        ProfileCommon::query(self, &query, Pagination::new(limit, None)).await
    }
}

impl OrganizationCommon for MemoryStore {
    async fn insert(&mut self, data: OrganizationInsert) -> Result<i32, Error> {
        if self.state.organizations.iter().any(|o| o.slug == data.slug) {
            return Err(Error::BusinessError(format!("organization which has the same slug already exists(slug: {})", data.slug)));
        }
        let id = self.state.next_id();
        let now = Utc::now();
        self.state.organizations.push(Organization {
            id,
            slug: data.slug,
            name: data.name,
            org_type: data.org_type,
            description: data.description,
            mission: None,
            image_url: None,
            banner_image_url: None,
            mission_image_url: None,
            location: data.location,
            website: data.website,
            year_founded: None,
            ein: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Organization, Error> {
        self.state.organization(id).cloned()
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Organization, Error> {
        let org = self.state.organization(id).cloned()?;
        self.state.organization_locks.push(id);
        Ok(org)
    }

    async fn get_by_slug(&mut self, slug: &str) -> Result<Option<Organization>, Error> {
        Ok(self.state.organizations.iter().find(|o| o.slug == slug).cloned())
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        Ok(self.state.organization(id).is_ok())
    }

    async fn slug_exists(&mut self, slug: &str) -> Result<bool, Error> {
        Ok(self.state.organizations.iter().any(|o| o.slug == slug))
    }

    async fn update(&mut self, id: i32, data: OrganizationUpdate) -> Result<(), Error> {
        let org = self
            .state
            .organizations
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::NotFound(format!("organization(id: {})", id)))?;
        org.name = data.name;
        org.org_type = data.org_type;
        org.description = data.description;
        org.mission = data.mission;
        org.image_url = data.image_url;
        org.banner_image_url = data.banner_image_url;
        org.mission_image_url = data.mission_image_url;
        org.location = data.location;
        org.website = data.website;
        org.year_founded = data.year_founded;
        org.ein = data.ein;
        org.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let state = &mut self.state;
        state.organizations.retain(|o| o.id != id);
        state.focus_areas.remove(&id);
        state.memberships.retain(|m| m.organization_id != id);
        state.follows.retain(|f| f.target != FollowTarget::Organization(id));
        state.bookmarks.retain(|(_, org)| *org != id);
        state.photos.retain(|p| p.organization_id != id);
        state.impact.remove(&id);
        state.north_star.remove(&id);
        let post_ids: Vec<i32> = state
            .posts
            .iter()
            .filter(|((scope, _), p)| *scope == PostScope::Organization && p.organization_id == Some(id))
            .map(|((_, post_id), _)| *post_id)
            .collect();
        for post_id in post_ids {
            state.remove_post_rows(PostScope::Organization, post_id);
        }
        Ok(())
    }

    async fn search(&mut self, term: &str, limit: i64) -> Result<Vec<Organization>, Error> {
        let mut list: Vec<Organization> = self.state.organizations.iter().filter(|o| contains_ci(&o.name, term)).cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Pagination::new(limit, None).apply(list))
    }

    async fn focus_areas(&mut self, id: i32) -> Result<Vec<String>, Error> {
        Ok(self.state.focus_areas.get(&id).cloned().unwrap_or_default())
    }

    async fn replace_focus_areas(&mut self, id: i32, areas: Vec<String>) -> Result<(), Error> {
        self.state.focus_areas.insert(id, areas);
        Ok(())
    }
}

impl MembershipCommon for MemoryStore {
    async fn insert(&mut self, data: MembershipInsert) -> Result<(), Error> {
        self.state.memberships.push(Membership {
            organization_id: data.organization_id,
            profile_id: data.profile_id,
            role: data.role,
            joined_at: Utc::now(),
            is_public: data.is_public,
        });
        Ok(())
    }

    async fn get(&mut self, organization_id: i32, profile_id: Uuid) -> Result<Option<Membership>, Error> {
        Ok(self
            .state
            .memberships
            .iter()
            .find(|m| m.organization_id == organization_id && m.profile_id == profile_id)
            .cloned())
    }

    async fn query(&mut self, organization_id: i32) -> Result<Vec<MemberDetail>, Error> {
        let mut list: Vec<MemberDetail> = self
            .state
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .filter_map(|m| {
                let p = self.state.profile(m.profile_id).ok()?;
                Some(MemberDetail {
                    profile_id: p.id,
                    full_name: p.full_name.clone(),
                    avatar_url: p.avatar_url.clone(),
                    title: p.title.clone(),
                    role: m.role,
                    joined_at: m.joined_at,
                    is_public: m.is_public,
                })
            })
            .collect();
        list.sort_by_key(|m| (Reverse(m.role), m.joined_at));
        Ok(list)
    }

    async fn count(&mut self, organization_id: i32) -> Result<i64, Error> {
        Ok(self.state.memberships.iter().filter(|m| m.organization_id == organization_id).count() as i64)
    }

    async fn count_role(&mut self, organization_id: i32, role: Role) -> Result<i64, Error> {
        Ok(self
            .state
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id && m.role == role)
            .count() as i64)
    }

    async fn update_role(&mut self, organization_id: i32, profile_id: Uuid, role: Role) -> Result<(), Error> {
        for m in self.state.memberships.iter_mut() {
            if m.organization_id == organization_id && m.profile_id == profile_id {
                m.role = role;
            }
        }
        Ok(())
    }

    async fn update_visibility(&mut self, organization_id: i32, profile_id: Uuid, is_public: bool) -> Result<(), Error> {
        for m in self.state.memberships.iter_mut() {
            if m.organization_id == organization_id && m.profile_id == profile_id {
                m.is_public = is_public;
            }
        }
        Ok(())
    }

    async fn delete(&mut self, organization_id: i32, profile_id: Uuid) -> Result<(), Error> {
        self.state
            .memberships
            .retain(|m| !(m.organization_id == organization_id && m.profile_id == profile_id));
        Ok(())
    }
}

impl FollowCommon for MemoryStore {
    async fn insert(&mut self, edge: &FollowEdge) -> Result<bool, Error> {
        if self.state.follows.contains(edge) {
            return Ok(false);
        }
        self.state.follows.push(edge.clone());
        Ok(true)
    }

    async fn delete(&mut self, edge: &FollowEdge) -> Result<bool, Error> {
        let before = self.state.follows.len();
        self.state.follows.retain(|f| f != edge);
        Ok(self.state.follows.len() < before)
    }

    async fn exists(&mut self, edge: &FollowEdge) -> Result<bool, Error> {
        Ok(self.state.follows.contains(edge))
    }

    async fn count_followers(&mut self, target: FollowTarget) -> Result<i64, Error> {
        Ok(self.state.follows.iter().filter(|f| f.target == target).count() as i64)
    }

    async fn count_following(&mut self, follower_id: Uuid) -> Result<i64, Error> {
        Ok(self
            .state
            .follows
            .iter()
            .filter(|f| f.follower_id == follower_id && matches!(f.target, FollowTarget::Profile(_)))
            .count() as i64)
    }

    async fn followers(&mut self, target: FollowTarget, pagination: Pagination) -> Result<Vec<Profile>, Error> {
        let ids: Vec<Uuid> = self.state.follows.iter().rev().filter(|f| f.target == target).map(|f| f.follower_id).collect();
        Ok(pagination.apply(self.state.profiles_by_id(ids)))
    }

    async fn following(&mut self, follower_id: Uuid, pagination: Pagination) -> Result<Vec<Profile>, Error> {
        let ids: Vec<Uuid> = self
            .state
            .follows
            .iter()
            .rev()
            .filter(|f| f.follower_id == follower_id)
            .filter_map(|f| match f.target {
                FollowTarget::Profile(id) => Some(id),
                FollowTarget::Organization(_) => None,
            })
            .collect();
        Ok(pagination.apply(self.state.profiles_by_id(ids)))
    }

    async fn following_organizations(&mut self, follower_id: Uuid) -> Result<Vec<Organization>, Error> {
        Ok(self
            .state
            .follows
            .iter()
            .rev()
            .filter(|f| f.follower_id == follower_id)
            .filter_map(|f| match f.target {
                FollowTarget::Organization(id) => self.state.organization(id).ok().cloned(),
                FollowTarget::Profile(_) => None,
            })
            .collect())
    }

    async fn followed_among(&mut self, follower_id: Uuid, candidates: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        Ok(candidates
            .iter()
            .copied()
            .filter(|id| {
                self.state.follows.contains(&FollowEdge {
                    follower_id,
                    target: FollowTarget::Profile(*id),
                })
            })
            .collect())
    }
}

impl BookmarkCommon for MemoryStore {
    async fn insert(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error> {
        if self.state.bookmarks.contains(&(user_id, organization_id)) {
            return Ok(false);
        }
        self.state.bookmarks.push((user_id, organization_id));
        Ok(true)
    }

    async fn delete(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error> {
        let before = self.state.bookmarks.len();
        self.state.bookmarks.retain(|b| *b != (user_id, organization_id));
        Ok(self.state.bookmarks.len() < before)
    }

    async fn exists(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error> {
        Ok(self.state.bookmarks.contains(&(user_id, organization_id)))
    }

    async fn count(&mut self, user_id: Uuid) -> Result<i64, Error> {
        Ok(self.state.bookmarks.iter().filter(|(u, _)| *u == user_id).count() as i64)
    }

    async fn query(&mut self, user_id: Uuid, pagination: Pagination) -> Result<Vec<Organization>, Error> {
        let list: Vec<Organization> = self
            .state
            .bookmarks
            .iter()
            .rev()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, org)| self.state.organization(*org).ok().cloned())
            .collect();
        Ok(pagination.apply(list))
    }
}

impl PostCommon for MemoryStore {
    async fn insert(&mut self, data: PostInsert) -> Result<i32, Error> {
        let id = self.state.next_id();
        let now = Utc::now();
        let organization_id = match data.owner {
            PostOwner::Profile(_) => None,
            PostOwner::Organization(org) => Some(org),
        };
        self.state.posts.insert(
            (data.owner.scope(), id),
            Post {
                id,
                author_id: data.author_id,
                organization_id,
                content: data.content,
                image_urls: data.image_urls,
                tags: Json(data.tags),
                likes_count: 0,
                comments_count: 0,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn get(&mut self, scope: PostScope, id: i32) -> Result<Post, Error> {
        self.state
            .posts
            .get(&(scope, id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))
    }

    async fn get_for_update(&mut self, scope: PostScope, id: i32) -> Result<Post, Error> {
        let post = PostCommon::get(self, scope, id).await?;
        self.state.post_locks.push((scope, id));
        Ok(post)
    }

    async fn query(&mut self, owner: PostOwner, pagination: Pagination) -> Result<Vec<Post>, Error> {
        let mut list: Vec<Post> = self
            .state
            .posts
            .iter()
            .filter(|((scope, _), p)| match owner {
                PostOwner::Profile(uid) => *scope == PostScope::Personal && p.author_id == uid,
                PostOwner::Organization(org) => *scope == PostScope::Organization && p.organization_id == Some(org),
            })
            .map(|(_, p)| p.clone())
            .collect();
        list.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(pagination.apply(list))
    }

    async fn count(&mut self, owner: PostOwner) -> Result<i64, Error> {
        Ok(PostCommon::query(self, owner, Pagination::new(i64::MAX, None)).await?.len() as i64)
    }

    async fn update(&mut self, scope: PostScope, id: i32, data: PostUpdate) -> Result<(), Error> {
        let post = self
            .state
            .posts
            .get_mut(&(scope, id))
            .ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))?;
        post.content = data.content;
        post.image_urls = data.image_urls;
        post.tags = Json(data.tags);
        post.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&mut self, scope: PostScope, id: i32) -> Result<(), Error> {
        self.state.remove_post_rows(scope, id);
        Ok(())
    }

    async fn refresh_likes_count(&mut self, scope: PostScope, id: i32) -> Result<i32, Error> {
        self.state.likes_count_refreshes += 1;
        let target = ReactionTarget::post(scope, id);
        let count = self.state.reactions.iter().filter(|r| r.target == target).count() as i32;
        let post = self
            .state
            .posts
            .get_mut(&(scope, id))
            .ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))?;
        post.likes_count = count;
        Ok(count)
    }

    async fn refresh_comments_count(&mut self, scope: PostScope, id: i32) -> Result<i32, Error> {
        self.state.comment_count_refreshes += 1;
        let count = self.state.comments.iter().filter(|((s, _), c)| *s == scope && c.post_id == id).count() as i32;
        let post = self
            .state
            .posts
            .get_mut(&(scope, id))
            .ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))?;
        post.comments_count = count;
        Ok(count)
    }
}

impl CommentCommon for MemoryStore {
    async fn insert(&mut self, scope: PostScope, data: CommentInsert) -> Result<i32, Error> {
        let id = self.state.next_id();
        let now = Utc::now();
        let author = self.state.profile(data.author_id)?.clone();
        self.state.comments.insert(
            (scope, id),
            Comment {
                id,
                post_id: data.post_id,
                author_id: author.id,
                author_name: author.full_name,
                author_avatar_url: author.avatar_url,
                content: data.content,
                image_urls: data.image_urls,
                mentions: Json(data.mentions),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn get(&mut self, scope: PostScope, id: i32) -> Result<Comment, Error> {
        self.state
            .comments
            .get(&(scope, id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("comment(id: {})", id)))
    }

    async fn query(&mut self, scope: PostScope, post_id: i32) -> Result<Vec<Comment>, Error> {
        let mut list: Vec<Comment> = self
            .state
            .comments
            .iter()
            .filter(|((s, _), c)| *s == scope && c.post_id == post_id)
            .map(|(_, c)| c.clone())
            .collect();
        list.sort_by_key(|c| (c.created_at, c.id));
        Ok(list)
    }

    async fn update(&mut self, scope: PostScope, id: i32, data: CommentUpdate) -> Result<(), Error> {
        let comment = self
            .state
            .comments
            .get_mut(&(scope, id))
            .ok_or_else(|| Error::NotFound(format!("comment(id: {})", id)))?;
        comment.content = data.content;
        comment.image_urls = data.image_urls;
        comment.mentions = Json(data.mentions);
        comment.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&mut self, scope: PostScope, id: i32) -> Result<(), Error> {
        self.state.remove_comment_rows(scope, id);
        Ok(())
    }
}

impl ReactionCommon for MemoryStore {
    async fn upsert(&mut self, target: ReactionTarget, user_id: Uuid, reaction_type: ReactionType) -> Result<(), Error> {
        match self.state.reactions.iter_mut().find(|r| r.target == target && r.user_id == user_id) {
            Some(row) => row.reaction_type = reaction_type,
            None => self.state.reactions.push(ReactionRow {
                target,
                user_id,
                reaction_type,
            }),
        }
        Ok(())
    }

    async fn delete(&mut self, target: ReactionTarget, user_id: Uuid) -> Result<bool, Error> {
        let before = self.state.reactions.len();
        self.state.reactions.retain(|r| !(r.target == target && r.user_id == user_id));
        Ok(self.state.reactions.len() < before)
    }

    async fn get(&mut self, target: ReactionTarget, user_id: Uuid) -> Result<Option<ReactionType>, Error> {
        Ok(self
            .state
            .reactions
            .iter()
            .find(|r| r.target == target && r.user_id == user_id)
            .map(|r| r.reaction_type))
    }

    async fn query(&mut self, target: ReactionTarget) -> Result<Vec<Reactor>, Error> {
        Ok(self
            .state
            .reactions
            .iter()
            .rev()
            .filter(|r| r.target == target)
            .map(|r| {
                let profile = self.state.profile(r.user_id).ok();
                Reactor {
                    user_id: r.user_id,
                    full_name: profile.map(|p| p.full_name.clone()).unwrap_or_default(),
                    avatar_url: profile.and_then(|p| p.avatar_url.clone()),
                    reaction_type: r.reaction_type,
                }
            })
            .collect())
    }
}

impl PhotoCommon for MemoryStore {
    async fn insert(&mut self, data: PhotoInsert) -> Result<i32, Error> {
        let id = self.state.next_id();
        self.state.photos.push(Photo {
            id,
            organization_id: data.organization_id,
            image_url: data.image_url,
            caption: data.caption,
            alt_text: data.alt_text,
            is_featured: data.is_featured,
            display_order: data.display_order,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Photo, Error> {
        self.state
            .photos
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("photo(id: {})", id)))
    }

    async fn query(&mut self, organization_id: i32) -> Result<Vec<Photo>, Error> {
        let mut list: Vec<Photo> = self.state.photos.iter().filter(|p| p.organization_id == organization_id).cloned().collect();
        list.sort_by_key(|p| (p.display_order, p.id));
        Ok(list)
    }

    async fn update(&mut self, id: i32, data: PhotoUpdate) -> Result<(), Error> {
        let photo = self
            .state
            .photos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("photo(id: {})", id)))?;
        photo.caption = data.caption;
        photo.alt_text = data.alt_text;
        photo.is_featured = data.is_featured;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.state.photos.retain(|p| p.id != id);
        Ok(())
    }

    async fn clear_featured(&mut self, organization_id: i32) -> Result<(), Error> {
        for p in self.state.photos.iter_mut().filter(|p| p.organization_id == organization_id) {
            p.is_featured = false;
        }
        Ok(())
    }

    async fn set_display_order(&mut self, id: i32, display_order: i32) -> Result<(), Error> {
        if let Some(p) = self.state.photos.iter_mut().find(|p| p.id == id) {
            p.display_order = display_order;
        }
        Ok(())
    }

    async fn next_display_order(&mut self, organization_id: i32) -> Result<i32, Error> {
        Ok(self
            .state
            .photos
            .iter()
            .filter(|p| p.organization_id == organization_id)
            .map(|p| p.display_order + 1)
            .max()
            .unwrap_or(0))
    }
}

impl DocumentCommon for MemoryStore {
    async fn get_impact(&mut self, organization_id: i32) -> Result<Option<ImpactDocument>, Error> {
        Ok(self.state.impact.get(&organization_id).cloned())
    }

    async fn put_impact(&mut self, organization_id: i32, doc: ImpactDocument) -> Result<(), Error> {
        self.state.impact.insert(organization_id, doc);
        Ok(())
    }

    async fn get_north_star(&mut self, organization_id: i32) -> Result<Option<NorthStarDocument>, Error> {
        Ok(self.state.north_star.get(&organization_id).cloned())
    }

    async fn put_north_star(&mut self, organization_id: i32, doc: NorthStarDocument) -> Result<(), Error> {
        self.state.north_star.insert(organization_id, doc);
        Ok(())
    }
}

impl Common for MemoryStore {}

impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(self) -> Result<(), Error> {
        *self.shared.borrow_mut() = self.state;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}
