use crate::core::models::{
    comment::{Comment, Insert as CommentInsert, Update as CommentUpdate},
    common::Pagination,
    membership::{Insert as MembershipInsert, MemberDetail, Membership, Role},
    organization::{Block, ImpactDocument, Insert as OrganizationInsert, NorthStarDocument, Organization, Spotlight, Testimonial, Update as OrganizationUpdate},
    photo::{Insert as PhotoInsert, Photo, Update as PhotoUpdate},
    post::{Insert as PostInsert, Post, PostOwner, PostScope, Update as PostUpdate},
    profile::{Profile, Query as ProfileQuery, Update as ProfileUpdate},
    reaction::{ReactionTarget, ReactionType, Reactor},
    social::{FollowEdge, FollowTarget},
};
use crate::core::ports::repository::{
    BookmarkCommon, CommentCommon, Common, DocumentCommon, FollowCommon, Manager, MembershipCommon, OrganizationCommon, PhotoCommon, PostCommon,
    ProfileCommon, ReactionCommon, Store, TxStore,
};
use crate::core::services::mention::escape_like;
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "p.id, p.full_name, p.avatar_url, p.role, p.organization_name, p.title, p.bio, p.is_omega_admin";

fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

fn post_select(scope: PostScope) -> String {
    let organization_id = match scope {
        PostScope::Personal => "NULL::INT AS organization_id",
        PostScope::Organization => "organization_id",
    };
    format!(
        "SELECT id, profile_id AS author_id, {}, content, image_urls, tags, likes_count, comments_count, created_at, updated_at FROM {}",
        organization_id,
        scope.posts_table()
    )
}

fn comment_select(scope: PostScope) -> String {
    format!(
        "SELECT c.id, c.{} AS post_id, c.profile_id AS author_id, p.full_name AS author_name, p.avatar_url AS author_avatar_url,
            c.content, c.image_urls, c.mentions, c.created_at, c.updated_at
        FROM {} AS c
        JOIN profiles AS p ON p.id = c.profile_id",
        scope.post_id_field(),
        scope.comments_table()
    )
}

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> ProfileCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: Uuid) -> Result<Profile, Error> {
        let profile = query_as(&format!("SELECT {} FROM profiles AS p WHERE p.id = $1", PROFILE_COLUMNS))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        profile.ok_or_else(|| Error::NotFound(format!("profile(id: {})", id)))
    }

    async fn exists(&mut self, id: Uuid) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn query(&mut self, param: &ProfileQuery, pagination: Pagination) -> Result<Vec<Profile>, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT {} FROM profiles AS p WHERE 1 = 1", PROFILE_COLUMNS));
        if let Some(name) = &param.name_like {
            stmt.push(" AND p.full_name ILIKE ").push_bind(like_pattern(name));
        }
        if let Some(id) = param.exclude_id {
            stmt.push(" AND p.id <> ").push_bind(id);
        }
        stmt.push(" ORDER BY p.full_name, p.id");
        stmt.push(" LIMIT ").push_bind(pagination.limit);
        stmt.push(" OFFSET ").push_bind(pagination.offset);
        let profiles = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(profiles)
    }

    async fn count(&mut self, param: &ProfileQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM profiles AS p WHERE 1 = 1");
        if let Some(name) = &param.name_like {
            stmt.push(" AND p.full_name ILIKE ").push_bind(like_pattern(name));
        }
        if let Some(id) = param.exclude_id {
            stmt.push(" AND p.id <> ").push_bind(id);
        }
        let (n,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn update(&mut self, id: Uuid, data: ProfileUpdate) -> Result<(), Error> {
        query(
            "UPDATE profiles
            SET full_name = $1, avatar_url = $2, role = $3, organization_name = $4, title = $5, bio = $6
            WHERE id = $7",
        )
        .bind(data.full_name)
        .bind(data.avatar_url)
        .bind(data.role)
        .bind(data.organization_name)
        .bind(data.title)
        .bind(data.bio)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn search(&mut self, term: &str, limit: i64) -> Result<Vec<Profile>, Error> {
        let profiles = query_as(&format!(
            "SELECT {} FROM profiles AS p WHERE p.full_name ILIKE $1 ORDER BY p.full_name LIMIT $2",
            PROFILE_COLUMNS
        ))
        .bind(like_pattern(term))
        .bind(limit)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(profiles)
    }
}

impl<E> OrganizationCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: OrganizationInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO organizations (slug, name, type, description, location, website)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id",
        )
        .bind(&data.slug)
        .bind(data.name)
        .bind(data.org_type)
        .bind(data.description)
        .bind(data.location)
        .bind(data.website)
        .fetch_optional(&mut self.executor)
        .await?;
        id.ok_or_else(|| Error::BusinessError(format!("organization which has the same slug already exists(slug: {})", data.slug)))
    }

    async fn get(&mut self, id: i32) -> Result<Organization, Error> {
        let org = query_as("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        org.ok_or_else(|| Error::NotFound(format!("organization(id: {})", id)))
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Organization, Error> {
        let org = query_as("SELECT * FROM organizations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        org.ok_or_else(|| Error::NotFound(format!("organization(id: {})", id)))
    }

    async fn get_by_slug(&mut self, slug: &str) -> Result<Option<Organization>, Error> {
        let org = query_as("SELECT * FROM organizations WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(org)
    }

    async fn exists(&mut self, id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn slug_exists(&mut self, slug: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn update(&mut self, id: i32, data: OrganizationUpdate) -> Result<(), Error> {
        query(
            "UPDATE organizations
            SET name = $1, type = $2, description = $3, mission = $4, image_url = $5, banner_image_url = $6,
                mission_image_url = $7, location = $8, website = $9, year_founded = $10, ein = $11, updated_at = NOW()
            WHERE id = $12",
        )
        .bind(data.name)
        .bind(data.org_type)
        .bind(data.description)
        .bind(data.mission)
        .bind(data.image_url)
        .bind(data.banner_image_url)
        .bind(data.mission_image_url)
        .bind(data.location)
        .bind(data.website)
        .bind(data.year_founded)
        .bind(data.ein)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM organizations WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn search(&mut self, term: &str, limit: i64) -> Result<Vec<Organization>, Error> {
        let orgs = query_as("SELECT * FROM organizations WHERE name ILIKE $1 ORDER BY name LIMIT $2")
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(orgs)
    }

    async fn focus_areas(&mut self, id: i32) -> Result<Vec<String>, Error> {
        let areas = query_scalar(
            "SELECT fa.name
            FROM organization_focus_areas AS ofa
            JOIN focus_areas AS fa ON fa.id = ofa.focus_area_id
            WHERE ofa.organization_id = $1
            ORDER BY fa.id",
        )
        .bind(id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(areas)
    }

    async fn replace_focus_areas(&mut self, id: i32, areas: Vec<String>) -> Result<(), Error> {
        query("DELETE FROM organization_focus_areas WHERE organization_id = $1")
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        for name in areas {
            let area_id: i32 = query_scalar("INSERT INTO focus_areas (name) VALUES ($1) ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id")
                .bind(name)
                .fetch_one(&mut self.executor)
                .await?;
            query("INSERT INTO organization_focus_areas (organization_id, focus_area_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(id)
                .bind(area_id)
                .execute(&mut self.executor)
                .await?;
        }
        Ok(())
    }
}

impl<E> MembershipCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: MembershipInsert) -> Result<(), Error> {
        query("INSERT INTO organization_memberships (organization_id, profile_id, role, is_public) VALUES ($1, $2, $3, $4)")
            .bind(data.organization_id)
            .bind(data.profile_id)
            .bind(data.role)
            .bind(data.is_public)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn get(&mut self, organization_id: i32, profile_id: Uuid) -> Result<Option<Membership>, Error> {
        let membership = query_as("SELECT * FROM organization_memberships WHERE organization_id = $1 AND profile_id = $2")
            .bind(organization_id)
            .bind(profile_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(membership)
    }

    async fn query(&mut self, organization_id: i32) -> Result<Vec<MemberDetail>, Error> {
        let members = query_as(
            "SELECT m.profile_id, p.full_name, p.avatar_url, p.title, m.role, m.joined_at, m.is_public
            FROM organization_memberships AS m
            JOIN profiles AS p ON p.id = m.profile_id
            WHERE m.organization_id = $1
            ORDER BY m.role DESC, m.joined_at",
        )
        .bind(organization_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(members)
    }

    async fn count(&mut self, organization_id: i32) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM organization_memberships WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(n)
    }

    async fn count_role(&mut self, organization_id: i32, role: Role) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM organization_memberships WHERE organization_id = $1 AND role = $2")
            .bind(organization_id)
            .bind(role)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(n)
    }

    async fn update_role(&mut self, organization_id: i32, profile_id: Uuid, role: Role) -> Result<(), Error> {
        query("UPDATE organization_memberships SET role = $1 WHERE organization_id = $2 AND profile_id = $3")
            .bind(role)
            .bind(organization_id)
            .bind(profile_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn update_visibility(&mut self, organization_id: i32, profile_id: Uuid, is_public: bool) -> Result<(), Error> {
        query("UPDATE organization_memberships SET is_public = $1 WHERE organization_id = $2 AND profile_id = $3")
            .bind(is_public)
            .bind(organization_id)
            .bind(profile_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, organization_id: i32, profile_id: Uuid) -> Result<(), Error> {
        query("DELETE FROM organization_memberships WHERE organization_id = $1 AND profile_id = $2")
            .bind(organization_id)
            .bind(profile_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl<E> FollowCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, edge: &FollowEdge) -> Result<bool, Error> {
        let res = match edge.target {
            FollowTarget::Profile(id) => {
                query("INSERT INTO follows (follower_id, following_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                    .bind(edge.follower_id)
                    .bind(id)
                    .execute(&mut self.executor)
                    .await?
            }
            FollowTarget::Organization(id) => {
                query("INSERT INTO organization_follows (follower_id, organization_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                    .bind(edge.follower_id)
                    .bind(id)
                    .execute(&mut self.executor)
                    .await?
            }
        };
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&mut self, edge: &FollowEdge) -> Result<bool, Error> {
        let res = match edge.target {
            FollowTarget::Profile(id) => {
                query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                    .bind(edge.follower_id)
                    .bind(id)
                    .execute(&mut self.executor)
                    .await?
            }
            FollowTarget::Organization(id) => {
                query("DELETE FROM organization_follows WHERE follower_id = $1 AND organization_id = $2")
                    .bind(edge.follower_id)
                    .bind(id)
                    .execute(&mut self.executor)
                    .await?
            }
        };
        Ok(res.rows_affected() > 0)
    }

    async fn exists(&mut self, edge: &FollowEdge) -> Result<bool, Error> {
        let exists = match edge.target {
            FollowTarget::Profile(id) => {
                query_scalar("SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)")
                    .bind(edge.follower_id)
                    .bind(id)
                    .fetch_one(&mut self.executor)
                    .await?
            }
            FollowTarget::Organization(id) => {
                query_scalar("SELECT EXISTS(SELECT 1 FROM organization_follows WHERE follower_id = $1 AND organization_id = $2)")
                    .bind(edge.follower_id)
                    .bind(id)
                    .fetch_one(&mut self.executor)
                    .await?
            }
        };
        Ok(exists)
    }

    async fn count_followers(&mut self, target: FollowTarget) -> Result<i64, Error> {
        let n = match target {
            FollowTarget::Profile(id) => {
                query_scalar("SELECT COUNT(*) FROM follows WHERE following_id = $1")
                    .bind(id)
                    .fetch_one(&mut self.executor)
                    .await?
            }
            FollowTarget::Organization(id) => {
                query_scalar("SELECT COUNT(*) FROM organization_follows WHERE organization_id = $1")
                    .bind(id)
                    .fetch_one(&mut self.executor)
                    .await?
            }
        };
        Ok(n)
    }

    async fn count_following(&mut self, follower_id: Uuid) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(follower_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(n)
    }

    async fn followers(&mut self, target: FollowTarget, pagination: Pagination) -> Result<Vec<Profile>, Error> {
        let (table, field) = match target {
            FollowTarget::Profile(_) => ("follows", "following_id"),
            FollowTarget::Organization(_) => ("organization_follows", "organization_id"),
        };
        let sql = format!(
            "SELECT {} FROM profiles AS p
            JOIN {} AS f ON f.follower_id = p.id
            WHERE f.{} = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3",
            PROFILE_COLUMNS, table, field
        );
        let stmt = query_as(&sql);
        let stmt = match target {
            FollowTarget::Profile(id) => stmt.bind(id),
            FollowTarget::Organization(id) => stmt.bind(id),
        };
        let profiles = stmt
            .bind(pagination.limit)
            .bind(pagination.offset)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(profiles)
    }

    async fn following(&mut self, follower_id: Uuid, pagination: Pagination) -> Result<Vec<Profile>, Error> {
        let profiles = query_as(&format!(
            "SELECT {} FROM profiles AS p
            JOIN follows AS f ON f.following_id = p.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            LIMIT $2 OFFSET $3",
            PROFILE_COLUMNS
        ))
        .bind(follower_id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(profiles)
    }

    async fn following_organizations(&mut self, follower_id: Uuid) -> Result<Vec<Organization>, Error> {
        let orgs = query_as(
            "SELECT o.* FROM organizations AS o
            JOIN organization_follows AS f ON f.organization_id = o.id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC",
        )
        .bind(follower_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(orgs)
    }

    async fn followed_among(&mut self, follower_id: Uuid, candidates: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ids = query_scalar("SELECT following_id FROM follows WHERE follower_id = $1 AND following_id = ANY($2)")
            .bind(follower_id)
            .bind(candidates)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(ids)
    }
}

impl<E> BookmarkCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error> {
        let res = query("INSERT INTO organization_bookmarks (user_id, organization_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(organization_id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error> {
        let res = query("DELETE FROM organization_bookmarks WHERE user_id = $1 AND organization_id = $2")
            .bind(user_id)
            .bind(organization_id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn exists(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM organization_bookmarks WHERE user_id = $1 AND organization_id = $2)")
            .bind(user_id)
            .bind(organization_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn count(&mut self, user_id: Uuid) -> Result<i64, Error> {
        let n = query_scalar("SELECT COUNT(*) FROM organization_bookmarks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(n)
    }

    async fn query(&mut self, user_id: Uuid, pagination: Pagination) -> Result<Vec<Organization>, Error> {
        let orgs = query_as(
            "SELECT o.* FROM organizations AS o
            JOIN organization_bookmarks AS b ON b.organization_id = o.id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(orgs)
    }
}

impl<E> PostCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: PostInsert) -> Result<i32, Error> {
        let id = match data.owner {
            PostOwner::Profile(_) => {
                query_scalar("INSERT INTO posts (profile_id, content, image_urls, tags) VALUES ($1, $2, $3, $4) RETURNING id")
                    .bind(data.author_id)
                    .bind(data.content)
                    .bind(data.image_urls)
                    .bind(Json(data.tags))
                    .fetch_one(&mut self.executor)
                    .await?
            }
            PostOwner::Organization(org_id) => {
                query_scalar(
                    "INSERT INTO organization_posts (organization_id, profile_id, content, image_urls, tags)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id",
                )
                .bind(org_id)
                .bind(data.author_id)
                .bind(data.content)
                .bind(data.image_urls)
                .bind(Json(data.tags))
                .fetch_one(&mut self.executor)
                .await?
            }
        };
        Ok(id)
    }

    async fn get(&mut self, scope: PostScope, id: i32) -> Result<Post, Error> {
        let post = query_as(&format!("{} WHERE id = $1", post_select(scope)))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        post.ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))
    }

    async fn get_for_update(&mut self, scope: PostScope, id: i32) -> Result<Post, Error> {
        let post = query_as(&format!("{} WHERE id = $1 FOR UPDATE", post_select(scope)))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        post.ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))
    }

    async fn query(&mut self, owner: PostOwner, pagination: Pagination) -> Result<Vec<Post>, Error> {
        let mut stmt = QueryBuilder::new(post_select(owner.scope()));
        match owner {
            PostOwner::Profile(uid) => stmt.push(" WHERE profile_id = ").push_bind(uid),
            PostOwner::Organization(org_id) => stmt.push(" WHERE organization_id = ").push_bind(org_id),
        };
        stmt.push(" ORDER BY created_at DESC, id DESC");
        stmt.push(" LIMIT ").push_bind(pagination.limit);
        stmt.push(" OFFSET ").push_bind(pagination.offset);
        let posts = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(posts)
    }

    async fn count(&mut self, owner: PostOwner) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", owner.scope().posts_table()));
        match owner {
            PostOwner::Profile(uid) => stmt.push(" WHERE profile_id = ").push_bind(uid),
            PostOwner::Organization(org_id) => stmt.push(" WHERE organization_id = ").push_bind(org_id),
        };
        let (n,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(n)
    }

    async fn update(&mut self, scope: PostScope, id: i32, data: PostUpdate) -> Result<(), Error> {
        query(&format!(
            "UPDATE {} SET content = $1, image_urls = $2, tags = $3, updated_at = NOW() WHERE id = $4",
            scope.posts_table()
        ))
        .bind(data.content)
        .bind(data.image_urls)
        .bind(Json(data.tags))
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, scope: PostScope, id: i32) -> Result<(), Error> {
        query(&format!("DELETE FROM {} WHERE id = $1", scope.posts_table()))
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn refresh_likes_count(&mut self, scope: PostScope, id: i32) -> Result<i32, Error> {
        let count = query_scalar(&format!(
            "UPDATE {} SET likes_count = (SELECT COUNT(*) FROM {} WHERE {} = $1)::INT WHERE id = $1 RETURNING likes_count",
            scope.posts_table(),
            scope.likes_table(),
            scope.post_id_field()
        ))
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        count.ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))
    }

    async fn refresh_comments_count(&mut self, scope: PostScope, id: i32) -> Result<i32, Error> {
        let count = query_scalar(&format!(
            "UPDATE {} SET comments_count = (SELECT COUNT(*) FROM {} WHERE {} = $1)::INT WHERE id = $1 RETURNING comments_count",
            scope.posts_table(),
            scope.comments_table(),
            scope.post_id_field()
        ))
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        count.ok_or_else(|| Error::NotFound(format!("post(id: {})", id)))
    }
}

impl<E> CommentCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, scope: PostScope, data: CommentInsert) -> Result<i32, Error> {
        let id = query_scalar(&format!(
            "INSERT INTO {} ({}, profile_id, content, image_urls, mentions) VALUES ($1, $2, $3, $4, $5) RETURNING id",
            scope.comments_table(),
            scope.post_id_field()
        ))
        .bind(data.post_id)
        .bind(data.author_id)
        .bind(data.content)
        .bind(data.image_urls)
        .bind(Json(data.mentions))
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, scope: PostScope, id: i32) -> Result<Comment, Error> {
        let comment = query_as(&format!("{} WHERE c.id = $1", comment_select(scope)))
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        comment.ok_or_else(|| Error::NotFound(format!("comment(id: {})", id)))
    }

    async fn query(&mut self, scope: PostScope, post_id: i32) -> Result<Vec<Comment>, Error> {
        let comments = query_as(&format!(
            "{} WHERE c.{} = $1 ORDER BY c.created_at, c.id",
            comment_select(scope),
            scope.post_id_field()
        ))
        .bind(post_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(comments)
    }

    async fn update(&mut self, scope: PostScope, id: i32, data: CommentUpdate) -> Result<(), Error> {
        query(&format!(
            "UPDATE {} SET content = $1, image_urls = $2, mentions = $3, updated_at = NOW() WHERE id = $4",
            scope.comments_table()
        ))
        .bind(data.content)
        .bind(data.image_urls)
        .bind(Json(data.mentions))
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, scope: PostScope, id: i32) -> Result<(), Error> {
        query(&format!("DELETE FROM {} WHERE id = $1", scope.comments_table()))
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl<E> ReactionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn upsert(&mut self, target: ReactionTarget, user_id: Uuid, reaction_type: ReactionType) -> Result<(), Error> {
        query(&format!(
            "INSERT INTO {table} ({field}, user_id, reaction_type) VALUES ($1, $2, $3)
            ON CONFLICT ({field}, user_id) DO UPDATE SET reaction_type = EXCLUDED.reaction_type",
            table = target.table(),
            field = target.id_field()
        ))
        .bind(target.id)
        .bind(user_id)
        .bind(reaction_type)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, target: ReactionTarget, user_id: Uuid) -> Result<bool, Error> {
        let res = query(&format!("DELETE FROM {} WHERE {} = $1 AND user_id = $2", target.table(), target.id_field()))
            .bind(target.id)
            .bind(user_id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn get(&mut self, target: ReactionTarget, user_id: Uuid) -> Result<Option<ReactionType>, Error> {
        let reaction = query_scalar(&format!(
            "SELECT reaction_type FROM {} WHERE {} = $1 AND user_id = $2",
            target.table(),
            target.id_field()
        ))
        .bind(target.id)
        .bind(user_id)
        .fetch_optional(&mut self.executor)
        .await?;
        Ok(reaction)
    }

    async fn query(&mut self, target: ReactionTarget) -> Result<Vec<Reactor>, Error> {
        let reactors = query_as(&format!(
            "SELECT r.user_id, p.full_name, p.avatar_url, r.reaction_type
            FROM {} AS r
            JOIN profiles AS p ON p.id = r.user_id
            WHERE r.{} = $1
            ORDER BY r.created_at DESC",
            target.table(),
            target.id_field()
        ))
        .bind(target.id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(reactors)
    }
}

impl<E> PhotoCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: PhotoInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO organization_photos (organization_id, image_url, caption, alt_text, is_featured, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id",
        )
        .bind(data.organization_id)
        .bind(data.image_url)
        .bind(data.caption)
        .bind(data.alt_text)
        .bind(data.is_featured)
        .bind(data.display_order)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Photo, Error> {
        let photo = query_as(
            "SELECT id, organization_id, image_url, caption, alt_text, is_featured, display_order
            FROM organization_photos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        photo.ok_or_else(|| Error::NotFound(format!("photo(id: {})", id)))
    }

    async fn query(&mut self, organization_id: i32) -> Result<Vec<Photo>, Error> {
        let photos = query_as(
            "SELECT id, organization_id, image_url, caption, alt_text, is_featured, display_order
            FROM organization_photos WHERE organization_id = $1
            ORDER BY display_order, id",
        )
        .bind(organization_id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(photos)
    }

    async fn update(&mut self, id: i32, data: PhotoUpdate) -> Result<(), Error> {
        query("UPDATE organization_photos SET caption = $1, alt_text = $2, is_featured = $3 WHERE id = $4")
            .bind(data.caption)
            .bind(data.alt_text)
            .bind(data.is_featured)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM organization_photos WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn clear_featured(&mut self, organization_id: i32) -> Result<(), Error> {
        query("UPDATE organization_photos SET is_featured = FALSE WHERE organization_id = $1 AND is_featured")
            .bind(organization_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn set_display_order(&mut self, id: i32, display_order: i32) -> Result<(), Error> {
        query("UPDATE organization_photos SET display_order = $1 WHERE id = $2")
            .bind(display_order)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn next_display_order(&mut self, organization_id: i32) -> Result<i32, Error> {
        let next = query_scalar("SELECT COALESCE(MAX(display_order) + 1, 0) FROM organization_photos WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(next)
    }
}

impl<E> DocumentCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get_impact(&mut self, organization_id: i32) -> Result<Option<ImpactDocument>, Error> {
        let row: Option<(Json<Vec<Spotlight>>, Json<Vec<Testimonial>>)> =
            query_as("SELECT spotlights, testimonials FROM organization_impact WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_optional(&mut self.executor)
                .await?;
        Ok(row.map(|(spotlights, testimonials)| ImpactDocument {
            spotlights: spotlights.0,
            testimonials: testimonials.0,
        }))
    }

    async fn put_impact(&mut self, organization_id: i32, doc: ImpactDocument) -> Result<(), Error> {
        query(
            "INSERT INTO organization_impact (organization_id, spotlights, testimonials) VALUES ($1, $2, $3)
            ON CONFLICT (organization_id) DO UPDATE
            SET spotlights = EXCLUDED.spotlights, testimonials = EXCLUDED.testimonials, updated_at = NOW()",
        )
        .bind(organization_id)
        .bind(Json(doc.spotlights))
        .bind(Json(doc.testimonials))
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn get_north_star(&mut self, organization_id: i32) -> Result<Option<NorthStarDocument>, Error> {
        let blocks: Option<Json<Vec<Block>>> = query_scalar("SELECT blocks FROM organization_north_star WHERE organization_id = $1")
            .bind(organization_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(blocks.map(|b| NorthStarDocument { blocks: b.0 }))
    }

    async fn put_north_star(&mut self, organization_id: i32, doc: NorthStarDocument) -> Result<(), Error> {
        query(
            "INSERT INTO organization_north_star (organization_id, blocks) VALUES ($1, $2)
            ON CONFLICT (organization_id) DO UPDATE SET blocks = EXCLUDED.blocks, updated_at = NOW()",
        )
        .bind(organization_id)
        .bind(Json(doc.blocks))
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl Common for PgSqlx<Transaction<'static, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl Store for PgSqlx<Transaction<'static, Postgres>> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
