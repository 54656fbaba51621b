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
use crate::error::Error;
use uuid::Uuid;

pub trait ProfileCommon {
    async fn get(&mut self, id: Uuid) -> Result<Profile, Error>;
    async fn exists(&mut self, id: Uuid) -> Result<bool, Error>;
    async fn query(&mut self, query: &ProfileQuery, pagination: Pagination) -> Result<Vec<Profile>, Error>;
    async fn count(&mut self, query: &ProfileQuery) -> Result<i64, Error>;
    async fn update(&mut self, id: Uuid, data: ProfileUpdate) -> Result<(), Error>;
    async fn search(&mut self, term: &str, limit: i64) -> Result<Vec<Profile>, Error>;
}

pub trait OrganizationCommon {
    async fn insert(&mut self, data: OrganizationInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Organization, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Organization, Error>;
    async fn get_by_slug(&mut self, slug: &str) -> Result<Option<Organization>, Error>;
    async fn exists(&mut self, id: i32) -> Result<bool, Error>;
    async fn slug_exists(&mut self, slug: &str) -> Result<bool, Error>;
    async fn update(&mut self, id: i32, data: OrganizationUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn search(&mut self, term: &str, limit: i64) -> Result<Vec<Organization>, Error>;
    async fn focus_areas(&mut self, id: i32) -> Result<Vec<String>, Error>;
    async fn replace_focus_areas(&mut self, id: i32, areas: Vec<String>) -> Result<(), Error>;
}

pub trait MembershipCommon {
    async fn insert(&mut self, data: MembershipInsert) -> Result<(), Error>;
    async fn get(&mut self, organization_id: i32, profile_id: Uuid) -> Result<Option<Membership>, Error>;
    async fn query(&mut self, organization_id: i32) -> Result<Vec<MemberDetail>, Error>;
    async fn count(&mut self, organization_id: i32) -> Result<i64, Error>;
    async fn count_role(&mut self, organization_id: i32, role: Role) -> Result<i64, Error>;
    async fn update_role(&mut self, organization_id: i32, profile_id: Uuid, role: Role) -> Result<(), Error>;
    async fn update_visibility(&mut self, organization_id: i32, profile_id: Uuid, is_public: bool) -> Result<(), Error>;
    async fn delete(&mut self, organization_id: i32, profile_id: Uuid) -> Result<(), Error>;
}

pub trait FollowCommon {
    /// Returns false when the edge already existed.
    async fn insert(&mut self, edge: &FollowEdge) -> Result<bool, Error>;
    /// Returns false when there was no edge to delete.
    async fn delete(&mut self, edge: &FollowEdge) -> Result<bool, Error>;
    async fn exists(&mut self, edge: &FollowEdge) -> Result<bool, Error>;
    async fn count_followers(&mut self, target: FollowTarget) -> Result<i64, Error>;
    async fn count_following(&mut self, follower_id: Uuid) -> Result<i64, Error>;
    async fn followers(&mut self, target: FollowTarget, pagination: Pagination) -> Result<Vec<Profile>, Error>;
    async fn following(&mut self, follower_id: Uuid, pagination: Pagination) -> Result<Vec<Profile>, Error>;
    async fn following_organizations(&mut self, follower_id: Uuid) -> Result<Vec<Organization>, Error>;
    /// The subset of `candidates` the follower already follows.
    async fn followed_among(&mut self, follower_id: Uuid, candidates: &[Uuid]) -> Result<Vec<Uuid>, Error>;
}

pub trait BookmarkCommon {
    async fn insert(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error>;
    async fn delete(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error>;
    async fn exists(&mut self, user_id: Uuid, organization_id: i32) -> Result<bool, Error>;
    async fn count(&mut self, user_id: Uuid) -> Result<i64, Error>;
    async fn query(&mut self, user_id: Uuid, pagination: Pagination) -> Result<Vec<Organization>, Error>;
}

pub trait PostCommon {
    async fn insert(&mut self, data: PostInsert) -> Result<i32, Error>;
    async fn get(&mut self, scope: PostScope, id: i32) -> Result<Post, Error>;
    /// Same as `get` but locks the row until the transaction ends.
    async fn get_for_update(&mut self, scope: PostScope, id: i32) -> Result<Post, Error>;
    async fn query(&mut self, owner: PostOwner, pagination: Pagination) -> Result<Vec<Post>, Error>;
    async fn count(&mut self, owner: PostOwner) -> Result<i64, Error>;
    async fn update(&mut self, scope: PostScope, id: i32, data: PostUpdate) -> Result<(), Error>;
    async fn delete(&mut self, scope: PostScope, id: i32) -> Result<(), Error>;
    /// Recomputes `likes_count` from the reaction rows.
    async fn refresh_likes_count(&mut self, scope: PostScope, id: i32) -> Result<i32, Error>;
    /// Recomputes `comments_count` from the comment rows.
    async fn refresh_comments_count(&mut self, scope: PostScope, id: i32) -> Result<i32, Error>;
}

pub trait CommentCommon {
    async fn insert(&mut self, scope: PostScope, data: CommentInsert) -> Result<i32, Error>;
    async fn get(&mut self, scope: PostScope, id: i32) -> Result<Comment, Error>;
    async fn query(&mut self, scope: PostScope, post_id: i32) -> Result<Vec<Comment>, Error>;
    async fn update(&mut self, scope: PostScope, id: i32, data: CommentUpdate) -> Result<(), Error>;
    async fn delete(&mut self, scope: PostScope, id: i32) -> Result<(), Error>;
}

pub trait ReactionCommon {
    /// Inserts or replaces the single reaction of `user_id` on the target.
    async fn upsert(&mut self, target: ReactionTarget, user_id: Uuid, reaction_type: ReactionType) -> Result<(), Error>;
    async fn delete(&mut self, target: ReactionTarget, user_id: Uuid) -> Result<bool, Error>;
    async fn get(&mut self, target: ReactionTarget, user_id: Uuid) -> Result<Option<ReactionType>, Error>;
    async fn query(&mut self, target: ReactionTarget) -> Result<Vec<Reactor>, Error>;
}

pub trait PhotoCommon {
    async fn insert(&mut self, data: PhotoInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Photo, Error>;
    async fn query(&mut self, organization_id: i32) -> Result<Vec<Photo>, Error>;
    async fn update(&mut self, id: i32, data: PhotoUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn clear_featured(&mut self, organization_id: i32) -> Result<(), Error>;
    async fn set_display_order(&mut self, id: i32, display_order: i32) -> Result<(), Error>;
    async fn next_display_order(&mut self, organization_id: i32) -> Result<i32, Error>;
}

pub trait DocumentCommon {
    async fn get_impact(&mut self, organization_id: i32) -> Result<Option<ImpactDocument>, Error>;
    async fn put_impact(&mut self, organization_id: i32, doc: ImpactDocument) -> Result<(), Error>;
    async fn get_north_star(&mut self, organization_id: i32) -> Result<Option<NorthStarDocument>, Error>;
    async fn put_north_star(&mut self, organization_id: i32, doc: NorthStarDocument) -> Result<(), Error>;
}

pub trait Common:
    ProfileCommon + OrganizationCommon + MembershipCommon + FollowCommon + BookmarkCommon + PostCommon + CommentCommon + ReactionCommon + PhotoCommon + DocumentCommon
{
}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
