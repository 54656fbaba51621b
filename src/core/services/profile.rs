use std::collections::HashSet;

use uuid::Uuid;

use crate::core::models::{
    common::{blank_to_none, patch_text, Pagination},
    profile::{ExploreMember, Patch, Profile, ProfileDetail, Query, Update},
    social::{FollowEdge, FollowTarget},
};
use crate::core::ports::repository::{FollowCommon, ProfileCommon, Store, TxStore};
use crate::error::Error;

pub async fn profile_detail<D>(db: &mut D, viewer: Uuid, id: Uuid) -> Result<ProfileDetail, Error>
where
    D: Store,
{
    let profile = ProfileCommon::get(db, id).await?;
    let followers_count = FollowCommon::count_followers(db, FollowTarget::Profile(id)).await?;
    let following_count = FollowCommon::count_following(db, id).await?;
    let is_following = viewer != id
        && FollowCommon::exists(
            db,
            &FollowEdge {
                follower_id: viewer,
                target: FollowTarget::Profile(id),
            },
        )
        .await?;
    Ok(ProfileDetail {
        profile,
        followers_count,
        following_count,
        is_following,
    })
}

pub async fn update_profile<T>(mut store: T, uid: Uuid, patch: Patch) -> Result<Profile, Error>
where
    T: TxStore,
{
    let current = ProfileCommon::get(&mut store, uid).await?;
    let full_name = match patch.full_name {
        Some(name) => blank_to_none(Some(name)).ok_or_else(|| Error::BusinessError("full name cannot be empty".into()))?,
        None => current.full_name,
    };
    let update = Update {
        full_name,
        avatar_url: patch_text(current.avatar_url, patch.avatar_url),
        role: patch_text(current.role, patch.role),
        organization_name: patch_text(current.organization_name, patch.organization_name),
        title: patch_text(current.title, patch.title),
        bio: patch_text(current.bio, patch.bio),
    };
    ProfileCommon::update(&mut store, uid, update).await?;
    let profile = ProfileCommon::get(&mut store, uid).await?;
    store.commit().await?;
    Ok(profile)
}

pub async fn explore_members<D>(db: &mut D, viewer: Uuid, name: Option<String>, pagination: Pagination) -> Result<(Vec<ExploreMember>, i64), Error>
where
    D: Store,
{
    let query = Query {
        name_like: blank_to_none(name),
        exclude_id: Some(viewer),
    };
    let total = ProfileCommon::count(db, &query).await?;
    let profiles = ProfileCommon::query(db, &query, pagination).await?;
    let ids: Vec<Uuid> = profiles.iter().map(|p| p.id).collect();
    let followed: HashSet<Uuid> = FollowCommon::followed_among(db, viewer, &ids).await?.into_iter().collect();
    let list = profiles
        .into_iter()
        .map(|profile| ExploreMember {
            is_following: followed.contains(&profile.id),
            profile,
        })
        .collect();
    Ok((list, total))
}
