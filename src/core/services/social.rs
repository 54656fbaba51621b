use uuid::Uuid;

use crate::core::models::{
    common::Pagination,
    organization::Organization,
    profile::Profile,
    social::{BookmarkState, FollowEdge, FollowState, FollowTarget},
};
use crate::core::ports::repository::{BookmarkCommon, FollowCommon, OrganizationCommon, ProfileCommon, Store, TxStore};
use crate::error::Error;

async fn check_target<S>(store: &mut S, uid: Uuid, target: FollowTarget) -> Result<(), Error>
where
    S: Store,
{
    match target {
        FollowTarget::Profile(id) => {
            if id == uid {
                return Err(Error::BusinessError("cannot follow yourself".into()));
            }
            if !ProfileCommon::exists(store, id).await? {
                return Err(Error::NotFound(format!("profile(id: {})", id)));
            }
        }
        FollowTarget::Organization(id) => {
            if !OrganizationCommon::exists(store, id).await? {
                return Err(Error::NotFound(format!("organization(id: {})", id)));
            }
        }
    }
    Ok(())
}

pub async fn follow<T>(mut store: T, uid: Uuid, target: FollowTarget) -> Result<FollowState, Error>
where
    T: TxStore,
{
    check_target(&mut store, uid, target).await?;
    FollowCommon::insert(&mut store, &FollowEdge { follower_id: uid, target }).await?;
    let followers_count = FollowCommon::count_followers(&mut store, target).await?;
    store.commit().await?;
    Ok(FollowState {
        following: true,
        followers_count,
    })
}

pub async fn unfollow<T>(mut store: T, uid: Uuid, target: FollowTarget) -> Result<FollowState, Error>
where
    T: TxStore,
{
    FollowCommon::delete(&mut store, &FollowEdge { follower_id: uid, target }).await?;
    let followers_count = FollowCommon::count_followers(&mut store, target).await?;
    store.commit().await?;
    Ok(FollowState {
        following: false,
        followers_count,
    })
}

pub async fn toggle_follow<T>(mut store: T, uid: Uuid, target: FollowTarget) -> Result<FollowState, Error>
where
    T: TxStore,
{
    check_target(&mut store, uid, target).await?;
    let edge = FollowEdge { follower_id: uid, target };
    let following = if FollowCommon::exists(&mut store, &edge).await? {
        FollowCommon::delete(&mut store, &edge).await?;
        false
    } else {
        FollowCommon::insert(&mut store, &edge).await?;
        true
    };
    let followers_count = FollowCommon::count_followers(&mut store, target).await?;
    store.commit().await?;
    log::info!("user {} {} {:?}", uid, if following { "followed" } else { "unfollowed" }, target);
    Ok(FollowState { following, followers_count })
}

pub async fn followers<D>(db: &mut D, target: FollowTarget, pagination: Pagination) -> Result<(Vec<Profile>, i64), Error>
where
    D: Store,
{
    let total = FollowCommon::count_followers(db, target).await?;
    let list = FollowCommon::followers(db, target, pagination).await?;
    Ok((list, total))
}

pub async fn following<D>(db: &mut D, uid: Uuid, pagination: Pagination) -> Result<(Vec<Profile>, i64), Error>
where
    D: Store,
{
    let total = FollowCommon::count_following(db, uid).await?;
    let list = FollowCommon::following(db, uid, pagination).await?;
    Ok((list, total))
}

pub async fn following_organizations<D>(db: &mut D, uid: Uuid) -> Result<Vec<Organization>, Error>
where
    D: Store,
{
    FollowCommon::following_organizations(db, uid).await
}

pub async fn toggle_bookmark<T>(mut store: T, uid: Uuid, organization_id: i32) -> Result<BookmarkState, Error>
where
    T: TxStore,
{
    if !OrganizationCommon::exists(&mut store, organization_id).await? {
        return Err(Error::NotFound(format!("organization(id: {})", organization_id)));
    }
    let bookmarked = if BookmarkCommon::exists(&mut store, uid, organization_id).await? {
        BookmarkCommon::delete(&mut store, uid, organization_id).await?;
        false
    } else {
        BookmarkCommon::insert(&mut store, uid, organization_id).await?;
        true
    };
    let bookmarks_count = BookmarkCommon::count(&mut store, uid).await?;
    store.commit().await?;
    Ok(BookmarkState { bookmarked, bookmarks_count })
}

pub async fn bookmarks<D>(db: &mut D, uid: Uuid, pagination: Pagination) -> Result<(Vec<Organization>, i64), Error>
where
    D: Store,
{
    let total = BookmarkCommon::count(db, uid).await?;
    let list = BookmarkCommon::query(db, uid, pagination).await?;
    Ok((list, total))
}
