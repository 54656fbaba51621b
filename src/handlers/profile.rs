use actix_web::web::{Json, Path, Query};
use uuid::Uuid;

use crate::context::UserInfo;
use crate::core::models::organization::Organization;
use crate::core::models::profile::{ExploreMember, Patch, Profile, ProfileDetail};
use crate::core::models::social::{FollowState, FollowTarget};
use crate::core::ports::repository::Manager;
use crate::core::services::{profile, social};
use crate::error::Error;
use crate::handlers::DB;
use crate::request::{NameFilter, Pagination};
use crate::response::List;

pub async fn explore(user_info: UserInfo, Query(filter): Query<NameFilter>, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<ExploreMember>>, Error> {
    let mut d = db.db().await?;
    let res = profile::explore_members(&mut d, user_info.id, filter.name, page.try_into()?).await?;
    Ok(Json(res.into()))
}

pub async fn detail(user_info: UserInfo, path: Path<(Uuid,)>, db: DB) -> Result<Json<ProfileDetail>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let detail = profile::profile_detail(&mut d, user_info.id, id).await?;
    Ok(Json(detail))
}

pub async fn me(user_info: UserInfo, db: DB) -> Result<Json<ProfileDetail>, Error> {
    let mut d = db.db().await?;
    let detail = profile::profile_detail(&mut d, user_info.id, user_info.id).await?;
    Ok(Json(detail))
}

pub async fn update_me(user_info: UserInfo, Json(patch): Json<Patch>, db: DB) -> Result<Json<Profile>, Error> {
    let tx = db.tx().await?;
    let profile = profile::update_profile(tx, user_info.id, patch).await?;
    Ok(Json(profile))
}

pub async fn followers(path: Path<(Uuid,)>, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<Profile>>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let res = social::followers(&mut d, FollowTarget::Profile(id), page.try_into()?).await?;
    Ok(Json(res.into()))
}

pub async fn following(path: Path<(Uuid,)>, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<Profile>>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let res = social::following(&mut d, id, page.try_into()?).await?;
    Ok(Json(res.into()))
}

pub async fn following_organizations(path: Path<(Uuid,)>, db: DB) -> Result<Json<Vec<Organization>>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let orgs = social::following_organizations(&mut d, id).await?;
    Ok(Json(orgs))
}

pub async fn follow(user_info: UserInfo, path: Path<(Uuid,)>, db: DB) -> Result<Json<FollowState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::follow(tx, user_info.id, FollowTarget::Profile(id)).await?;
    Ok(Json(state))
}

pub async fn unfollow(user_info: UserInfo, path: Path<(Uuid,)>, db: DB) -> Result<Json<FollowState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::unfollow(tx, user_info.id, FollowTarget::Profile(id)).await?;
    Ok(Json(state))
}

pub async fn toggle_follow(user_info: UserInfo, path: Path<(Uuid,)>, db: DB) -> Result<Json<FollowState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::toggle_follow(tx, user_info.id, FollowTarget::Profile(id)).await?;
    Ok(Json(state))
}

pub async fn bookmarks(user_info: UserInfo, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<Organization>>, Error> {
    let mut d = db.db().await?;
    let res = social::bookmarks(&mut d, user_info.id, page.try_into()?).await?;
    Ok(Json(res.into()))
}
