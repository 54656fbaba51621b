use actix_web::web::{Json, Path, Query};

use crate::context::UserInfo;
use crate::core::models::organization::{Create, ImpactDocument, MissionUpdate, NorthStarDocument, Organization, OrganizationDetail, Patch};
use crate::core::models::profile::Profile;
use crate::core::models::social::{BookmarkState, FollowState, FollowTarget};
use crate::core::ports::repository::Manager;
use crate::core::services::{organization, social};
use crate::error::Error;
use crate::handlers::{Auth, DB};
use crate::request::Pagination;
use crate::response::{CreateResponse, DeleteResponse, List};

pub async fn create(user_info: UserInfo, Json(body): Json<Create>, db: DB) -> Result<Json<CreateResponse>, Error> {
    let tx = db.tx().await?;
    let id = organization::create_organization(tx, user_info.id, body).await?;
    Ok(Json(CreateResponse::new(id)))
}

pub async fn detail(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<OrganizationDetail>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let detail = organization::organization_detail(&mut d, user_info.id, id).await?;
    Ok(Json(detail))
}

pub async fn detail_by_slug(user_info: UserInfo, path: Path<(String,)>, db: DB) -> Result<Json<OrganizationDetail>, Error> {
    let (slug,) = path.into_inner();
    let mut d = db.db().await?;
    let detail = organization::organization_detail_by_slug(&mut d, user_info.id, &slug).await?;
    Ok(Json(detail))
}

pub async fn update(user_info: UserInfo, path: Path<(i32,)>, Json(patch): Json<Patch>, db: DB, authorizer: Auth) -> Result<Json<Organization>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let org = organization::update_organization(tx, authorizer.get_ref(), user_info.id, id, patch).await?;
    Ok(Json(org))
}

pub async fn update_mission(
    user_info: UserInfo,
    path: Path<(i32,)>,
    Json(body): Json<MissionUpdate>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<Organization>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let org = organization::update_mission(tx, authorizer.get_ref(), user_info.id, id, body).await?;
    Ok(Json(org))
}

pub async fn delete_organization(user_info: UserInfo, path: Path<(i32,)>, db: DB, authorizer: Auth) -> Result<Json<DeleteResponse>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    organization::delete_organization(tx, authorizer.get_ref(), user_info.id, id).await?;
    Ok(Json(DeleteResponse::new()))
}

pub async fn impact(path: Path<(i32,)>, db: DB) -> Result<Json<ImpactDocument>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let doc = organization::impact(&mut d, id).await?;
    Ok(Json(doc))
}

pub async fn put_impact(
    user_info: UserInfo,
    path: Path<(i32,)>,
    Json(doc): Json<ImpactDocument>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<ImpactDocument>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let doc = organization::put_impact(tx, authorizer.get_ref(), user_info.id, id, doc).await?;
    Ok(Json(doc))
}

pub async fn north_star(path: Path<(i32,)>, db: DB) -> Result<Json<NorthStarDocument>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let doc = organization::north_star(&mut d, id).await?;
    Ok(Json(doc))
}

pub async fn put_north_star(
    user_info: UserInfo,
    path: Path<(i32,)>,
    Json(doc): Json<NorthStarDocument>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<NorthStarDocument>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let doc = organization::put_north_star(tx, authorizer.get_ref(), user_info.id, id, doc).await?;
    Ok(Json(doc))
}

pub async fn followers(path: Path<(i32,)>, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<Profile>>, Error> {
    let (id,) = path.into_inner();
    let mut d = db.db().await?;
    let res = social::followers(&mut d, FollowTarget::Organization(id), page.try_into()?).await?;
    Ok(Json(res.into()))
}

pub async fn follow(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<FollowState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::follow(tx, user_info.id, FollowTarget::Organization(id)).await?;
    Ok(Json(state))
}

pub async fn unfollow(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<FollowState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::unfollow(tx, user_info.id, FollowTarget::Organization(id)).await?;
    Ok(Json(state))
}

pub async fn toggle_follow(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<FollowState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::toggle_follow(tx, user_info.id, FollowTarget::Organization(id)).await?;
    Ok(Json(state))
}

pub async fn toggle_bookmark(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<BookmarkState>, Error> {
    let (id,) = path.into_inner();
    let tx = db.tx().await?;
    let state = social::toggle_bookmark(tx, user_info.id, id).await?;
    Ok(Json(state))
}
