use actix_web::web::{Json, Path};
use serde::Deserialize;
use uuid::Uuid;

use crate::context::UserInfo;
use crate::core::models::membership::{MemberAdd, MemberDetail, Role, TeamGroup};
use crate::core::ports::repository::Manager;
use crate::core::services::team;
use crate::error::Error;
use crate::handlers::{Auth, DB};
use crate::response::DeleteResponse;

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    role: Role,
}

#[derive(Debug, Deserialize)]
pub struct Visibility {
    is_public: bool,
}

pub async fn members(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<Vec<MemberDetail>>, Error> {
    let (org_id,) = path.into_inner();
    let mut d = db.db().await?;
    let members = team::list_members(&mut d, user_info.id, org_id).await?;
    Ok(Json(members))
}

pub async fn groups(user_info: UserInfo, path: Path<(i32,)>, db: DB) -> Result<Json<Vec<TeamGroup>>, Error> {
    let (org_id,) = path.into_inner();
    let mut d = db.db().await?;
    let groups = team::team(&mut d, user_info.id, org_id).await?;
    Ok(Json(groups))
}

pub async fn add(user_info: UserInfo, path: Path<(i32,)>, Json(body): Json<MemberAdd>, db: DB, authorizer: Auth) -> Result<Json<Vec<MemberDetail>>, Error> {
    let (org_id,) = path.into_inner();
    let tx = db.tx().await?;
    team::add_member(tx, authorizer.get_ref(), user_info.id, org_id, body).await?;
    let mut d = db.db().await?;
    let members = team::list_members(&mut d, user_info.id, org_id).await?;
    Ok(Json(members))
}

pub async fn change_role(
    user_info: UserInfo,
    path: Path<(i32, Uuid)>,
    Json(RoleChange { role }): Json<RoleChange>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<Vec<MemberDetail>>, Error> {
    let (org_id, profile_id) = path.into_inner();
    let tx = db.tx().await?;
    team::change_role(tx, authorizer.get_ref(), user_info.id, org_id, profile_id, role).await?;
    let mut d = db.db().await?;
    let members = team::list_members(&mut d, user_info.id, org_id).await?;
    Ok(Json(members))
}

pub async fn set_visibility(
    user_info: UserInfo,
    path: Path<(i32, Uuid)>,
    Json(Visibility { is_public }): Json<Visibility>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<Vec<MemberDetail>>, Error> {
    let (org_id, profile_id) = path.into_inner();
    let tx = db.tx().await?;
    team::set_member_visibility(tx, authorizer.get_ref(), user_info.id, org_id, profile_id, is_public).await?;
    let mut d = db.db().await?;
    let members = team::list_members(&mut d, user_info.id, org_id).await?;
    Ok(Json(members))
}

pub async fn remove(user_info: UserInfo, path: Path<(i32, Uuid)>, db: DB, authorizer: Auth) -> Result<Json<DeleteResponse>, Error> {
    let (org_id, profile_id) = path.into_inner();
    let tx = db.tx().await?;
    team::remove_member(tx, authorizer.get_ref(), user_info.id, org_id, profile_id).await?;
    Ok(Json(DeleteResponse::new()))
}
