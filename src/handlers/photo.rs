use actix_web::web::{Json, Path};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::models::photo::{Create, Patch, Photo};
use crate::core::ports::repository::Manager;
use crate::core::services::photo;
use crate::error::Error;
use crate::handlers::{Auth, DB};
use crate::response::{CreateResponse, DeleteResponse};

#[derive(Debug, Deserialize)]
pub struct Order {
    ids: Vec<i32>,
}

pub async fn list(path: Path<(i32,)>, db: DB) -> Result<Json<Vec<Photo>>, Error> {
    let (org_id,) = path.into_inner();
    let mut d = db.db().await?;
    let photos = photo::list_photos(&mut d, org_id).await?;
    Ok(Json(photos))
}

pub async fn add(user_info: UserInfo, path: Path<(i32,)>, Json(body): Json<Create>, db: DB, authorizer: Auth) -> Result<Json<CreateResponse>, Error> {
    let (org_id,) = path.into_inner();
    let tx = db.tx().await?;
    let id = photo::add_photo(tx, authorizer.get_ref(), user_info.id, org_id, body).await?;
    Ok(Json(CreateResponse::new(id)))
}

pub async fn update(
    user_info: UserInfo,
    path: Path<(i32, i32)>,
    Json(patch): Json<Patch>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<Photo>, Error> {
    let (org_id, photo_id) = path.into_inner();
    let tx = db.tx().await?;
    let photo = photo::update_photo(tx, authorizer.get_ref(), user_info.id, org_id, photo_id, patch).await?;
    Ok(Json(photo))
}

pub async fn delete(user_info: UserInfo, path: Path<(i32, i32)>, db: DB, authorizer: Auth) -> Result<Json<DeleteResponse>, Error> {
    let (org_id, photo_id) = path.into_inner();
    let tx = db.tx().await?;
    photo::delete_photo(tx, authorizer.get_ref(), user_info.id, org_id, photo_id).await?;
    Ok(Json(DeleteResponse::new()))
}

pub async fn reorder(user_info: UserInfo, path: Path<(i32,)>, Json(Order { ids }): Json<Order>, db: DB, authorizer: Auth) -> Result<Json<Vec<Photo>>, Error> {
    let (org_id,) = path.into_inner();
    let tx = db.tx().await?;
    let photos = photo::reorder_photos(tx, authorizer.get_ref(), user_info.id, org_id, ids).await?;
    Ok(Json(photos))
}
