use actix_web::web::{Json, Path};

use crate::context::UserInfo;
use crate::core::models::comment::{Comment, Create, Update};
use crate::core::models::post::PostScope;
use crate::core::ports::repository::Manager;
use crate::core::services::comment;
use crate::error::Error;
use crate::handlers::{Auth, DB};
use crate::response::DeleteResponse;

pub async fn list(path: Path<(PostScope, i32)>, db: DB) -> Result<Json<Vec<Comment>>, Error> {
    let (scope, post_id) = path.into_inner();
    let mut d = db.db().await?;
    let comments = comment::list_comments(&mut d, scope, post_id).await?;
    Ok(Json(comments))
}

pub async fn add(user_info: UserInfo, path: Path<(PostScope, i32)>, Json(body): Json<Create>, db: DB) -> Result<Json<Comment>, Error> {
    let (scope, post_id) = path.into_inner();
    let tx = db.tx().await?;
    let comment = comment::add_comment(tx, user_info.id, scope, post_id, body).await?;
    Ok(Json(comment))
}

pub async fn edit(user_info: UserInfo, path: Path<(PostScope, i32)>, Json(body): Json<Update>, db: DB) -> Result<Json<Comment>, Error> {
    let (scope, id) = path.into_inner();
    let tx = db.tx().await?;
    let comment = comment::edit_comment(tx, user_info.id, scope, id, body).await?;
    Ok(Json(comment))
}

pub async fn delete(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB, authorizer: Auth) -> Result<Json<DeleteResponse>, Error> {
    let (scope, id) = path.into_inner();
    let tx = db.tx().await?;
    comment::delete_comment(tx, authorizer.get_ref(), user_info.id, scope, id).await?;
    Ok(Json(DeleteResponse::new()))
}
