use actix_web::web::{Json, Path, Query};
use uuid::Uuid;

use crate::context::UserInfo;
use crate::core::models::post::{Create, Post, PostOwner, PostScope, PostView, Update};
use crate::core::ports::repository::Manager;
use crate::core::services::post;
use crate::error::Error;
use crate::handlers::{Auth, DB};
use crate::request::Pagination;
use crate::response::{CreateResponse, DeleteResponse, List};

async fn list(user_info: UserInfo, owner: PostOwner, page: Pagination, db: DB) -> Result<Json<List<PostView>>, Error> {
    let mut d = db.db().await?;
    let res = post::list_posts(&mut d, user_info.id, owner, page.try_into()?).await?;
    Ok(Json(res.into()))
}

async fn create(user_info: UserInfo, owner: PostOwner, body: Create, db: DB, authorizer: Auth) -> Result<Json<CreateResponse>, Error> {
    let tx = db.tx().await?;
    let id = post::create_post(tx, authorizer.get_ref(), user_info.id, owner, body).await?;
    Ok(Json(CreateResponse::new(id)))
}

pub async fn profile_posts(user_info: UserInfo, path: Path<(Uuid,)>, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<PostView>>, Error> {
    let (id,) = path.into_inner();
    list(user_info, PostOwner::Profile(id), page, db).await
}

pub async fn create_personal(user_info: UserInfo, Json(body): Json<Create>, db: DB, authorizer: Auth) -> Result<Json<CreateResponse>, Error> {
    let owner = PostOwner::Profile(user_info.id);
    create(user_info, owner, body, db, authorizer).await
}

pub async fn organization_posts(user_info: UserInfo, path: Path<(i32,)>, Query(page): Query<Pagination>, db: DB) -> Result<Json<List<PostView>>, Error> {
    let (id,) = path.into_inner();
    list(user_info, PostOwner::Organization(id), page, db).await
}

pub async fn create_organization_post(
    user_info: UserInfo,
    path: Path<(i32,)>,
    Json(body): Json<Create>,
    db: DB,
    authorizer: Auth,
) -> Result<Json<CreateResponse>, Error> {
    let (id,) = path.into_inner();
    create(user_info, PostOwner::Organization(id), body, db, authorizer).await
}

pub async fn detail(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB) -> Result<Json<PostView>, Error> {
    let (scope, id) = path.into_inner();
    let mut d = db.db().await?;
    let view = post::get_post(&mut d, user_info.id, scope, id).await?;
    Ok(Json(view))
}

pub async fn update(user_info: UserInfo, path: Path<(PostScope, i32)>, Json(body): Json<Update>, db: DB) -> Result<Json<Post>, Error> {
    let (scope, id) = path.into_inner();
    let tx = db.tx().await?;
    let post = post::update_post(tx, user_info.id, scope, id, body).await?;
    Ok(Json(post))
}

pub async fn delete(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB, authorizer: Auth) -> Result<Json<DeleteResponse>, Error> {
    let (scope, id) = path.into_inner();
    let tx = db.tx().await?;
    post::delete_post(tx, authorizer.get_ref(), user_info.id, scope, id).await?;
    Ok(Json(DeleteResponse::new()))
}
