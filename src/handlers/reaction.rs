use actix_web::web::{Json, Path, Query};
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::models::post::PostScope;
use crate::core::models::reaction::{React, ReactionState, ReactionTarget, ReactionType, Reactor};
use crate::core::ports::repository::Manager;
use crate::core::services::reaction;
use crate::error::Error;
use crate::handlers::DB;

#[derive(Debug, Deserialize)]
pub struct ReactorFilter {
    #[serde(rename = "type")]
    reaction_type: Option<ReactionType>,
}

async fn state(user_info: UserInfo, target: ReactionTarget, db: DB) -> Result<Json<ReactionState>, Error> {
    let mut d = db.db().await?;
    let state = reaction::reaction_state(&mut d, user_info.id, target).await?;
    Ok(Json(state))
}

async fn react(user_info: UserInfo, target: ReactionTarget, body: React, db: DB) -> Result<Json<ReactionState>, Error> {
    let tx = db.tx().await?;
    let state = reaction::react(tx, user_info.id, target, body.reaction_type).await?;
    Ok(Json(state))
}

async fn remove(user_info: UserInfo, target: ReactionTarget, db: DB) -> Result<Json<ReactionState>, Error> {
    let tx = db.tx().await?;
    let state = reaction::remove_reaction(tx, user_info.id, target).await?;
    Ok(Json(state))
}

async fn reactors(target: ReactionTarget, filter: ReactorFilter, db: DB) -> Result<Json<Vec<Reactor>>, Error> {
    let mut d = db.db().await?;
    let list = reaction::reactors(&mut d, target, filter.reaction_type).await?;
    Ok(Json(list))
}

pub async fn post_state(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB) -> Result<Json<ReactionState>, Error> {
    let (scope, id) = path.into_inner();
    state(user_info, ReactionTarget::post(scope, id), db).await
}

pub async fn react_post(user_info: UserInfo, path: Path<(PostScope, i32)>, Json(body): Json<React>, db: DB) -> Result<Json<ReactionState>, Error> {
    let (scope, id) = path.into_inner();
    react(user_info, ReactionTarget::post(scope, id), body, db).await
}

pub async fn unreact_post(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB) -> Result<Json<ReactionState>, Error> {
    let (scope, id) = path.into_inner();
    remove(user_info, ReactionTarget::post(scope, id), db).await
}

pub async fn post_reactors(path: Path<(PostScope, i32)>, Query(filter): Query<ReactorFilter>, db: DB) -> Result<Json<Vec<Reactor>>, Error> {
    let (scope, id) = path.into_inner();
    reactors(ReactionTarget::post(scope, id), filter, db).await
}

pub async fn comment_state(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB) -> Result<Json<ReactionState>, Error> {
    let (scope, id) = path.into_inner();
    state(user_info, ReactionTarget::comment(scope, id), db).await
}

pub async fn react_comment(user_info: UserInfo, path: Path<(PostScope, i32)>, Json(body): Json<React>, db: DB) -> Result<Json<ReactionState>, Error> {
    let (scope, id) = path.into_inner();
    react(user_info, ReactionTarget::comment(scope, id), body, db).await
}

pub async fn unreact_comment(user_info: UserInfo, path: Path<(PostScope, i32)>, db: DB) -> Result<Json<ReactionState>, Error> {
    let (scope, id) = path.into_inner();
    remove(user_info, ReactionTarget::comment(scope, id), db).await
}

pub async fn comment_reactors(path: Path<(PostScope, i32)>, Query(filter): Query<ReactorFilter>, db: DB) -> Result<Json<Vec<Reactor>>, Error> {
    let (scope, id) = path.into_inner();
    reactors(ReactionTarget::comment(scope, id), filter, db).await
}
