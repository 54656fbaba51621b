use actix_web::web::{Json, Query};

use crate::core::models::mention::MentionCandidate;
use crate::core::ports::repository::Manager;
use crate::core::services::mention;
use crate::error::Error;
use crate::handlers::DB;
use crate::request::MentionSearch;

pub async fn search(Query(MentionSearch { q }): Query<MentionSearch>, db: DB) -> Result<Json<Vec<MentionCandidate>>, Error> {
    let mut d = db.db().await?;
    let list = mention::search_mentions(&mut d, &q).await?;
    Ok(Json(list))
}
