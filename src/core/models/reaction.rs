use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::models::post::PostScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "reaction_type", rename_all = "lowercase")]
pub enum ReactionType {
    Like,
    Love,
    Celebrate,
    Insightful,
}

impl ReactionType {
    pub const ALL: [ReactionType; 4] = [ReactionType::Like, ReactionType::Love, ReactionType::Celebrate, ReactionType::Insightful];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionEntity {
    Post,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReactionTarget {
    pub entity: ReactionEntity,
    pub scope: PostScope,
    pub id: i32,
}

impl ReactionTarget {
    pub fn post(scope: PostScope, id: i32) -> Self {
        Self {
            entity: ReactionEntity::Post,
            scope,
            id,
        }
    }

    pub fn comment(scope: PostScope, id: i32) -> Self {
        Self {
            entity: ReactionEntity::Comment,
            scope,
            id,
        }
    }

    pub fn table(&self) -> &'static str {
        match self.entity {
            ReactionEntity::Post => self.scope.likes_table(),
            ReactionEntity::Comment => self.scope.comment_likes_table(),
        }
    }

    pub fn id_field(&self) -> &'static str {
        match self.entity {
            ReactionEntity::Post => self.scope.post_id_field(),
            ReactionEntity::Comment => "comment_id",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReactionCount {
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReactionState {
    pub total: i64,
    pub summary: Vec<ReactionCount>,
    pub my_reaction: Option<ReactionType>,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Reactor {
    pub user_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub reaction_type: ReactionType,
}

#[derive(Debug, Deserialize)]
pub struct React {
    pub reaction_type: ReactionType,
}
