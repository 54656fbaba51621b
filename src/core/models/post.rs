use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::models::reaction::{ReactionCount, ReactionType};

/// Personal and organization posts live in parallel tables with the same
/// shape. The scope owns every table/column name that differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostScope {
    Personal,
    Organization,
}

impl PostScope {
    pub fn posts_table(&self) -> &'static str {
        match self {
            PostScope::Personal => "posts",
            PostScope::Organization => "organization_posts",
        }
    }

    pub fn comments_table(&self) -> &'static str {
        match self {
            PostScope::Personal => "post_comments",
            PostScope::Organization => "organization_post_comments",
        }
    }

    pub fn post_id_field(&self) -> &'static str {
        match self {
            PostScope::Personal => "post_id",
            PostScope::Organization => "organization_post_id",
        }
    }

    pub fn likes_table(&self) -> &'static str {
        match self {
            PostScope::Personal => "post_likes",
            PostScope::Organization => "organization_post_likes",
        }
    }

    pub fn comment_likes_table(&self) -> &'static str {
        match self {
            PostScope::Personal => "post_comment_likes",
            PostScope::Organization => "organization_post_comment_likes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostOwner {
    Profile(Uuid),
    Organization(i32),
}

impl PostOwner {
    pub fn scope(&self) -> PostScope {
        match self {
            PostOwner::Profile(_) => PostScope::Personal,
            PostOwner::Organization(_) => PostScope::Organization,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Post {
    pub id: i32,
    pub author_id: Uuid,
    pub organization_id: Option<i32>,
    pub content: String,
    pub image_urls: Vec<String>,
    pub tags: Json<Vec<String>>,
    pub likes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct Create {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub owner: PostOwner,
    pub author_id: Uuid,
    pub content: String,
    pub image_urls: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub scope: PostScope,
    pub my_reaction: Option<ReactionType>,
    pub reaction_summary: Vec<ReactionCount>,
}
