use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Photo {
    pub id: i32,
    pub organization_id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub is_featured: bool,
    pub display_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct Create {
    pub image_url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub organization_id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub is_featured: bool,
    pub display_order: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct Patch {
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub is_featured: bool,
}
