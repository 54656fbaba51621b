use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, Default, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub organization_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub is_omega_admin: bool,
}

/// Fields a user may change on their own profile. Absent fields are kept,
/// blank optional fields are cleared.
#[derive(Debug, Default, Deserialize)]
pub struct Patch {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub organization_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub organization_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub name_like: Option<String>,
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub profile: Profile,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
}

#[derive(Debug, Serialize)]
pub struct ExploreMember {
    #[serde(flatten)]
    pub profile: Profile,
    pub is_following: bool,
}
