use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "membership_role", rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Admins and super admins can only be granted or changed by someone
    /// holding `manage_admins`.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Membership {
    pub organization_id: i32,
    pub profile_id: Uuid,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    pub is_public: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub organization_id: i32,
    pub profile_id: Uuid,
    pub role: Role,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct MemberDetail {
    pub profile_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub title: Option<String>,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct MemberAdd {
    pub profile_id: Uuid,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_role() -> Role {
    Role::Member
}

fn default_public() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamCategory {
    Leadership,
    Board,
    Staff,
    Volunteers,
    Members,
}

#[derive(Debug, Serialize)]
pub struct TeamGroup {
    pub category: TeamCategory,
    pub members: Vec<MemberDetail>,
}
