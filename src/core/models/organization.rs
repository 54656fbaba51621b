use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::models::common::nullable;
use crate::core::models::membership::Role;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    #[default]
    Nonprofit,
    Foundation,
    Funder,
    Government,
    Other,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::Nonprofit => "nonprofit",
            OrganizationType::Foundation => "foundation",
            OrganizationType::Funder => "funder",
            OrganizationType::Government => "government",
            OrganizationType::Other => "other",
        }
    }
}

impl std::str::FromStr for OrganizationType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nonprofit" => Ok(Self::Nonprofit),
            "foundation" => Ok(Self::Foundation),
            "funder" => Ok(Self::Funder),
            "government" => Ok(Self::Government),
            "other" => Ok(Self::Other),
            _ => Err(Error::BusinessError(format!("invalid organization type({})", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Organization {
    pub id: i32,
    pub slug: String,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub org_type: String,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub mission_image_url: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub year_founded: Option<i32>,
    pub ein: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct Create {
    pub name: String,
    pub slug: Option<String>,
    #[serde(rename = "type", default)]
    pub org_type: OrganizationType,
    pub description: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub slug: String,
    pub name: String,
    pub org_type: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Patch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub org_type: Option<OrganizationType>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub year_founded: Option<Option<i32>>,
    pub ein: Option<String>,
    pub focus_areas: Option<Vec<String>>,
}

/// Full column set written back after a patch has been merged.
#[derive(Debug, Clone)]
pub struct Update {
    pub name: String,
    pub org_type: String,
    pub description: Option<String>,
    pub mission: Option<String>,
    pub image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub mission_image_url: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub year_founded: Option<i32>,
    pub ein: Option<String>,
}

impl From<&Organization> for Update {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name.clone(),
            org_type: org.org_type.clone(),
            description: org.description.clone(),
            mission: org.mission.clone(),
            image_url: org.image_url.clone(),
            banner_image_url: org.banner_image_url.clone(),
            mission_image_url: org.mission_image_url.clone(),
            location: org.location.clone(),
            website: org.website.clone(),
            year_founded: org.year_founded,
            ein: org.ein.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MissionUpdate {
    pub mission: Option<String>,
    pub mission_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub focus_areas: Vec<String>,
    pub members_count: i64,
    pub followers_count: i64,
    pub is_following: bool,
    pub is_bookmarked: bool,
    pub my_role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Spotlight {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub metric: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub author_title: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ImpactDocument {
    #[serde(default)]
    pub spotlights: Vec<Spotlight>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String },
    Paragraph { text: String },
    Image { url: String, caption: Option<String> },
    Stat { label: String, value: String },
    Quote { text: String, attribution: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NorthStarDocument {
    #[serde(default)]
    pub blocks: Vec<Block>,
}
