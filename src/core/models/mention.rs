use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MentionCandidate {
    Profile {
        id: Uuid,
        name: String,
        avatar_url: Option<String>,
    },
    Organization {
        id: i32,
        name: String,
        slug: String,
        image_url: Option<String>,
    },
}
