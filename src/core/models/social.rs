use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FollowTarget {
    Profile(Uuid),
    Organization(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    pub follower_id: Uuid,
    pub target: FollowTarget,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FollowState {
    pub following: bool,
    pub followers_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookmarkState {
    pub bookmarked: bool,
    pub bookmarks_count: i64,
}
