use serde::{Deserialize, Serialize};

/// Engagement counters of a post, counted from live rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostStats {
    pub id: i64,
    pub likes: u64,
    pub bookmarks: u64,
    pub comments: u64,
}
