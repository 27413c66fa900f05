use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::Author;

/// A comment as displayed to readers, with its author attached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    /// Id of the top-level comment this one replies to.
    pub parent_id: Option<i64>,
    pub content: String,
    pub created: DateTime<Utc>,
    pub author: Author,
}

/// One top-level comment with its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

/// Body of `POST /comments`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateComment {
    #[serde(alias = "postId")]
    pub post_id: i64,
    pub content: String,
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<i64>,
}

/// Query of `GET /comments`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListComments {
    #[serde(alias = "postId")]
    pub post_id: i64,
}
