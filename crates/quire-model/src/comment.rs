use bon::Builder;
use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::id::{CommentId, PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub created: NaiveDateTime,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub parent_id: Option<CommentId>,
}

impl Comment {
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Debug, Builder)]
pub struct InsertComment<'a> {
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: &'a str,
    pub parent_id: Option<CommentId>,
}
