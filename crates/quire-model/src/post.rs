use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::id::{PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: PostId,
    pub created: NaiveDateTime,
    pub author_id: UserId,
    pub slug: String,
    pub title: String,
}
