use async_trait::async_trait;
use quire_api_types::RelationKind;
use quire_error::Result;
use std::fmt::Debug;
use thiserror::Error;

use crate::comment::{Comment, InsertComment};
use crate::id::{CommentId, PostId, UserId};
use crate::post::Post;
use crate::relation::{Relation, RelationKey};
use crate::user::User;

/// Storage behind the engagement layer.
///
/// Implementations must enforce that at most one [`Relation`] exists
/// for every [`RelationKey`]. A duplicate insert fails with the
/// `Conflict` category instead of creating a second edge. Failures to
/// reach the store are reported with the `Outage` category.
#[async_trait]
pub trait Gateway: Debug + Send + Sync {
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>>;

    /// Users that could not be found are left out.
    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>>;

    async fn find_post(&self, id: PostId) -> Result<Option<Post>>;

    async fn count_posts_by_author(&self, author_id: UserId) -> Result<u64>;

    async fn find_relation(&self, key: RelationKey) -> Result<Option<Relation>>;

    async fn insert_relation(&self, key: RelationKey) -> Result<Relation, InsertRelationError>;

    /// Returns `false` if there was no edge to delete.
    async fn delete_relation(&self, key: RelationKey) -> Result<bool>;

    /// Counts edges of a kind pointing at the target.
    async fn count_relations(&self, kind: RelationKind, target_id: i64) -> Result<u64>;

    /// Counts edges of a kind starting from the source.
    async fn count_relations_from(&self, kind: RelationKind, source_id: UserId) -> Result<u64>;

    async fn insert_comment(&self, form: &InsertComment<'_>)
        -> Result<Comment, InsertCommentError>;

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>>;

    /// Every comment of a post, oldest first.
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    async fn count_comments(&self, post_id: PostId) -> Result<u64>;
}

#[derive(Debug, Error)]
#[error("Could not insert relation")]
pub struct InsertRelationError;

#[derive(Debug, Error)]
#[error("Could not insert comment")]
pub struct InsertCommentError;
