use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use quire_api_types::{ErrorCategory, RelationKind};
use quire_error::ext::NoContextResultExt;
use quire_error::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::comment::{Comment, InsertComment};
use crate::gateway::{Gateway, InsertCommentError, InsertRelationError};
use crate::id::{CommentId, PostId, RelationId, UserId};
use crate::post::Post;
use crate::relation::{Relation, RelationKey};
use crate::user::User;

/// In-process [`Gateway`] with the same uniqueness rules as the
/// database. Used by tests and local development.
///
/// Failures can be injected to exercise outage handling and lost
/// uniqueness races without a real database.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: RwLock<State>,
    failing_calls: AtomicUsize,
    race_next_insert: AtomicBool,
    drop_next_reply: AtomicBool,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: Vec<User>,
    posts: Vec<Post>,
    relations: Vec<Relation>,
    comments: Vec<Comment>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn push_relation(&mut self, key: RelationKey) -> Result<Relation, InsertRelationError> {
        if self.relations.iter().any(|v| v.key() == key) {
            return Err(Error::new(ErrorCategory::Conflict, InsertRelationError)
                .attach_printable("relation already exists"));
        }

        let target_exists = match key.kind {
            RelationKind::Like | RelationKind::Bookmark => {
                self.posts.iter().any(|v| v.id.0 == key.target_id)
            }
            RelationKind::Follow => self.users.iter().any(|v| v.id.0 == key.target_id),
        };

        if !target_exists {
            return Err(Error::new(ErrorCategory::NotFound, InsertRelationError)
                .attach_printable("target of the relation does not exist"));
        }

        let relation = Relation {
            id: RelationId(self.next_id()),
            created: now(),
            kind: key.kind,
            source_id: key.source_id,
            target_id: key.target_id,
        };
        self.relations.push(relation.clone());

        Ok(relation)
    }
}

#[derive(Debug, Error)]
#[error("Store is unreachable")]
pub struct SimulatedOutage;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, name: &str, display_name: Option<&str>) -> User {
        let mut state = self.state.write().await;
        let user = User {
            id: UserId(state.next_id()),
            created: now(),
            name: name.to_string(),
            display_name: display_name.map(ToString::to_string),
            avatar_url: None,
        };
        state.users.push(user.clone());
        user
    }

    pub async fn insert_post(&self, author_id: UserId, title: &str) -> Post {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let post = Post {
            id: PostId(id),
            created: now(),
            author_id,
            slug: format!("post-{id}"),
            title: title.to_string(),
        };
        state.posts.push(post.clone());
        post
    }

    /// Makes the next `calls` gateway calls fail with an outage.
    pub fn fail_next_calls(&self, calls: usize) {
        self.failing_calls.store(calls, Ordering::SeqCst);
    }

    /// Makes the next relation insert lose a race against another
    /// request inserting the same edge in between.
    pub fn race_next_insert(&self) {
        self.race_next_insert.store(true, Ordering::SeqCst);
    }

    /// Makes the next insert store its row and then fail with an
    /// outage, as if the connection dropped before the reply arrived.
    pub fn drop_next_reply(&self) {
        self.drop_next_reply.store(true, Ordering::SeqCst);
    }

    pub async fn comment_count(&self) -> usize {
        self.state.read().await.comments.len()
    }

    pub async fn relation_count(&self) -> usize {
        self.state.read().await.relations.len()
    }

    #[track_caller]
    fn check_outage(&self) -> Result<()> {
        let injected = self
            .failing_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if injected {
            Err(Error::new_generic(ErrorCategory::Outage, SimulatedOutage))
        } else {
            Ok(())
        }
    }

    #[track_caller]
    fn check_dropped_reply(&self) -> Result<()> {
        if self.drop_next_reply.swap(false, Ordering::SeqCst) {
            Err(Error::new_generic(ErrorCategory::Outage, SimulatedOutage)
                .attach_printable("reply was lost after the write was committed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.users.iter().find(|v| v.id == id).cloned())
    }

    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.users.iter().find(|v| v.name == name).cloned())
    }

    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }

    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.posts.iter().find(|v| v.id == id).cloned())
    }

    async fn count_posts_by_author(&self, author_id: UserId) -> Result<u64> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.posts.iter().filter(|v| v.author_id == author_id).count() as u64)
    }

    async fn find_relation(&self, key: RelationKey) -> Result<Option<Relation>> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.relations.iter().find(|v| v.key() == key).cloned())
    }

    async fn insert_relation(&self, key: RelationKey) -> Result<Relation, InsertRelationError> {
        self.check_outage().change_context(InsertRelationError)?;

        let mut state = self.state.write().await;
        if self.race_next_insert.swap(false, Ordering::SeqCst) {
            state.push_relation(key)?;
        }

        let relation = state.push_relation(key)?;
        self.check_dropped_reply()
            .change_context(InsertRelationError)?;

        Ok(relation)
    }

    async fn delete_relation(&self, key: RelationKey) -> Result<bool> {
        self.check_outage()?;
        let mut state = self.state.write().await;
        let before = state.relations.len();
        state.relations.retain(|v| v.key() != key);
        Ok(state.relations.len() != before)
    }

    async fn count_relations(&self, kind: RelationKind, target_id: i64) -> Result<u64> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state
            .relations
            .iter()
            .filter(|v| v.kind == kind && v.target_id == target_id)
            .count() as u64)
    }

    async fn count_relations_from(&self, kind: RelationKind, source_id: UserId) -> Result<u64> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state
            .relations
            .iter()
            .filter(|v| v.kind == kind && v.source_id == source_id)
            .count() as u64)
    }

    async fn insert_comment(
        &self,
        form: &InsertComment<'_>,
    ) -> Result<Comment, InsertCommentError> {
        self.check_outage().change_context(InsertCommentError)?;

        let mut state = self.state.write().await;
        if !state.posts.iter().any(|v| v.id == form.post_id) {
            return Err(Error::new(ErrorCategory::NotFound, InsertCommentError)
                .attach_printable("post does not exist"));
        }

        let comment = Comment {
            id: CommentId(state.next_id()),
            created: now(),
            post_id: form.post_id,
            author_id: form.author_id,
            content: form.content.to_string(),
            parent_id: form.parent_id,
        };
        state.comments.push(comment.clone());
        self.check_dropped_reply()
            .change_context(InsertCommentError)?;

        Ok(comment)
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.comments.iter().find(|v| v.id == id).cloned())
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.check_outage()?;
        let state = self.state.read().await;
        let mut comments = state
            .comments
            .iter()
            .filter(|v| v.post_id == post_id)
            .cloned()
            .collect::<Vec<_>>();

        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn count_comments(&self, post_id: PostId) -> Result<u64> {
        self.check_outage()?;
        let state = self.state.read().await;
        Ok(state.comments.iter().filter(|v| v.post_id == post_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_reject_duplicate_relations() {
        let gateway = MemoryGateway::new();
        let alice = gateway.insert_user("alice", None).await;
        let post = gateway.insert_post(alice.id, "Hello").await;
        let key = RelationKey::like(alice.id, post.id);

        gateway.insert_relation(key).await.unwrap();
        let error = gateway.insert_relation(key).await.unwrap_err();
        assert_eq!(error.get_category(), ErrorCategory::Conflict);
        assert_eq!(gateway.count_relations(RelationKind::Like, post.id.0).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn should_lose_injected_race() {
        let gateway = MemoryGateway::new();
        let alice = gateway.insert_user("alice", None).await;
        let bob = gateway.insert_user("bob", None).await;
        let key = RelationKey::follow(alice.id, bob.id);

        gateway.race_next_insert();
        let error = gateway.insert_relation(key).await.unwrap_err();
        assert_eq!(error.get_category(), ErrorCategory::Conflict);
        assert!(gateway.find_relation(key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn should_fail_injected_calls_with_outage() {
        let gateway = MemoryGateway::new();
        let alice = gateway.insert_user("alice", None).await;

        gateway.fail_next_calls(2);
        for _ in 0..2 {
            let error = gateway.find_user(alice.id).await.unwrap_err();
            assert_eq!(error.get_category(), ErrorCategory::Outage);
        }
        assert_eq!(gateway.find_user(alice.id).await.unwrap(), Some(alice));
    }

    #[tokio::test]
    async fn should_keep_row_when_reply_is_dropped() {
        let gateway = MemoryGateway::new();
        let alice = gateway.insert_user("alice", None).await;
        let post = gateway.insert_post(alice.id, "Hello").await;
        let key = RelationKey::like(alice.id, post.id);

        gateway.drop_next_reply();
        let error = gateway.insert_relation(key).await.unwrap_err();
        assert_eq!(error.get_category(), ErrorCategory::Outage);
        assert!(gateway.find_relation(key).await.unwrap().is_some());

        let error = gateway.insert_relation(key).await.unwrap_err();
        assert_eq!(error.get_category(), ErrorCategory::Conflict);
    }

    #[tokio::test]
    async fn should_report_missing_edge_on_delete() {
        let gateway = MemoryGateway::new();
        let alice = gateway.insert_user("alice", None).await;
        let post = gateway.insert_post(alice.id, "Hello").await;
        let key = RelationKey::bookmark(alice.id, post.id);

        assert!(!gateway.delete_relation(key).await.unwrap());
        gateway.insert_relation(key).await.unwrap();
        assert!(gateway.delete_relation(key).await.unwrap());
        assert!(!gateway.delete_relation(key).await.unwrap());
    }

    #[tokio::test]
    async fn should_list_comments_oldest_first() {
        let gateway = MemoryGateway::new();
        let alice = gateway.insert_user("alice", None).await;
        let post = gateway.insert_post(alice.id, "Hello").await;

        for content in ["first", "second", "third"] {
            let form = InsertComment::builder()
                .post_id(post.id)
                .author_id(alice.id)
                .content(content)
                .build();
            gateway.insert_comment(&form).await.unwrap();
        }

        let contents = gateway
            .list_comments(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.content)
            .collect::<Vec<_>>();

        assert_eq!(contents, ["first", "second", "third"]);
    }
}
