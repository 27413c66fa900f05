use quire_api_types::comment::{Comment as CommentView, CommentNode};
use quire_api_types::user::Author;
use quire_error::{ApiError, ApiErrorCategory};
use quire_model::id::{CommentId, PostId, UserId};
use quire_model::{Comment, InsertComment, User};
use std::collections::HashMap;
use tracing::warn;

use crate::extract::SessionUser;
use crate::App;

/// Adds a comment to a post, or a reply to one of its top-level comments.
#[derive(Debug)]
pub struct CreateComment<'a> {
    pub post_id: PostId,
    pub content: &'a str,
    pub parent_id: Option<CommentId>,
}

impl CreateComment<'_> {
    #[tracing::instrument(skip(app), name = "services.comments.create")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<CommentView, ApiError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Comment cannot be empty"));
        }

        let post_id = self.post_id;
        let post = app
            .with_store("services.comments.find_post", || {
                app.gateway.find_post(post_id)
            })
            .await?;

        if post.is_none() {
            return Err(
                ApiError::new(ApiErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        if let Some(parent_id) = self.parent_id {
            let parent = app
                .with_store("services.comments.find_parent", || {
                    app.gateway.find_comment(parent_id)
                })
                .await?;

            // Threads are two levels deep. Replies always point at a
            // top-level comment of the same post.
            let valid = parent.is_some_and(|v| v.post_id == post_id && !v.is_reply());
            if !valid {
                return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                    .message("Invalid parent comment"));
            }
        }

        let form = InsertComment::builder()
            .post_id(post_id)
            .author_id(session_user.id)
            .content(content)
            .maybe_parent_id(self.parent_id)
            .build();

        // Not retried. The row may be committed even when the reply is
        // lost, and a second insert would duplicate the comment.
        let comment = app.gateway.insert_comment(&form).await?;

        Ok(into_view(comment, Author::from(session_user.user.clone())))
    }
}

/// Lists the comments of a post as two-level threads.
///
/// Top-level comments come newest first and replies under
/// each of them oldest first.
#[derive(Debug)]
pub struct ListComments {
    pub post_id: PostId,
}

impl ListComments {
    #[tracing::instrument(skip(app), name = "services.comments.list")]
    pub async fn perform(self, app: &App) -> Result<Vec<CommentNode>, ApiError> {
        let post_id = self.post_id;
        let post = app
            .with_store("services.comments.find_post", || {
                app.gateway.find_post(post_id)
            })
            .await?;

        if post.is_none() {
            return Err(
                ApiError::new(ApiErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        let comments = app
            .with_store("services.comments.list", || {
                app.gateway.list_comments(post_id)
            })
            .await?;

        let mut author_ids = comments.iter().map(|v| v.author_id).collect::<Vec<_>>();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors = app
            .with_store("services.comments.find_authors", || {
                app.gateway.find_users(&author_ids)
            })
            .await?;

        Ok(group_into_threads(comments, authors))
    }
}

fn into_view(comment: Comment, author: Author) -> CommentView {
    CommentView {
        id: comment.id.0,
        post_id: comment.post_id.0,
        parent_id: comment.parent_id.map(|v| v.0),
        content: comment.content,
        created: comment.created.and_utc(),
        author,
    }
}

fn missing_author(id: UserId) -> Author {
    Author {
        id: id.0,
        name: String::new(),
        display_name: None,
        avatar_url: None,
    }
}

/// Groups comments, given oldest first, into threads in one pass.
///
/// Replies nested deeper than one level (left over from older data)
/// are folded under their top-level ancestor. Replies whose ancestor
/// is missing are dropped.
fn group_into_threads(comments: Vec<Comment>, authors: Vec<User>) -> Vec<CommentNode> {
    let mut authors = authors
        .into_iter()
        .map(|v| (v.id, Author::from(v)))
        .collect::<HashMap<_, _>>();

    let mut author_of = |id: UserId| -> Author {
        authors.get(&id).cloned().unwrap_or_else(|| {
            warn!(author.id = %id, "author of a comment is missing");
            let author = missing_author(id);
            authors.insert(id, author.clone());
            author
        })
    };

    let mut threads: Vec<CommentNode> = Vec::new();
    // comment id -> index of the thread it belongs to
    let mut thread_of: HashMap<CommentId, usize> = HashMap::new();

    for comment in comments {
        let author = author_of(comment.author_id);
        match comment.parent_id {
            None => {
                thread_of.insert(comment.id, threads.len());
                threads.push(CommentNode {
                    comment: into_view(comment, author),
                    replies: Vec::new(),
                });
            }
            Some(parent_id) => {
                let Some(&index) = thread_of.get(&parent_id) else {
                    continue;
                };

                let root_id = threads[index].comment.id;
                thread_of.insert(comment.id, index);

                let mut view = into_view(comment, author);
                view.parent_id = Some(root_id);
                threads[index].replies.push(view);
            }
        }
    }

    threads.reverse();
    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestResultExt};
    use assert_json_diff::assert_json_include;
    use chrono::{NaiveDateTime, TimeDelta, Utc};
    use serde_json::json;

    fn comment(id: i64, parent_id: Option<i64>, created: NaiveDateTime) -> Comment {
        Comment {
            id: CommentId(id),
            created,
            post_id: PostId(1),
            author_id: UserId(1),
            content: format!("comment {id}"),
            parent_id: parent_id.map(CommentId),
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<(i64, Vec<i64>)> {
        nodes
            .iter()
            .map(|v| (v.comment.id, v.replies.iter().map(|r| r.id).collect()))
            .collect()
    }

    #[test]
    fn should_order_threads_newest_first_and_replies_oldest_first() {
        let now = Utc::now().naive_utc();
        let at = |secs: i64| now + TimeDelta::seconds(secs);

        let comments = vec![
            comment(1, None, at(0)),
            comment(2, None, at(1)),
            comment(3, Some(1), at(2)),
            comment(4, Some(2), at(3)),
            comment(5, Some(1), at(4)),
        ];

        let threads = group_into_threads(comments, Vec::new());
        assert_eq!(ids(&threads), vec![(2, vec![4]), (1, vec![3, 5])]);
    }

    #[test]
    fn should_fold_deep_replies_and_drop_orphans() {
        let now = Utc::now().naive_utc();
        let comments = vec![
            comment(1, None, now),
            comment(2, Some(1), now),
            comment(3, Some(2), now),
            comment(4, Some(99), now),
        ];

        let threads = group_into_threads(comments, Vec::new());
        assert_eq!(ids(&threads), vec![(1, vec![2, 3])]);
        assert_eq!(threads[0].replies[1].parent_id, Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_threads_with_authors() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let bob = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("bob")
            .call()
            .await;
        let post = gateway.insert_post(alice.user.id, "Hello").await;

        let root = CreateComment {
            post_id: post.id,
            content: "  first!  ",
            parent_id: None,
        }
        .perform(&app, &alice.session_user())
        .await
        .unwrap();

        assert_eq!(root.content, "first!");
        assert_eq!(root.author.name, "alice");

        let reply = CreateComment {
            post_id: post.id,
            content: "welcome",
            parent_id: Some(CommentId(root.id)),
        }
        .perform(&app, &bob.session_user())
        .await
        .unwrap();

        let threads = ListComments { post_id: post.id }
            .perform(&app)
            .await
            .unwrap();

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].comment, root);
        assert_eq!(threads[0].replies, vec![reply]);
        assert_eq!(threads[0].replies[0].author.name, "bob");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_blank_content() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let post = gateway.insert_post(alice.user.id, "Hello").await;

        let error = CreateComment {
            post_id: post.id,
            content: " \n\t ",
            parent_id: None,
        }
        .perform(&app, &alice.session_user())
        .await
        .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "error": "Comment cannot be empty",
            }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_replies_to_replies() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let post = gateway.insert_post(alice.user.id, "Hello").await;

        let create = |content, parent_id| CreateComment {
            post_id: post.id,
            content,
            parent_id,
        };

        let root = create("root", None)
            .perform(&app, &alice.session_user())
            .await
            .unwrap();
        let reply = create("reply", Some(CommentId(root.id)))
            .perform(&app, &alice.session_user())
            .await
            .unwrap();

        let error = create("deeper", Some(CommentId(reply.id)))
            .perform(&app, &alice.session_user())
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "error": "Invalid parent comment",
            }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_parents_from_other_posts() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let first = gateway.insert_post(alice.user.id, "First").await;
        let second = gateway.insert_post(alice.user.id, "Second").await;

        let root = CreateComment {
            post_id: first.id,
            content: "on the first post",
            parent_id: None,
        }
        .perform(&app, &alice.session_user())
        .await
        .unwrap();

        let error = CreateComment {
            post_id: second.id,
            content: "misplaced",
            parent_id: Some(CommentId(root.id)),
        }
        .perform(&app, &alice.session_user())
        .await
        .expect_error_json();

        assert_json_include!(actual: error, expected: json!({ "code": "invalid_request" }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_duplicate_comment_when_reply_is_lost() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let post = gateway.insert_post(alice.user.id, "Hello").await;

        gateway.drop_next_reply();
        let error = CreateComment {
            post_id: post.id,
            content: "only once",
            parent_id: None,
        }
        .perform(&app, &alice.session_user())
        .await
        .expect_error_json();

        assert_json_include!(actual: error, expected: json!({ "code": "outage" }));
        assert_eq!(gateway.comment_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_if_post_not_found() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;

        let error = CreateComment {
            post_id: PostId(2_000_000),
            content: "hello?",
            parent_id: None,
        }
        .perform(&app, &alice.session_user())
        .await
        .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "not_found",
                "error": "Could not find post specified",
            }),
        );

        let error = ListComments {
            post_id: PostId(2_000_000),
        }
        .perform(&app)
        .await
        .expect_error_json();

        assert_json_include!(actual: error, expected: json!({ "code": "not_found" }));
    }
}
