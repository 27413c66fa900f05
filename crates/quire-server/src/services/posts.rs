use quire_api_types::post::PostStats;
use quire_api_types::RelationKind;
use quire_error::{ApiError, ApiErrorCategory};
use quire_model::id::PostId;

use crate::App;

/// Live like, bookmark and comment counters of a post.
#[derive(Debug)]
pub struct GetPostStats {
    pub id: PostId,
}

impl GetPostStats {
    #[tracing::instrument(skip(app), name = "services.posts.stats")]
    pub async fn perform(self, app: &App) -> Result<PostStats, ApiError> {
        let id = self.id;
        let post = app
            .with_store("services.posts.find", || app.gateway.find_post(id))
            .await?;

        if post.is_none() {
            return Err(
                ApiError::new(ApiErrorCategory::NotFound).message("Could not find post specified")
            );
        }

        let count = |kind| app.gateway.count_relations(kind, id.0);
        let likes = app
            .with_store("services.posts.count_likes", || count(RelationKind::Like))
            .await?;
        let bookmarks = app
            .with_store("services.posts.count_bookmarks", || {
                count(RelationKind::Bookmark)
            })
            .await?;
        let comments = app
            .with_store("services.posts.count_comments", || {
                app.gateway.count_comments(id)
            })
            .await?;

        Ok(PostStats {
            id: id.0,
            likes,
            bookmarks,
            comments,
        })
    }
}
