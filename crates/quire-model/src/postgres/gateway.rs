use async_trait::async_trait;
use quire_api_types::RelationKind;
use quire_error::ext::NoContextResultExt;
use quire_error::Result;
use sea_query::{Asterisk, Expr, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;

use super::schema::{Posts, RelationColumn, Users};
use super::{count_to_u64, PgGateway, SqlxResultExt};
use crate::comment::{Comment, InsertComment};
use crate::gateway::{Gateway, InsertCommentError, InsertRelationError};
use crate::id::{CommentId, PostId, UserId};
use crate::post::Post;
use crate::relation::{Relation, RelationKey};
use crate::user::User;

#[async_trait]
impl Gateway for PgGateway {
    #[tracing::instrument(skip_all, name = "db.users.find")]
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(Users::Table)
            .and_where(Expr::col(Users::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(self.read())
            .await
            .into_store_error()
            .attach_printable("could not find user by id")
    }

    #[tracing::instrument(skip_all, name = "db.users.find_by_name")]
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(Users::Table)
            .and_where(Expr::col(Users::Name).eq(name))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(self.read())
            .await
            .into_store_error()
            .attach_printable("could not find user by name")
    }

    #[tracing::instrument(skip_all, name = "db.users.find_many")]
    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(Users::Table)
            .and_where(Expr::col(Users::Id).is_in(ids.iter().map(|v| v.0)))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_all(self.read())
            .await
            .into_store_error()
            .attach_printable("could not find users by ids")
    }

    #[tracing::instrument(skip_all, name = "db.posts.find")]
    async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(Posts::Table)
            .and_where(Expr::col(Posts::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Post, _>(&sql, values)
            .fetch_optional(self.read())
            .await
            .into_store_error()
            .attach_printable("could not find post by id")
    }

    #[tracing::instrument(skip_all, name = "db.posts.count_by_author")]
    async fn count_posts_by_author(&self, author_id: UserId) -> Result<u64> {
        let (sql, values) = Query::select()
            .expr(Expr::col(Posts::Id).count())
            .from(Posts::Table)
            .and_where(Expr::col(Posts::AuthorId).eq(author_id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(self.read())
            .await
            .into_store_error()
            .attach_printable("could not count posts of a user")
            .map(count_to_u64)
    }

    async fn find_relation(&self, key: RelationKey) -> Result<Option<Relation>> {
        self.find_relation_row(key).await
    }

    async fn insert_relation(&self, key: RelationKey) -> Result<Relation, InsertRelationError> {
        self.insert_relation_row(key).await
    }

    async fn delete_relation(&self, key: RelationKey) -> Result<bool> {
        self.delete_relation_row(key).await
    }

    async fn count_relations(&self, kind: RelationKind, target_id: i64) -> Result<u64> {
        self.count_relation_rows(kind, RelationColumn::TargetId, target_id)
            .await
    }

    async fn count_relations_from(&self, kind: RelationKind, source_id: UserId) -> Result<u64> {
        self.count_relation_rows(kind, RelationColumn::SourceId, source_id.0)
            .await
    }

    async fn insert_comment(
        &self,
        form: &InsertComment<'_>,
    ) -> Result<Comment, InsertCommentError> {
        self.insert_comment_row(form).await
    }

    async fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        self.find_comment_row(id).await
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.list_comment_rows(post_id).await
    }

    async fn count_comments(&self, post_id: PostId) -> Result<u64> {
        self.count_comment_rows(post_id).await
    }
}
