use quire_error::ext::NoContextResultExt;
use quire_error::Result;
use sea_query::{Asterisk, Expr, Order, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;

use super::schema::Comments;
use super::{count_to_u64, PgGateway, SqlxResultExt};
use crate::comment::{Comment, InsertComment};
use crate::gateway::InsertCommentError;
use crate::id::{CommentId, PostId};

impl PgGateway {
    #[tracing::instrument(skip_all, name = "db.comments.insert")]
    pub(super) async fn insert_comment_row(
        &self,
        form: &InsertComment<'_>,
    ) -> Result<Comment, InsertCommentError> {
        let (sql, values) = Query::insert()
            .into_table(Comments::Table)
            .columns([
                Comments::PostId,
                Comments::AuthorId,
                Comments::Content,
                Comments::ParentId,
            ])
            .values_panic([
                form.post_id.0.into(),
                form.author_id.0.into(),
                form.content.into(),
                form.parent_id.map(|v| v.0).into(),
            ])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_one(self.primary())
            .await
            .into_store_error()
            .change_context(InsertCommentError)
    }

    #[tracing::instrument(skip_all, name = "db.comments.find")]
    pub(super) async fn find_comment_row(&self, id: CommentId) -> Result<Option<Comment>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(Comments::Table)
            .and_where(Expr::col(Comments::Id).eq(id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_optional(self.primary())
            .await
            .into_store_error()
            .attach_printable("could not find comment by id")
    }

    #[tracing::instrument(skip_all, name = "db.comments.list")]
    pub(super) async fn list_comment_rows(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(Comments::Table)
            .and_where(Expr::col(Comments::PostId).eq(post_id.0))
            .order_by(Comments::Created, Order::Asc)
            .order_by(Comments::Id, Order::Asc)
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_all(self.read())
            .await
            .into_store_error()
            .attach_printable("could not list comments of a post")
    }

    #[tracing::instrument(skip_all, name = "db.comments.count")]
    pub(super) async fn count_comment_rows(&self, post_id: PostId) -> Result<u64> {
        let (sql, values) = Query::select()
            .expr(Expr::col(Comments::Id).count())
            .from(Comments::Table)
            .and_where(Expr::col(Comments::PostId).eq(post_id.0))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(self.read())
            .await
            .into_store_error()
            .attach_printable("could not count comments of a post")
            .map(count_to_u64)
    }
}
