use chrono::NaiveDateTime;
use quire_api_types::RelationKind;
use quire_error::ext::{NoContextResultExt, ResultExt};
use quire_error::Result;
use sea_query::{Asterisk, Expr, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::FromRow;

use super::schema::{RelationColumn, RelationTable};
use super::{count_to_u64, PgGateway, SqlxResultExt};
use crate::gateway::InsertRelationError;
use crate::id::{RelationId, UserId};
use crate::relation::{Relation, RelationKey};

#[derive(Debug, FromRow)]
struct RelationRow {
    id: RelationId,
    created: NaiveDateTime,
    source_id: UserId,
    target_id: i64,
}

impl RelationRow {
    fn into_relation(self, kind: RelationKind) -> Relation {
        Relation {
            id: self.id,
            created: self.created,
            kind,
            source_id: self.source_id,
            target_id: self.target_id,
        }
    }
}

fn matches_key(key: RelationKey) -> sea_query::SimpleExpr {
    Expr::col(RelationColumn::SourceId)
        .eq(key.source_id.0)
        .and(Expr::col(RelationColumn::TargetId).eq(key.target_id))
}

impl PgGateway {
    #[tracing::instrument(skip_all, name = "db.relations.find")]
    pub(super) async fn find_relation_row(&self, key: RelationKey) -> Result<Option<Relation>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(RelationTable::from(key.kind))
            .and_where(matches_key(key))
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, RelationRow, _>(&sql, values)
            .fetch_optional(self.primary())
            .await
            .into_store_error()
            .attach_printable_lazy(|| format!("could not find {} relation", key.kind))?;

        Ok(row.map(|v| v.into_relation(key.kind)))
    }

    #[tracing::instrument(skip_all, name = "db.relations.insert")]
    pub(super) async fn insert_relation_row(
        &self,
        key: RelationKey,
    ) -> Result<Relation, InsertRelationError> {
        let (sql, values) = Query::insert()
            .into_table(RelationTable::from(key.kind))
            .columns([RelationColumn::SourceId, RelationColumn::TargetId])
            .values_panic([key.source_id.0.into(), key.target_id.into()])
            .returning_all()
            .build_sqlx(PostgresQueryBuilder);

        let row = sqlx::query_as_with::<_, RelationRow, _>(&sql, values)
            .fetch_one(self.primary())
            .await
            .into_store_error()
            .change_context(InsertRelationError)
            .attach_printable_lazy(|| format!("could not insert {} relation", key.kind))?;

        Ok(row.into_relation(key.kind))
    }

    #[tracing::instrument(skip_all, name = "db.relations.delete")]
    pub(super) async fn delete_relation_row(&self, key: RelationKey) -> Result<bool> {
        let (sql, values) = Query::delete()
            .from_table(RelationTable::from(key.kind))
            .and_where(matches_key(key))
            .build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(self.primary())
            .await
            .into_store_error()
            .attach_printable_lazy(|| format!("could not delete {} relation", key.kind))?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "db.relations.count")]
    pub(super) async fn count_relation_rows(
        &self,
        kind: RelationKind,
        column: RelationColumn,
        id: i64,
    ) -> Result<u64> {
        let (sql, values) = Query::select()
            .expr(Expr::col(RelationColumn::Id).count())
            .from(RelationTable::from(kind))
            .and_where(Expr::col(column).eq(id))
            .build_sqlx(PostgresQueryBuilder);

        sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(self.primary())
            .await
            .into_store_error()
            .attach_printable_lazy(|| format!("could not count {kind} relations"))
            .map(count_to_u64)
    }
}
