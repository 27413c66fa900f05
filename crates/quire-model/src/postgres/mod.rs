use quire_api_types::ErrorCategory;
use quire_config::DatabasePools;
use quire_error::ext::ResultExt;
use quire_error::{Error, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

mod comment;
mod gateway;
mod relation;
mod schema;

/// [`Gateway`] backed by PostgreSQL.
///
/// Writes and everything a write depends on (relation lookups and
/// counts) go to the primary database. Plain lookups may use the
/// replica if one is configured.
///
/// [`Gateway`]: crate::Gateway
#[derive(Debug, Clone)]
pub struct PgGateway {
    primary: PgPool,
    replica: Option<PgPool>,
}

#[derive(Debug, Error)]
#[error("Could not connect to the database")]
pub struct PgConnectError;

#[derive(Debug, Error)]
#[error("Could not run database migrations")]
pub struct PgMigrateError;

impl PgGateway {
    #[tracing::instrument(skip_all, name = "db.connect")]
    pub async fn connect(config: &DatabasePools) -> Result<Self, PgConnectError> {
        let primary = Self::connect_pool(config, config.primary_url.as_str())
            .await
            .attach_printable("could not connect to the primary database")?;

        let replica = match config.replica_url.as_ref() {
            Some(url) => Some(
                Self::connect_pool(config, url.as_str())
                    .await
                    .attach_printable("could not connect to the replica database")?,
            ),
            None => None,
        };

        Ok(Self { primary, replica })
    }

    #[must_use]
    pub fn from_pools(primary: PgPool, replica: Option<PgPool>) -> Self {
        Self { primary, replica }
    }

    #[tracing::instrument(skip_all, name = "db.migrate")]
    pub async fn migrate(&self) -> Result<(), PgMigrateError> {
        crate::MIGRATOR
            .run(&self.primary)
            .await
            .change_context(PgMigrateError)
    }

    pub(crate) fn primary(&self) -> &PgPool {
        &self.primary
    }

    pub(crate) fn read(&self) -> &PgPool {
        self.replica.as_ref().unwrap_or(&self.primary)
    }

    async fn connect_pool(config: &DatabasePools, url: &str) -> Result<PgPool, PgConnectError> {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connection_timeout)
            .connect(url)
            .await
            .change_context(PgConnectError)
    }
}

/// Converts [`sqlx`] errors into errors categorized the way the
/// engagement layer expects.
pub(crate) trait SqlxResultExt<T> {
    fn into_store_error(self) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    #[track_caller]
    fn into_store_error(self) -> Result<T> {
        match self {
            Ok(okay) => Ok(okay),
            Err(error) => {
                let category = categorize(&error);
                Err(Error::new_generic(category, error))
            }
        }
    }
}

fn categorize(error: &sqlx::Error) -> ErrorCategory {
    match error {
        sqlx::Error::Io(..)
        | sqlx::Error::Tls(..)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorCategory::Outage,
        sqlx::Error::Database(e) if e.is_unique_violation() => ErrorCategory::Conflict,
        sqlx::Error::Database(e) if e.is_foreign_key_violation() => ErrorCategory::NotFound,
        // class 08 is connection exception, 57P01 to 57P03 are shutdowns
        sqlx::Error::Database(e) => match e.code().as_deref() {
            Some(code) if code.starts_with("08") || code.starts_with("57P") => {
                ErrorCategory::Outage
            }
            _ => ErrorCategory::Unknown,
        },
        _ => ErrorCategory::Unknown,
    }
}

/// Converts a `COUNT(*)` result which is never negative.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_connection_failures_as_outages() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(categorize(&sqlx::Error::Io(io)), ErrorCategory::Outage);
        assert_eq!(categorize(&sqlx::Error::PoolTimedOut), ErrorCategory::Outage);
        assert_eq!(categorize(&sqlx::Error::RowNotFound), ErrorCategory::Unknown);
    }
}
