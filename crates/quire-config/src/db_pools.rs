use quire_error::ext::NoContextResultExt;
use quire_error::{Error, Result};
use quire_utils::{env, Sensitive};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

use crate::{vars, ConfigParts};

#[derive(Debug, Clone)]
pub struct DatabasePools {
    /// **Environment variable**: `QUIRE_DB_PRIMARY_URL`
    ///
    /// Connection URL of the primary database. Every write
    /// goes through this database.
    pub primary_url: Sensitive<String>,

    /// **Environment variable**: `QUIRE_DB_REPLICA_URL`
    ///
    /// Connection URL of a read-only replica. Reads fall back
    /// to the primary database if not set.
    pub replica_url: Option<Sensitive<String>>,

    /// **Environment variable**: `QUIRE_DB_MIN_CONNECTIONS`
    ///
    /// The value is capped to `max_connections`.
    ///
    /// The default value is `0`, if not set.
    pub min_connections: u32,

    /// **Environment variable**: `QUIRE_DB_MAX_CONNECTIONS`
    ///
    /// The default value is `10`, if not set.
    pub max_connections: u32,

    /// **Environment variable**: `QUIRE_DB_CONNECTION_TIMEOUT_SECS`
    ///
    /// Maximum amount of time to wait for a connection
    /// from the pool.
    ///
    /// The default is `5` seconds, if not set.
    pub connection_timeout: Duration,
}

impl DatabasePools {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

    pub(crate) fn from_partial(partial: PartialDatabasePools) -> Result<Self, DBLoadError> {
        let Some(primary_url) = partial.primary_url else {
            return Err(Error::unknown(DBLoadError)
                .attach_printable(format!("{} is required", vars::DB_PRIMARY_URL)));
        };

        let max_connections = partial
            .max_connections
            .map_or(Self::DEFAULT_MAX_CONNECTIONS, NonZeroU32::get);

        let min_connections = partial.min_connections.unwrap_or(0).min(max_connections);
        let connection_timeout = partial
            .connection_timeout_secs
            .map_or(Self::DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs);

        Ok(Self {
            primary_url: Sensitive::new(primary_url),
            replica_url: partial.replica_url.map(Sensitive::new),
            min_connections,
            max_connections,
            connection_timeout,
        })
    }

    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            primary_url: Sensitive::new(String::new()),
            replica_url: None,
            min_connections: 0,
            max_connections: 1,
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
#[error("Could not load database configuration")]
pub struct DBLoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PartialDatabasePools {
    pub primary_url: Option<String>,
    pub replica_url: Option<String>,
    pub min_connections: Option<u32>,
    pub max_connections: Option<NonZeroU32>,
    pub connection_timeout_secs: Option<u64>,
}

impl PartialDatabasePools {
    pub(crate) fn from_env() -> Result<Self, DBLoadError> {
        let primary_url = env::var_opt(vars::DB_PRIMARY_URL).change_context(DBLoadError)?;
        let replica_url = env::var_opt(vars::DB_REPLICA_URL).change_context(DBLoadError)?;
        let min_connections =
            env::var_opt_parsed::<u32>(vars::DB_MIN_CONNECTIONS).change_context(DBLoadError)?;
        let max_connections = env::var_opt_parsed::<NonZeroU32>(vars::DB_MAX_CONNECTIONS)
            .change_context(DBLoadError)?;
        let connection_timeout_secs = env::var_opt_parsed::<u64>(vars::DB_CONNECTION_TIMEOUT_SECS)
            .change_context(DBLoadError)?;

        Ok(Self {
            primary_url,
            replica_url,
            min_connections,
            max_connections,
            connection_timeout_secs,
        })
    }
}

impl ConfigParts for PartialDatabasePools {
    fn merge(self, other: Self) -> Self {
        Self {
            primary_url: self.primary_url.merge(other.primary_url),
            replica_url: self.replica_url.merge(other.replica_url),
            min_connections: self.min_connections.merge(other.min_connections),
            max_connections: self.max_connections.merge(other.max_connections),
            connection_timeout_secs: self
                .connection_timeout_secs
                .merge(other.connection_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_require_primary_url() {
        let error = DatabasePools::from_partial(PartialDatabasePools::default()).unwrap_err();
        assert!(error.has::<DBLoadError>());
    }

    #[test]
    fn should_cap_min_connections() {
        let pools = DatabasePools::from_partial(PartialDatabasePools {
            primary_url: Some("postgres://localhost/quire".into()),
            min_connections: Some(50),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(pools.max_connections, 10);
        assert_eq!(pools.min_connections, 10);
        assert_eq!(pools.connection_timeout, Duration::from_secs(5));
        assert!(pools.replica_url.is_none());
    }
}
