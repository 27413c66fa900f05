use quire_error::ext::{NoContextResultExt, ResultExt};
use quire_error::Result;
use quire_utils::env;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::PartialAuth;
use crate::db_pools::PartialDatabasePools;
use crate::logging::PartialLogging;
use crate::store_retry::PartialStoreRetry;
use crate::{vars, Auth, ConfigParts, DatabasePools, Logging, StoreRetry};

#[derive(Debug, Clone)]
pub struct Server {
    /// Configuration for server logging.
    pub logging: Logging,

    /// Configuration for database pools.
    ///
    /// You can refer `database` table as `db` to make it easier to type.
    /// ```toml
    /// [db]
    /// primary_url = "postgres://localhost/quire"
    /// ```
    pub database: DatabasePools,

    /// Configuration for verifying bearer tokens.
    pub auth: Auth,

    /// Configuration for retrying store operations during outages.
    pub store_retry: StoreRetry,

    /// **Environment variable**: `QUIRE_SERVER_IP`
    ///
    /// The default value is `127.0.0.1`, if not set.
    pub ip: IpAddr,

    /// **Environment variable**: `QUIRE_SERVER_PORT`
    ///
    /// The default value is `8080`, if not set.
    pub port: u16,

    /// **Environment variable**: `QUIRE_SERVER_WORKERS`
    ///
    /// Total amount of worker threads the server will run.
    ///
    /// The default value is the amount of cores available,
    /// capped to `4`.
    pub workers: usize,

    /// Configuration file path.
    pub file_location: Option<PathBuf>,
}

impl Server {
    const CONFIG_FILE_NAME: &'static str = "quire.toml";

    /// Loads the server configuration from the program's current
    /// environment variables only.
    pub fn from_env() -> Result<Self, ServerLoadError> {
        let partial = PartialServer::from_env()?;
        Self::from_partial(partial, None)
    }

    /// Loads the server test configuration.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            logging: Logging::for_tests(),
            database: DatabasePools::for_tests(),
            auth: Auth::for_tests(),
            store_retry: StoreRetry::for_tests(),
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            workers: 1,
            file_location: None,
        }
    }

    /// Loads the server configuration from both the program's current
    /// environment variables and the config file if there's any.
    ///
    /// Environment variables take priority over values from the
    /// config file, then the default values are used.
    pub fn from_maybe_file() -> Result<Self, ServerLoadError> {
        let config_file_path = env::var_opt(vars::SERVER_CONFIG_FILE)
            .change_context(ServerLoadError)?
            .map(PathBuf::from)
            .or_else(|| Self::locate(None));

        let mut partial = PartialServer::from_env()?;
        if let Some(config_file_path) = config_file_path.as_ref() {
            let from_file = PartialServer::from_toml(config_file_path).attach_printable_lazy(|| {
                format!(
                    "could not read config file of {}",
                    config_file_path.display()
                )
            })?;

            partial = partial.merge(from_file);
        }

        Self::from_partial(partial, config_file_path)
    }

    /// Attempts to locate a `quire.toml` file from the current
    /// directory or the given directory up to its root ancestor.
    #[must_use]
    pub fn locate(directory: Option<&Path>) -> Option<PathBuf> {
        let directory = match directory {
            Some(n) => n.to_path_buf(),
            None => std::env::current_dir().ok()?,
        };

        if !directory.is_dir() {
            return None;
        }

        directory
            .ancestors()
            .map(|ancestor| ancestor.join(Self::CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }
}

impl Server {
    fn from_partial(
        partial: PartialServer,
        file_location: Option<PathBuf>,
    ) -> Result<Self, ServerLoadError> {
        let logging = Logging::from_partial(partial.logging);
        let database = DatabasePools::from_partial(partial.database)
            .change_context(ServerLoadError)
            .attach_printable("could not load database pools configuration")?;

        let auth = Auth::from_partial(partial.auth)
            .change_context(ServerLoadError)
            .attach_printable("could not load authentication configuration")?;

        let store_retry = StoreRetry::from_partial(partial.store_retry);
        let workers = partial
            .workers
            .map_or_else(Self::default_workers, NonZeroUsize::get);

        let ip = partial.ip.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = partial.port.unwrap_or(8080);

        Ok(Self {
            logging,
            database,
            auth,
            store_retry,
            ip,
            port,
            workers,
            file_location,
        })
    }

    fn default_workers() -> usize {
        num_cpus::get().clamp(1, 4)
    }
}

#[derive(Debug, Error)]
#[error("Could not load configuration to start the server")]
pub struct ServerLoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialServer {
    pub logging: PartialLogging,
    #[serde(alias = "db")]
    pub database: PartialDatabasePools,
    pub auth: PartialAuth,
    pub store_retry: PartialStoreRetry,
    pub ip: Option<IpAddr>,
    pub port: Option<u16>,
    pub workers: Option<NonZeroUsize>,
}

impl PartialServer {
    pub fn from_env() -> Result<Self, ServerLoadError> {
        let logging = PartialLogging::from_env().change_context(ServerLoadError)?;
        let database = PartialDatabasePools::from_env().change_context(ServerLoadError)?;
        let auth = PartialAuth::from_env().change_context(ServerLoadError)?;
        let store_retry = PartialStoreRetry::from_env().change_context(ServerLoadError)?;
        let ip = env::var_opt_parsed::<IpAddr>(vars::SERVER_IP).change_context(ServerLoadError)?;
        let port = env::var_opt_parsed::<u16>(vars::SERVER_PORT).change_context(ServerLoadError)?;
        let workers = env::var_opt_parsed::<NonZeroUsize>(vars::SERVER_WORKERS)
            .change_context(ServerLoadError)?;

        Ok(Self {
            logging,
            database,
            auth,
            store_retry,
            ip,
            port,
            workers,
        })
    }

    pub fn from_toml(path: &Path) -> Result<Self, ServerLoadError> {
        crate::toml_internals::parse_file(path).change_context(ServerLoadError)
    }
}

impl ConfigParts for PartialServer {
    fn merge(self, other: Self) -> Self {
        Self {
            logging: self.logging.merge(other.logging),
            database: self.database.merge(other.database),
            auth: self.auth.merge(other.auth),
            store_retry: self.store_retry.merge(other.store_retry),
            ip: self.ip.merge(other.ip),
            port: self.port.merge(other.port),
            workers: self.workers.merge(other.workers),
        }
    }
}

#[cfg(test)]
mod tests;
