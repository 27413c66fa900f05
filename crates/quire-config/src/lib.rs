mod toml_internals;

pub mod auth;
pub mod db_pools;
pub mod logging;
pub mod server;
pub mod store_retry;
pub mod vars;

pub use self::auth::Auth;
pub use self::db_pools::DatabasePools;
pub use self::logging::Logging;
pub use self::server::Server;
pub use self::store_retry::StoreRetry;

trait ConfigParts {
    /// Merges from another partial value. `self` is the priority.
    fn merge(self, other: Self) -> Self;
}

impl<T> ConfigParts for Option<T> {
    fn merge(self, other: Self) -> Self {
        self.or(other)
    }
}
