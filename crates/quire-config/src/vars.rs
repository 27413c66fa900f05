//! Names of every environment variable read by the configuration loader.

pub const SERVER_CONFIG_FILE: &str = "QUIRE_CONFIG_FILE";
pub const SERVER_IP: &str = "QUIRE_SERVER_IP";
pub const SERVER_PORT: &str = "QUIRE_SERVER_PORT";
pub const SERVER_WORKERS: &str = "QUIRE_SERVER_WORKERS";

pub const DB_PRIMARY_URL: &str = "QUIRE_DB_PRIMARY_URL";
pub const DB_REPLICA_URL: &str = "QUIRE_DB_REPLICA_URL";
pub const DB_MAX_CONNECTIONS: &str = "QUIRE_DB_MAX_CONNECTIONS";
pub const DB_MIN_CONNECTIONS: &str = "QUIRE_DB_MIN_CONNECTIONS";
pub const DB_CONNECTION_TIMEOUT_SECS: &str = "QUIRE_DB_CONNECTION_TIMEOUT_SECS";

pub const STORE_RETRY_ATTEMPTS: &str = "QUIRE_STORE_RETRY_ATTEMPTS";
pub const STORE_RETRY_BASE_DELAY_MS: &str = "QUIRE_STORE_RETRY_BASE_DELAY_MS";

pub const JWT_SECRET: &str = "QUIRE_JWT_SECRET";

pub const LOG_STYLE: &str = "QUIRE_LOG_STYLE";
pub const LOG_TARGETS: &str = "QUIRE_LOG_TARGETS";
pub const LOG_FILE_DIRECTORY: &str = "QUIRE_LOG_FILE_DIRECTORY";
