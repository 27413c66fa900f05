use super::*;
use crate::logging::LoggingStyle;
use std::time::Duration;

#[test]
fn locate() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    std::fs::create_dir_all(app.join("server")).unwrap();
    std::fs::create_dir_all(app.join("no-config")).unwrap();
    std::fs::write(app.join("quire.toml"), b"").unwrap();
    std::fs::write(app.join("server/quire.toml"), b"").unwrap();

    // it should go from app/server/ and take app/server/quire.toml
    assert_eq!(
        Server::locate(Some(&app.join("server"))),
        Some(app.join("server/quire.toml"))
    );

    // it should go with app/quire.toml if the directory has no quire.toml file
    assert_eq!(
        Server::locate(Some(&app.join("no-config"))),
        Some(app.join("quire.toml"))
    );

    // it should return None if the directory does not exists
    assert_eq!(Server::locate(Some(&app.join("error/error"))), None);
}

#[test]
fn should_read_config_file() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("quire.toml");
    std::fs::write(
        &path,
        r#"
port = 9000

[logging]
style = "json"

[db]
primary_url = "postgres://localhost/quire"
max_connections = 4

[auth]
jwt_secret = "hello"

[store_retry]
attempts = 5
base_delay_ms = 250
"#,
    )
    .unwrap();

    let partial = PartialServer::from_toml(&path).unwrap();
    let config = Server::from_partial(partial, Some(path.clone())).unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.logging.style, LoggingStyle::Json);
    assert_eq!(config.database.primary_url.as_str(), "postgres://localhost/quire");
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.auth.jwt_secret.as_str(), "hello");
    assert_eq!(config.store_retry.attempts, 5);
    assert_eq!(config.store_retry.base_delay, Duration::from_millis(250));
    assert_eq!(config.file_location, Some(path));
}

#[test]
fn should_prefer_env_over_file() {
    let from_env = PartialServer {
        port: Some(3000),
        auth: PartialAuth {
            jwt_secret: Some("from-env".into()),
        },
        ..Default::default()
    };
    let from_file = PartialServer {
        port: Some(9000),
        database: PartialDatabasePools {
            primary_url: Some("postgres://db/quire".into()),
            ..Default::default()
        },
        auth: PartialAuth {
            jwt_secret: Some("from-file".into()),
        },
        ..Default::default()
    };

    let config = Server::from_partial(from_env.merge(from_file), None).unwrap();
    assert_eq!(config.port, 3000);
    assert_eq!(config.auth.jwt_secret.as_str(), "from-env");
    assert_eq!(config.database.primary_url.as_str(), "postgres://db/quire");
    assert_eq!(config.store_retry, StoreRetry::default());
}

#[test]
fn should_require_jwt_secret() {
    let partial = PartialServer {
        database: PartialDatabasePools {
            primary_url: Some("postgres://db/quire".into()),
            ..Default::default()
        },
        ..Default::default()
    };

    let error = Server::from_partial(partial, None).unwrap_err();
    assert!(error.has::<crate::auth::AuthLoadError>());
}
