use axum_test::TestServer;
use quire_error::ApiError;
use quire_model::MemoryGateway;
use std::fmt::Debug;
use std::sync::Arc;

use crate::App;

pub mod users;

pub trait TestResultExt {
    /// Serializes the [Quire API error] into [`serde_json::Value`].
    ///
    /// ## Panics
    /// It panics if the result is [`Ok`].
    ///
    /// [Quire API error]: ApiError
    fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for std::result::Result<T, ApiError> {
    fn expect_error_json(self) -> serde_json::Value {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => serde_json::to_value(error).unwrap(),
        }
    }
}

/// Builds an [`App`] backed by an empty in-memory store.
///
/// The store is handed back as well so tests can seed it
/// and inject failures.
#[must_use]
pub fn build_test_app() -> (App, Arc<MemoryGateway>) {
    quire_tracing::init_for_tests();

    let gateway = Arc::new(MemoryGateway::new());
    let app = App::new_for_tests(gateway.clone());
    (app, gateway)
}

#[must_use]
pub fn build_test_server(app: &App) -> TestServer {
    let router = crate::build_axum_router(app.clone());
    TestServer::new(router).unwrap()
}
