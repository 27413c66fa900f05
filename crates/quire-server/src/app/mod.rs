use axum::extract::{FromRequestParts, State};
use quire_error::{ApiErrorCategory, Result};
use quire_model::Gateway;
use quire_utils::future::{Backoff, Retry};
use std::future::Future;
use std::sync::Arc;

use self::private::AppInner;

#[derive(Clone, FromRequestParts)]
#[from_request(via(State))]
#[must_use]
pub struct App(Arc<AppInner>);

impl App {
    pub fn new(config: quire_config::Server, gateway: Arc<dyn Gateway>) -> Self {
        let (jwt_encode, jwt_decode) = Self::setup_jwt_keys(&config);
        let inner = Arc::new(AppInner {
            config: Arc::new(config),
            gateway,

            jwt_encode,
            jwt_decode,
        });

        Self(inner)
    }

    /// Creates a new [`App`] for testing purposes.
    pub fn new_for_tests(gateway: Arc<dyn Gateway>) -> Self {
        Self::new(quire_config::Server::for_tests(), gateway)
    }
}

impl App {
    /// Runs a store operation and retries it whenever the store
    /// is unreachable, up to the configured number of attempts.
    ///
    /// Any other kind of error is returned right away.
    pub async fn with_store<O, E, F, C>(&self, name: &'static str, callback: C) -> Result<O, E>
    where
        F: Future<Output = Result<O, E>>,
        C: FnMut() -> F,
    {
        let config = &self.config.store_retry;
        Retry::builder(name, callback)
            .backoff(Backoff::Linear)
            .max_attempts(config.attempts)
            .only_on(ApiErrorCategory::Outage)
            .wait(config.base_delay)
            .build()
            .run()
            .await
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl std::ops::Deref for App {
    type Target = AppInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub mod auth;

mod private;
