use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use quire_error::{ApiError, ApiErrorCategory};
use quire_model::User;
use std::ops::Deref;

use crate::auth::Identity;
use crate::App;

/// An authenticated actor. Requests without a valid bearer
/// token are rejected with `access_denied`.
///
/// Use [`Identity`] on routes guests may also read.
#[derive(Clone)]
pub struct SessionUser {
    pub user: User,
}

impl SessionUser {
    #[must_use]
    pub fn into_inner(self) -> User {
        self.user
    }
}

impl Deref for SessionUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self { user }
    }
}

impl std::fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionUser")
            .field("id", &self.user.id)
            .finish_non_exhaustive()
    }
}

#[axum::async_trait]
impl FromRequestParts<App> for SessionUser {
    type Rejection = Response;

    #[tracing::instrument(skip_all, name = "extractors.session_user")]
    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        match Identity::resolve(parts, app).await {
            Ok(Identity::User(user)) => Ok(Self { user }),
            Ok(Identity::Guest) => Err(ApiError::new(ApiErrorCategory::AccessDenied).into_response()),
            Err(error) => Err(error.into_response()),
        }
    }
}
