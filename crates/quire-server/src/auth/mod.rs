pub mod jwt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use axum_extra::TypedHeader;
use quire_error::{ApiError, ApiErrorCategory};
use quire_model::id::UserId;
use quire_model::User;
use std::fmt::Debug;
use tracing::debug;

use crate::App;

/// Identity of whoever sent the request, taken from the bearer
/// token in the `Authorization` header.
///
/// - `Guest` - No token was given, or on read-only routes, one that
///   did not resolve. Guests may read but not write.
/// - `User` - An actor known to the store.
pub enum Identity {
    Guest,
    User(User),
}

impl Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest => f.write_str("Guest"),
            Self::User(user) => f.debug_struct("User").field("id", &user.id).finish(),
        }
    }
}

impl Identity {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Guest => None,
            Self::User(user) => Some(user),
        }
    }
}

impl Identity {
    /// Resolves the bearer token of a request into an actor.
    ///
    /// A missing `Authorization` header resolves into [`Identity::Guest`].
    /// Unreadable, expired or forged tokens and tokens of actors that no
    /// longer exist are rejected with `access_denied`.
    pub(crate) async fn resolve(parts: &mut Parts, app: &App) -> Result<Self, ApiError> {
        let header_result: Result<TypedHeader<Authorization<Bearer>>, _> =
            TypedHeader::from_request_parts(parts, app).await;

        let token = match header_result {
            Ok(header) => header.token().to_string(),
            Err(error) if matches!(error.reason(), TypedHeaderRejectionReason::Missing) => {
                return Ok(Self::Guest)
            }
            Err(..) => return Err(ApiError::new(ApiErrorCategory::AccessDenied)),
        };

        let claims = jwt::LoginClaims::decode(app, &token)?;
        let id = UserId(claims.sub);
        let user = app
            .with_store("app.find_session_user", || app.gateway.find_user(id))
            .await?;

        user.map(Self::User)
            .ok_or_else(|| ApiError::new(ApiErrorCategory::AccessDenied))
    }
}

/// Read-only routes treat anyone whose token does not resolve as
/// a guest. Failures to reach the store are still reported.
///
/// Use [`SessionUser`] where a valid session is required.
///
/// [`SessionUser`]: crate::extract::SessionUser
#[axum::async_trait]
impl FromRequestParts<App> for Identity {
    type Rejection = Response;

    #[tracing::instrument(skip_all, name = "extractors.identity")]
    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        match Self::resolve(parts, app).await {
            Ok(identity) => Ok(identity),
            Err(error) if error.category == ApiErrorCategory::AccessDenied => {
                debug!("token did not resolve into an actor, continuing as guest");
                Ok(Self::Guest)
            }
            Err(error) => Err(error.into_response()),
        }
    }
}
