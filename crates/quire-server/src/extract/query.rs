use axum::extract::rejection::QueryRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use quire_error::{ApiError, ApiErrorCategory, Error};
use tracing::warn;

/// Local version of [`axum::extract::Query`] that answers with the
/// Quire API error schema on malformed query strings.
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(inner) => Ok(Self(inner.0)),
            Err(QueryRejection::FailedToDeserializeQueryString(error)) => {
                Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                    .message(error.body_text())
                    .into_response())
            }
            Err(inner) => {
                warn!("unhandled axum::QueryRejection category: {inner:?}");
                Err(Error::unknown_generic(inner)
                    .into_api_error()
                    .into_response())
            }
        }
    }
}
