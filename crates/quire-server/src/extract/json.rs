use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::{BufMut, BytesMut};
use quire_error::{ApiError, ApiErrorCategory, Error};
use thiserror::Error;
use tracing::warn;

/// Local version of [`axum::Json`] that answers with the Quire API
/// error schema whenever the body cannot be deserialized.
pub struct Json<T>(pub T);

#[derive(Debug, Error)]
#[error("Could not serialize response to JSON body")]
struct JsonSerializationError;

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        let mut buf = BytesMut::with_capacity(128).writer();
        match serde_json::to_writer(&mut buf, &self.0) {
            Ok(()) => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                buf.into_inner().freeze(),
            )
                .into_response(),
            Err(error) => Error::unknown_generic(error)
                .change_context_slient(JsonSerializationError)
                .into_api_error()
                .into_response(),
        }
    }
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let error = match axum::Json::<T>::from_request(req, state).await {
            Ok(inner) => return Ok(Json(inner.0)),
            Err(error) => error,
        };

        let message = match error {
            JsonRejection::JsonDataError(error) => error.body_text(),
            JsonRejection::JsonSyntaxError(error) => error.body_text(),
            JsonRejection::MissingJsonContentType(..) => "Invalid content type".to_string(),
            JsonRejection::BytesRejection(error) => error.body_text(),
            inner => {
                warn!("unhandled axum::JsonRejection category: {inner:?}");
                return Err(Error::unknown_generic(inner)
                    .into_api_error()
                    .into_response());
            }
        };

        Err(ApiError::new(ApiErrorCategory::InvalidRequest)
            .message(message)
            .into_response())
    }
}
