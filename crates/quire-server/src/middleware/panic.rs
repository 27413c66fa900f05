use axum::response::{IntoResponse, Response};
use quire_error::Error;
use std::any::Any;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Route handler panicked")]
struct Panicked;

#[tracing::instrument(skip_all, name = "middleware.catch_panic")]
pub fn catch_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let data = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "<unknown>".into()
    };

    Error::unknown_generic(Panicked)
        .attach_printable(format!("message: {data}"))
        .into_api_error()
        .into_response()
}
