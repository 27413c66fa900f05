mod error;
mod fmt;
mod internal;

pub mod ext;

pub use self::error::Error;
pub use self::internal::{Context, NoContext};
pub use quire_api_types::{Error as ApiError, ErrorCategory as ApiErrorCategory};

pub type Result<T, C = NoContext> = std::result::Result<T, Error<C>>;
