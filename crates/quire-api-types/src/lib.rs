pub mod comment;
pub mod error;
pub mod post;
pub mod relation;
pub mod user;

pub use self::error::{Error, ErrorCategory};
pub use self::relation::{RelationKind, RelationStatus};
