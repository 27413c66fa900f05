use serde::{Deserialize, Serialize};
use std::fmt;

mod category;
pub use self::category::ErrorCategory;

#[cfg(feature = "server")]
mod axum;

/// Error object returned by every failing Quire API endpoint.
///
/// It is serialized as `{"code": "...", "error": "..."}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[must_use]
pub struct Error {
    #[serde(rename = "code")]
    pub category: ErrorCategory,
    #[serde(rename = "error")]
    pub message: String,
}

impl Error {
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            category,
            message: category.default_message().to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(ErrorCategory::Unknown)
    }

    pub fn message(self, message: impl Into<String>) -> Self {
        Self {
            category: self.category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
    }
}

impl Eq for Error {}

impl std::hash::Hash for Error {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.category.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_with_error_field() {
        let error = Error::new(ErrorCategory::AccessDenied);
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "code": "access_denied", "error": "Unauthorized" })
        );

        let error = Error::new(ErrorCategory::NotFound).message("Could not find post specified");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "code": "not_found", "error": "Could not find post specified" })
        );
    }

    #[test]
    fn should_deserialize_error_body() {
        let error: Error =
            serde_json::from_str(r#"{"code":"invalid_request","error":"blank"}"#).unwrap();

        assert_eq!(error.category, ErrorCategory::InvalidRequest);
        assert_eq!(error.message, "blank");
    }
}
