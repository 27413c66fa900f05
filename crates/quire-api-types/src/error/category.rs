use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Broad classification of every error the Quire API can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// We don't know what is the cause of this error but the error we have
    /// in our server is logged for the developers.
    Unknown,

    /// The backing store could not be reached, even after retrying.
    Outage,

    /// The request is malformed or asks for something that is not allowed
    /// such as following yourself or replying to a reply.
    InvalidRequest,

    /// There is no authenticated user attached to the request.
    AccessDenied,

    NotFound,

    /// A uniqueness constraint rejected the write. Relation toggles recover
    /// from this internally, so clients should rarely see it.
    Conflict,
}

impl ErrorCategory {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Outage => "outage",
            Self::InvalidRequest => "invalid_request",
            Self::AccessDenied => "access_denied",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
        }
    }

    /// Parses the error code back into its category. Codes this version
    /// does not know about are treated as [`ErrorCategory::Unknown`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "outage" => Self::Outage,
            "invalid_request" => Self::InvalidRequest,
            "access_denied" => Self::AccessDenied,
            "not_found" => Self::NotFound,
            "conflict" => Self::Conflict,
            _ => Self::Unknown,
        }
    }

    /// Message used when an error does not carry its own.
    #[must_use]
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::Unknown => "Unexpected error has occurred. Please try again later.",
            Self::Outage => "Quire is not available at the moment. Please try again later.",
            Self::InvalidRequest => "Invalid request",
            Self::AccessDenied => "Unauthorized",
            Self::NotFound => "Not found",
            Self::Conflict => "Conflicting request",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ErrorCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCategory;
    use serde_test::Token;

    #[test]
    fn should_serialize_as_snake_case_code() {
        serde_test::assert_tokens(
            &ErrorCategory::InvalidRequest,
            &[Token::Str("invalid_request")],
        );
        serde_test::assert_tokens(&ErrorCategory::AccessDenied, &[Token::Str("access_denied")]);
    }

    #[test]
    fn should_fallback_to_unknown() {
        assert_eq!(ErrorCategory::from_code("teapot"), ErrorCategory::Unknown);
    }
}
