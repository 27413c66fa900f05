use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::ops::Deref;

/// Keeps the raw sensitive data in memory but it cannot be
/// accidentally leaked through the console or logs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.0
    }
}

impl<T> Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<hidden>")
    }
}

impl<T> Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<hidden>")
    }
}

impl<T> Deref for Sensitive<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> AsRef<T> for Sensitive<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: AsRef<str>> Sensitive<T> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Sensitive;
    use serde_test::Token;

    #[test]
    fn test_serde_impl() {
        serde_test::assert_tokens(&Sensitive::new(25_i64), &[Token::I64(25)]);
    }

    #[test]
    fn test_fmt() {
        let value = Sensitive::new("alice");
        assert_eq!(value.to_string(), "<hidden>");
        assert_eq!(format!("{value:?}"), "<hidden>");
        assert_eq!(value.as_str(), "alice");
    }
}
