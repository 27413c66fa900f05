use quire_error::ext::NoContextResultExt;
use quire_error::{Error, Result};
use quire_utils::{env, Sensitive};
use serde::Deserialize;
use thiserror::Error;

use crate::{vars, ConfigParts};

#[derive(Debug, Clone)]
pub struct Auth {
    /// **Environment variable**: `QUIRE_JWT_SECRET`
    ///
    /// Secret used to verify bearer tokens sent by clients. It
    /// must be shared with whatever service issues them.
    pub jwt_secret: Sensitive<String>,
}

impl Auth {
    pub(crate) fn from_partial(partial: PartialAuth) -> Result<Self, AuthLoadError> {
        match partial.jwt_secret {
            Some(secret) if !secret.trim().is_empty() => Ok(Self {
                jwt_secret: Sensitive::new(secret),
            }),
            _ => Err(Error::unknown(AuthLoadError)
                .attach_printable(format!("{} is required", vars::JWT_SECRET))),
        }
    }

    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: Sensitive::new("quire-test-secret".into()),
        }
    }
}

#[derive(Debug, Error)]
#[error("Could not load authentication configuration")]
pub struct AuthLoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialAuth {
    pub jwt_secret: Option<String>,
}

impl PartialAuth {
    pub(crate) fn from_env() -> Result<Self, AuthLoadError> {
        let jwt_secret = env::var_opt(vars::JWT_SECRET).change_context(AuthLoadError)?;
        Ok(Self { jwt_secret })
    }
}

impl ConfigParts for PartialAuth {
    fn merge(self, other: Self) -> Self {
        Self {
            jwt_secret: self.jwt_secret.merge(other.jwt_secret),
        }
    }
}
