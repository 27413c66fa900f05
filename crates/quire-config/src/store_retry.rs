use quire_error::ext::NoContextResultExt;
use quire_error::Result;
use quire_utils::env;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

use crate::{vars, ConfigParts};

/// How many times a store operation is attempted when the
/// store cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreRetry {
    /// **Environment variable**: `QUIRE_STORE_RETRY_ATTEMPTS`
    ///
    /// Total attempts including the first one.
    ///
    /// The default value is `3`, if not set.
    pub attempts: usize,

    /// **Environment variable**: `QUIRE_STORE_RETRY_BASE_DELAY_MS`
    ///
    /// Delay after the first failed attempt. The delay grows
    /// linearly after every failure (`base × failed attempts`).
    ///
    /// The default value is `1000` milliseconds, if not set.
    pub base_delay: Duration,
}

impl StoreRetry {
    pub(crate) fn from_partial(partial: PartialStoreRetry) -> Self {
        Self {
            attempts: partial.attempts.map_or(3, NonZeroUsize::get),
            base_delay: partial
                .base_delay_ms
                .map_or(Duration::from_millis(1000), Duration::from_millis),
        }
    }

    /// Retry settings used in tests. Delays are kept short so
    /// tests exercising outages finish quickly.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }
}

impl Default for StoreRetry {
    fn default() -> Self {
        Self::from_partial(PartialStoreRetry::default())
    }
}

#[derive(Debug, Error)]
#[error("Could not load store retry configuration")]
pub struct StoreRetryLoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialStoreRetry {
    pub attempts: Option<NonZeroUsize>,
    pub base_delay_ms: Option<u64>,
}

impl PartialStoreRetry {
    pub(crate) fn from_env() -> Result<Self, StoreRetryLoadError> {
        let attempts = env::var_opt_parsed::<NonZeroUsize>(vars::STORE_RETRY_ATTEMPTS)
            .change_context(StoreRetryLoadError)?;

        let base_delay_ms = env::var_opt_parsed::<u64>(vars::STORE_RETRY_BASE_DELAY_MS)
            .change_context(StoreRetryLoadError)?;

        Ok(Self {
            attempts,
            base_delay_ms,
        })
    }
}

impl ConfigParts for PartialStoreRetry {
    fn merge(self, other: Self) -> Self {
        Self {
            attempts: self.attempts.merge(other.attempts),
            base_delay_ms: self.base_delay_ms.merge(other.base_delay_ms),
        }
    }
}
