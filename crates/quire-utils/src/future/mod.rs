use quire_error::{ApiErrorCategory, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Re-runs a fallible operation until it succeeds, fails with an
/// error that is not worth retrying or runs out of attempts.
///
/// When every attempt fails, the error of the last attempt is returned
/// as is so callers can still inspect its category.
pub struct Retry<C> {
    builder: RetryBuilder<C>,
    tries: usize,
}

impl<O, E, F, C> Retry<C>
where
    F: Future<Output = Result<O, E>>,
    C: FnMut() -> F,
{
    #[must_use]
    #[inline(always)]
    pub fn builder(name: &'static str, callback: C) -> RetryBuilder<C> {
        RetryBuilder::new(name, callback)
    }

    pub async fn run(mut self) -> Result<O, E> {
        loop {
            self.tries += 1;
            debug!(tries = %self.tries, "(re)trying task {:?}...", self.builder.name);

            let error = match (self.builder.callback)().await {
                Ok(output) => return Ok(output),
                Err(error) => error,
            };

            if !self.builder.is_retryable(error.get_category()) {
                return Err(error);
            }

            if self.tries >= self.builder.max_attempts {
                warn!(
                    tries = %self.tries,
                    %error,
                    "operation {:?} failed too many times",
                    self.builder.name
                );
                return Err(error.attach_printable(format!(
                    "gave up after {} attempt(s)",
                    self.tries
                )));
            }

            let wait = self.builder.backoff.delay(self.builder.wait, self.tries);
            warn!(
                tries = %self.tries,
                %error,
                "operation {:?} failed. retrying for {wait:?}...",
                self.builder.name
            );
            tokio::time::sleep(wait).await;
        }
    }
}

/// How long to wait before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Waits the same amount of time after every failure.
    Constant,
    /// Waits `base × failed attempts` after every failure.
    Linear,
}

impl Backoff {
    #[must_use]
    pub fn delay(self, base: Duration, failed_attempts: usize) -> Duration {
        match self {
            Self::Constant => base,
            Self::Linear => {
                let factor = u32::try_from(failed_attempts).unwrap_or(u32::MAX);
                base.saturating_mul(factor)
            }
        }
    }
}

#[must_use]
pub struct RetryBuilder<C> {
    backoff: Backoff,
    callback: C,
    max_attempts: usize,
    name: &'static str,
    retry_on: Option<ApiErrorCategory>,
    wait: Duration,
}

impl<F, C: FnMut() -> F> RetryBuilder<C> {
    const DEFAULT_MAX_ATTEMPTS: usize = 3;
    const DEFAULT_WAIT: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new(name: &'static str, callback: C) -> Self {
        Self {
            backoff: Backoff::Constant,
            callback,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            name,
            retry_on: None,
            wait: Self::DEFAULT_WAIT,
        }
    }

    #[must_use]
    pub fn backoff(self, backoff: Backoff) -> Self {
        Self { backoff, ..self }
    }

    /// Total number of attempts including the first one.
    #[must_use]
    pub fn max_attempts(self, max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..self
        }
    }

    /// Only retries errors of the given category. Any other
    /// error is returned right away.
    #[must_use]
    pub fn only_on(self, category: ApiErrorCategory) -> Self {
        Self {
            retry_on: Some(category),
            ..self
        }
    }

    #[must_use]
    pub fn wait(self, duration: Duration) -> Self {
        Self {
            wait: duration,
            ..self
        }
    }

    #[must_use]
    pub fn build(self) -> Retry<C> {
        Retry {
            builder: self,
            tries: 0,
        }
    }

    fn is_retryable(&self, category: ApiErrorCategory) -> bool {
        self.retry_on.map_or(true, |expected| expected == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use thiserror::Error;
    use tokio::time::Instant;

    #[derive(Debug, Error)]
    #[error("store is unreachable")]
    struct Unreachable;

    #[test]
    fn test_linear_backoff() {
        let base = Duration::from_millis(1000);
        assert_eq!(Backoff::Linear.delay(base, 1), Duration::from_millis(1000));
        assert_eq!(Backoff::Linear.delay(base, 2), Duration::from_millis(2000));
        assert_eq!(Backoff::Constant.delay(base, 2), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn should_retry_outages_with_linear_backoff() {
        let calls = AtomicUsize::new(0);
        let started = Instant::now();

        let result = Retry::builder("flaky", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(Error::new(ApiErrorCategory::Outage, Unreachable))
            } else {
                Ok(n)
            }
        })
        .only_on(ApiErrorCategory::Outage)
        .backoff(Backoff::Linear)
        .build()
        .run()
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn should_return_last_error_when_exhausted() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), Unreachable> = Retry::builder("down", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::new(ApiErrorCategory::Outage, Unreachable))
        })
        .only_on(ApiErrorCategory::Outage)
        .build()
        .run()
        .await;

        let error = result.unwrap_err();
        assert_eq!(error.get_category(), ApiErrorCategory::Outage);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_retry_other_categories() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), Unreachable> = Retry::builder("missing", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::new(ApiErrorCategory::NotFound, Unreachable))
        })
        .only_on(ApiErrorCategory::Outage)
        .build()
        .run()
        .await;

        assert_eq!(
            result.unwrap_err().get_category(),
            ApiErrorCategory::NotFound
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
