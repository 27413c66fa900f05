use quire_api_types::RelationStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::api::{ClientError, EngagementApi, RelationRef};
use crate::state::EngagementState;

/// Drives the state of one relation instance shown to the viewer.
///
/// Every instance (kind and target) gets its own [`Engagement`]. They
/// share nothing, so toggles on different instances never wait on
/// each other.
pub struct Engagement<A> {
    api: A,
    relation: RelationRef,
    state: Mutex<EngagementState>,
    alive: AtomicBool,
}

impl<A: EngagementApi> Engagement<A> {
    #[must_use]
    pub fn new(api: A, relation: RelationRef, initial: RelationStatus) -> Self {
        Self {
            api,
            relation,
            state: Mutex::new(EngagementState::idle(initial)),
            alive: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn relation(&self) -> &RelationRef {
        &self.relation
    }

    #[must_use]
    pub fn state(&self) -> EngagementState {
        *self.lock()
    }

    #[must_use]
    pub fn displayed(&self) -> RelationStatus {
        self.lock().displayed()
    }

    /// Flips the relation optimistically and reconciles with the server.
    ///
    /// On failure the state before the toggle is restored and the
    /// error is handed back so it can be shown to the viewer.
    #[tracing::instrument(skip(self), fields(relation = %self.relation), name = "engagement.toggle")]
    pub async fn toggle(&self) -> Result<RelationStatus, ClientError> {
        self.ensure_alive()?;

        let toggle = self.lock().begin_toggle()?;
        let result = self.api.set(&self.relation, toggle.activate).await;
        self.ensure_alive()?;

        let mut state = self.lock();
        match result {
            Ok(status) => {
                debug!(?status, "toggle confirmed");
                state.settle(status);
                Ok(status)
            }
            Err(error) => {
                warn!(%error, "toggle failed, reverting");
                state.revert();
                Err(error)
            }
        }
    }

    /// Fetches the authoritative state, for example when the instance
    /// is first shown. It is not applied while a toggle is pending.
    #[tracing::instrument(skip(self), fields(relation = %self.relation), name = "engagement.refresh")]
    pub async fn refresh(&self) -> Result<RelationStatus, ClientError> {
        self.ensure_alive()?;

        let status = self.api.status(&self.relation).await?;
        self.ensure_alive()?;

        let mut state = self.lock();
        if !state.is_pending() {
            state.settle(status);
        }
        Ok(state.displayed())
    }

    /// Marks the instance as gone. Answers arriving afterwards are
    /// discarded.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn ensure_alive(&self) -> Result<(), ClientError> {
        if self.is_alive() {
            Ok(())
        } else {
            debug!("engagement was torn down, discarding");
            Err(ClientError::Detached)
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngagementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> std::fmt::Debug for Engagement<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engagement")
            .field("relation", &self.relation)
            .field("alive", &self.alive)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RelationRef;
    use crate::state::ToggleRejected;
    use async_trait::async_trait;
    use quire_api_types::{Error as ApiError, ErrorCategory, RelationKind};
    use std::collections::VecDeque;

    /// Answers calls with responses queued up front.
    #[derive(Default)]
    struct ScriptedApi {
        responses: Mutex<VecDeque<Result<RelationStatus, ClientError>>>,
        requested: Mutex<Vec<bool>>,
    }

    impl ScriptedApi {
        fn answering(responses: Vec<Result<RelationStatus, ClientError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requested: Mutex::default(),
            }
        }

        fn next(&self) -> Result<RelationStatus, ClientError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    #[async_trait]
    impl EngagementApi for ScriptedApi {
        async fn status(&self, _relation: &RelationRef) -> Result<RelationStatus, ClientError> {
            tokio::task::yield_now().await;
            self.next()
        }

        async fn set(
            &self,
            _relation: &RelationRef,
            active: bool,
        ) -> Result<RelationStatus, ClientError> {
            self.requested.lock().unwrap().push(active);
            tokio::task::yield_now().await;
            self.next()
        }
    }

    fn like_on_post(api: ScriptedApi, initial: RelationStatus) -> Engagement<ScriptedApi> {
        Engagement::new(api, RelationRef::new(RelationKind::Like, "12"), initial)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_show_server_count_over_estimate() {
        let api = ScriptedApi::answering(vec![Ok(RelationStatus::new(true, 12))]);
        let engagement = like_on_post(api, RelationStatus::new(false, 10));

        let status = engagement.toggle().await.unwrap();
        assert_eq!(status, RelationStatus::new(true, 12));
        assert_eq!(engagement.displayed(), RelationStatus::new(true, 12));
        assert_eq!(*engagement.api.requested.lock().unwrap(), vec![true]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_revert_on_failure() {
        let api = ScriptedApi::answering(vec![
            Err(ClientError::Transport("connection reset".into())),
            Err(ClientError::Api(ApiError::new(ErrorCategory::AccessDenied))),
        ]);
        let engagement = like_on_post(api, RelationStatus::new(false, 10));

        let error = engagement.toggle().await.unwrap_err();
        assert!(matches!(error, ClientError::Transport(..)));
        assert_eq!(
            engagement.state(),
            EngagementState::Idle {
                active: false,
                count: 10
            }
        );

        let error = engagement.toggle().await.unwrap_err();
        assert!(matches!(error, ClientError::Api(e) if e.category == ErrorCategory::AccessDenied));
        assert_eq!(engagement.displayed(), RelationStatus::new(false, 10));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_toggle_while_pending() {
        let api = ScriptedApi::answering(vec![Ok(RelationStatus::new(true, 11))]);
        let engagement = like_on_post(api, RelationStatus::new(false, 10));

        let (first, second) = tokio::join!(engagement.toggle(), async {
            assert_eq!(engagement.displayed(), RelationStatus::new(true, 11));
            engagement.toggle().await
        });

        assert_eq!(first.unwrap(), RelationStatus::new(true, 11));
        assert!(matches!(second, Err(ClientError::Rejected(ToggleRejected))));
        assert_eq!(engagement.api.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_discard_answers_after_teardown() {
        let api = ScriptedApi::answering(vec![Ok(RelationStatus::new(true, 3))]);
        let engagement = like_on_post(api, RelationStatus::new(false, 2));

        let (result, ()) = tokio::join!(engagement.refresh(), async {
            engagement.teardown();
        });

        assert!(matches!(result, Err(ClientError::Detached)));
        assert_eq!(engagement.displayed(), RelationStatus::new(false, 2));
        assert!(matches!(engagement.toggle().await, Err(ClientError::Detached)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_refresh_when_idle() {
        let api = ScriptedApi::answering(vec![Ok(RelationStatus::new(true, 7))]);
        let engagement = like_on_post(api, RelationStatus::new(false, 0));

        let status = engagement.refresh().await.unwrap();
        assert_eq!(status, RelationStatus::new(true, 7));
        assert_eq!(engagement.state(), EngagementState::Idle { active: true, count: 7 });
    }
}
