use quire_api_types::RelationStatus;
use thiserror::Error;

/// State of one relation instance as displayed to the viewer.
///
/// At most one toggle can be in flight: it is represented by the
/// `Pending` variant, which remembers what to go back to if the
/// server rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementState {
    Idle {
        active: bool,
        count: u64,
    },
    Pending {
        /// Optimistic guess shown while waiting for the server.
        shown: RelationStatus,
        /// State before the toggle was issued.
        previous: RelationStatus,
    },
}

/// A toggle that was just started. Tells the caller which state to
/// ask the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingToggle {
    pub activate: bool,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Another toggle is still waiting for the server")]
pub struct ToggleRejected;

impl EngagementState {
    #[must_use]
    pub const fn idle(status: RelationStatus) -> Self {
        Self::Idle {
            active: status.active,
            count: status.count,
        }
    }

    /// What the viewer currently sees.
    #[must_use]
    pub const fn displayed(&self) -> RelationStatus {
        match *self {
            Self::Idle { active, count } => RelationStatus::new(active, count),
            Self::Pending { shown, .. } => shown,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Flips the displayed state right away and moves the count by
    /// one as a provisional estimate.
    pub fn begin_toggle(&mut self) -> Result<PendingToggle, ToggleRejected> {
        let Self::Idle { active, count } = *self else {
            return Err(ToggleRejected);
        };

        let previous = RelationStatus::new(active, count);
        let shown = if active {
            RelationStatus::new(false, count.saturating_sub(1))
        } else {
            RelationStatus::new(true, count.saturating_add(1))
        };

        *self = Self::Pending { shown, previous };
        Ok(PendingToggle { activate: !active })
    }

    /// Takes the server's answer as the truth, discarding any estimate.
    pub fn settle(&mut self, status: RelationStatus) {
        *self = Self::idle(status);
    }

    /// Goes back to the state before the pending toggle.
    pub fn revert(&mut self) {
        if let Self::Pending { previous, .. } = *self {
            *self = Self::idle(previous);
        }
    }
}

impl Default for EngagementState {
    fn default() -> Self {
        Self::idle(RelationStatus::new(false, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_flip_optimistically() {
        let mut state = EngagementState::idle(RelationStatus::new(false, 10));
        let toggle = state.begin_toggle().unwrap();

        assert!(toggle.activate);
        assert!(state.is_pending());
        assert_eq!(state.displayed(), RelationStatus::new(true, 11));

        let mut state = EngagementState::idle(RelationStatus::new(true, 1));
        assert!(!state.begin_toggle().unwrap().activate);
        assert_eq!(state.displayed(), RelationStatus::new(false, 0));
    }

    #[test]
    fn should_reject_second_toggle_while_pending() {
        let mut state = EngagementState::idle(RelationStatus::new(false, 10));
        let _toggle = state.begin_toggle().unwrap();
        let before = state;

        assert_eq!(state.begin_toggle(), Err(ToggleRejected));
        assert_eq!(state, before);
    }

    #[test]
    fn should_prefer_server_count() {
        let mut state = EngagementState::idle(RelationStatus::new(false, 10));
        let _toggle = state.begin_toggle().unwrap();

        state.settle(RelationStatus::new(true, 12));
        assert_eq!(state, EngagementState::Idle { active: true, count: 12 });
    }

    #[test]
    fn should_revert_to_exact_previous_state() {
        let mut state = EngagementState::idle(RelationStatus::new(true, 0));
        let _toggle = state.begin_toggle().unwrap();
        assert_eq!(state.displayed(), RelationStatus::new(false, 0));

        state.revert();
        assert_eq!(state, EngagementState::Idle { active: true, count: 0 });

        // nothing to revert when idle
        state.revert();
        assert_eq!(state.displayed(), RelationStatus::new(true, 0));
    }
}
