//! Client side of Quire engagement: one optimistic state machine per
//! relation shown on screen, reconciled with what the server reports.
mod api;
mod engagement;
mod state;

pub mod http;

pub use self::api::{ClientError, EngagementApi, RelationRef};
pub use self::engagement::Engagement;
pub use self::state::{EngagementState, PendingToggle, ToggleRejected};
pub use quire_api_types::{RelationKind, RelationStatus};
