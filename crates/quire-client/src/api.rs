use async_trait::async_trait;
use quire_api_types::{Error as ApiError, RelationKind, RelationStatus};
use std::fmt;
use thiserror::Error;

use crate::state::ToggleRejected;

/// One relation instance as addressed by the API: a kind and the id
/// (or handle, for follows) of its target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationRef {
    pub kind: RelationKind,
    pub target: String,
}

impl RelationRef {
    #[must_use]
    pub fn new(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }
}

impl fmt::Display for RelationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.target)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error.
    #[error(transparent)]
    Api(ApiError),
    /// The request never got an answer.
    #[error("Could not reach the server")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    Rejected(#[from] ToggleRejected),
    /// The engagement was torn down while waiting for the server.
    #[error("Engagement is no longer shown")]
    Detached,
}

/// Transport used by [`Engagement`] to talk to the Quire API.
///
/// [`Engagement`]: crate::Engagement
#[async_trait]
pub trait EngagementApi: Send + Sync {
    /// Fetches the authoritative state of the relation.
    async fn status(&self, relation: &RelationRef) -> Result<RelationStatus, ClientError>;

    /// Asks the server to make the relation `active` (or not). The
    /// server answers with the state after the change.
    async fn set(&self, relation: &RelationRef, active: bool)
        -> Result<RelationStatus, ClientError>;
}
