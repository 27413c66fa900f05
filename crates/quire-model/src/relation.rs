use chrono::NaiveDateTime;
use quire_api_types::RelationKind;

use crate::id::{PostId, RelationId, UserId};

/// A directed edge from an actor to a target. Only one edge may
/// exist for every [`RelationKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: RelationId,
    pub created: NaiveDateTime,
    pub kind: RelationKind,
    pub source_id: UserId,
    /// Post id for likes and bookmarks, user id for follows.
    pub target_id: i64,
}

impl Relation {
    #[must_use]
    pub fn key(&self) -> RelationKey {
        RelationKey {
            kind: self.kind,
            source_id: self.source_id,
            target_id: self.target_id,
        }
    }
}

/// Identifies an edge regardless of whether it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationKey {
    pub kind: RelationKind,
    pub source_id: UserId,
    pub target_id: i64,
}

impl RelationKey {
    #[must_use]
    pub fn like(source_id: UserId, post_id: PostId) -> Self {
        Self {
            kind: RelationKind::Like,
            source_id,
            target_id: post_id.0,
        }
    }

    #[must_use]
    pub fn bookmark(source_id: UserId, post_id: PostId) -> Self {
        Self {
            kind: RelationKind::Bookmark,
            source_id,
            target_id: post_id.0,
        }
    }

    #[must_use]
    pub fn follow(source_id: UserId, target_id: UserId) -> Self {
        Self {
            kind: RelationKind::Follow,
            source_id,
            target_id: target_id.0,
        }
    }
}
