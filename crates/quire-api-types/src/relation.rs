use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every kind of directed edge an actor can toggle on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Actor likes a post.
    Like,
    /// Actor bookmarks a post.
    Bookmark,
    /// Actor follows another actor.
    Follow,
}

impl RelationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Bookmark => "bookmark",
            Self::Follow => "follow",
        }
    }

    /// Whether the target of this relation is another actor rather than a post.
    #[must_use]
    pub const fn targets_actor(&self) -> bool {
        matches!(self, Self::Follow)
    }

    /// Whether an actor is not allowed to point this relation at themselves.
    ///
    /// Only follows are restricted. Liking or bookmarking your own post is fine.
    #[must_use]
    pub const fn forbids_self_target(&self) -> bool {
        matches!(self, Self::Follow)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown relation kind {0:?}")]
pub struct UnknownRelationKind(pub String);

impl FromStr for RelationKind {
    type Err = UnknownRelationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" | "likes" => Ok(Self::Like),
            "bookmark" | "bookmarks" => Ok(Self::Bookmark),
            "follow" | "follows" => Ok(Self::Follow),
            _ => Err(UnknownRelationKind(s.to_string())),
        }
    }
}

/// Authoritative state of one relation instance as seen by one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RelationStatus {
    /// Whether the edge from the actor to the target exists.
    pub active: bool,
    /// Live number of edges of this kind pointing at the target.
    pub count: u64,
}

impl RelationStatus {
    #[must_use]
    pub const fn new(active: bool, count: u64) -> Self {
        Self { active, count }
    }
}
