use quire_api_types::{RelationKind, RelationStatus};
use quire_error::{ApiError, ApiErrorCategory};
use quire_model::id::{PostId, UserId};
use quire_model::RelationKey;
use tracing::debug;

use crate::auth::Identity;
use crate::extract::SessionUser;
use crate::App;

/// Something a relation can point at, as named by API callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationTarget {
    Post(PostId),
    /// An actor referred to by their handle.
    User(String),
}

impl RelationTarget {
    /// Interprets a path segment according to what `kind` points at.
    pub fn parse(kind: RelationKind, segment: &str) -> Result<Self, ApiError> {
        if kind.targets_actor() {
            return Ok(Self::User(segment.to_string()));
        }

        segment
            .parse::<i64>()
            .map(|id| Self::Post(PostId(id)))
            .map_err(|_| ApiError::new(ApiErrorCategory::InvalidRequest).message("Invalid post id"))
    }
}

/// Looks up the raw id of the target so it can be used in a [`RelationKey`].
async fn resolve_target(
    app: &App,
    kind: RelationKind,
    target: &RelationTarget,
) -> Result<i64, ApiError> {
    match (target, kind.targets_actor()) {
        (RelationTarget::Post(id), false) => {
            let id = *id;
            let post = app
                .with_store("services.relations.find_post", || app.gateway.find_post(id))
                .await?;

            post.map(|v| v.id.0).ok_or_else(|| {
                ApiError::new(ApiErrorCategory::NotFound).message("Could not find post specified")
            })
        }
        (RelationTarget::User(name), true) => {
            let user = app
                .with_store("services.relations.find_user", || {
                    app.gateway.find_user_by_name(name)
                })
                .await?;

            user.map(|v| v.id.0).ok_or_else(|| {
                ApiError::new(ApiErrorCategory::NotFound).message("Could not find user specified")
            })
        }
        _ => Err(ApiError::new(ApiErrorCategory::InvalidRequest)
            .message(format!("Cannot {kind} this kind of target"))),
    }
}

/// One edge between the session user and a resolved target. Every
/// store call made through it is retried on outages.
struct Edge<'a> {
    app: &'a App,
    key: RelationKey,
}

impl<'a> Edge<'a> {
    async fn resolve(
        app: &'a App,
        session_user: &SessionUser,
        kind: RelationKind,
        target: &RelationTarget,
    ) -> Result<Edge<'a>, ApiError> {
        let target_id = resolve_target(app, kind, target).await?;
        if kind.forbids_self_target() && session_user.id.0 == target_id {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message(format!("You cannot {kind} yourself")));
        }

        let key = RelationKey {
            kind,
            source_id: session_user.id,
            target_id,
        };

        Ok(Self { app, key })
    }

    async fn exists(&self) -> Result<bool, ApiError> {
        let key = self.key;
        let relation = self
            .app
            .with_store("services.relations.find", || self.app.gateway.find_relation(key))
            .await?;

        Ok(relation.is_some())
    }

    async fn create(&self) -> Result<(), ApiError> {
        let key = self.key;
        let result = self
            .app
            .with_store("services.relations.insert", || {
                self.app.gateway.insert_relation(key)
            })
            .await;

        match result {
            Ok(..) => Ok(()),
            // Someone else made the same edge in the meantime.
            Err(error) if error.get_category() == ApiErrorCategory::Conflict => {
                debug!(kind = %key.kind, "relation was created concurrently");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn remove(&self) -> Result<(), ApiError> {
        let key = self.key;
        let deleted = self
            .app
            .with_store("services.relations.delete", || {
                self.app.gateway.delete_relation(key)
            })
            .await?;

        if !deleted {
            debug!(kind = %key.kind, "relation was removed concurrently");
        }
        Ok(())
    }

    /// Re-reads the edge and the live count from the store.
    async fn status(&self) -> Result<RelationStatus, ApiError> {
        let active = self.exists().await?;
        let count = count_edges(self.app, self.key.kind, self.key.target_id).await?;
        Ok(RelationStatus::new(active, count))
    }
}

async fn count_edges(app: &App, kind: RelationKind, target_id: i64) -> Result<u64, ApiError> {
    let count = app
        .with_store("services.relations.count", || {
            app.gateway.count_relations(kind, target_id)
        })
        .await?;

    Ok(count)
}

/// Reads whether the caller has a relation with the target and how
/// many relations of that kind point at it.
///
/// Guests always see `active = false` with the live count.
#[derive(Debug)]
pub struct GetRelationStatus {
    pub kind: RelationKind,
    pub target: RelationTarget,
}

impl GetRelationStatus {
    #[tracing::instrument(skip(app), name = "services.relations.status")]
    pub async fn perform(self, app: &App, identity: &Identity) -> Result<RelationStatus, ApiError> {
        let target_id = resolve_target(app, self.kind, &self.target).await?;
        let count = count_edges(app, self.kind, target_id).await?;

        let Some(user) = identity.user() else {
            return Ok(RelationStatus::new(false, count));
        };

        let key = RelationKey {
            kind: self.kind,
            source_id: user.id,
            target_id,
        };
        let relation = app
            .with_store("services.relations.find", || app.gateway.find_relation(key))
            .await?;

        Ok(RelationStatus::new(relation.is_some(), count))
    }
}

/// Flips the relation between the session user and the target.
#[derive(Debug)]
pub struct ToggleRelation {
    pub kind: RelationKind,
    pub target: RelationTarget,
}

impl ToggleRelation {
    #[tracing::instrument(skip(app), name = "services.relations.toggle")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<RelationStatus, ApiError> {
        let edge = Edge::resolve(app, session_user, self.kind, &self.target).await?;
        if edge.exists().await? {
            edge.remove().await?;
        } else {
            edge.create().await?;
        }
        edge.status().await
    }
}

/// Makes sure the relation between the session user and the target
/// is in the given state. Repeating it changes nothing.
#[derive(Debug)]
pub struct SetRelation {
    pub kind: RelationKind,
    pub target: RelationTarget,
    pub active: bool,
}

impl SetRelation {
    #[tracing::instrument(skip(app), name = "services.relations.set")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<RelationStatus, ApiError> {
        let edge = Edge::resolve(app, session_user, self.kind, &self.target).await?;
        if self.active {
            edge.create().await?;
        } else {
            edge.remove().await?;
        }
        edge.status().await
    }
}

/// Counts of relations an actor has made towards others.
pub(crate) async fn count_from(
    app: &App,
    kind: RelationKind,
    source_id: UserId,
) -> Result<u64, ApiError> {
    let count = app
        .with_store("services.relations.count_from", || {
            app.gateway.count_relations_from(kind, source_id)
        })
        .await?;

    Ok(count)
}
