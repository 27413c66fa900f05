use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use quire_api_types::RelationKind;
use quire_error::{ApiError, ApiErrorCategory};

use crate::auth::Identity;
use crate::extract::{Json, SessionUser};
use crate::services::relations::{GetRelationStatus, RelationTarget, SetRelation};
use crate::App;

fn parse_path(kind: &str, target: &str) -> Result<(RelationKind, RelationTarget), ApiError> {
    let kind = kind.parse::<RelationKind>().map_err(|_| {
        ApiError::new(ApiErrorCategory::NotFound).message("Unknown relation kind")
    })?;

    let target = RelationTarget::parse(kind, target)?;
    Ok((kind, target))
}

pub async fn status(
    app: App,
    identity: Identity,
    Path((kind, target)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let (kind, target) = parse_path(&kind, &target)?;
    let request = GetRelationStatus { kind, target };

    let response = request.perform(&app, &identity).await?;
    Ok(Json(response).into_response())
}

pub async fn activate(
    app: App,
    session_user: SessionUser,
    Path((kind, target)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    set(app, session_user, &kind, &target, true).await
}

pub async fn deactivate(
    app: App,
    session_user: SessionUser,
    Path((kind, target)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    set(app, session_user, &kind, &target, false).await
}

async fn set(
    app: App,
    session_user: SessionUser,
    kind: &str,
    target: &str,
    active: bool,
) -> Result<Response, ApiError> {
    let (kind, target) = parse_path(kind, target)?;
    let request = SetRelation {
        kind,
        target,
        active,
    };

    let response = request.perform(&app, &session_user).await?;
    Ok(Json(response).into_response())
}
