use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use quire_api_types::RelationKind;
use quire_error::ApiError;

use crate::auth::Identity;
use crate::extract::{Json, SessionUser};
use crate::services::relations::{GetRelationStatus, RelationTarget, ToggleRelation};
use crate::services::users::GetProfile;
use crate::App;

pub async fn profile(app: App, Path(name): Path<String>) -> Result<Response, ApiError> {
    let request = GetProfile { name: &name };
    let response = request.perform(&app).await?;
    Ok(Json(response).into_response())
}

pub async fn follow_status(
    app: App,
    identity: Identity,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let request = GetRelationStatus {
        kind: RelationKind::Follow,
        target: RelationTarget::User(name),
    };

    let response = request.perform(&app, &identity).await?;
    Ok(Json(response).into_response())
}

pub async fn toggle_follow(
    app: App,
    session_user: SessionUser,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let request = ToggleRelation {
        kind: RelationKind::Follow,
        target: RelationTarget::User(name),
    };

    let response = request.perform(&app, &session_user).await?;
    Ok(Json(response).into_response())
}
