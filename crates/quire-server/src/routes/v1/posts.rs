use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use quire_error::ApiError;
use quire_model::id::PostId;

use crate::extract::Json;
use crate::services::posts::GetPostStats;
use crate::App;

pub async fn stats(app: App, Path(id): Path<i64>) -> Result<Response, ApiError> {
    let request = GetPostStats { id: PostId(id) };
    let response = request.perform(&app).await?;
    Ok(Json(response).into_response())
}
