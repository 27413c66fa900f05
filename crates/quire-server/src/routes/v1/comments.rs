use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_api_types::comment::{CreateComment, ListComments};
use quire_error::ApiError;
use quire_model::id::{CommentId, PostId};

use crate::extract::{Json, Query, SessionUser};
use crate::{services, App};

pub async fn list(app: App, Query(query): Query<ListComments>) -> Result<Response, ApiError> {
    let request = services::comments::ListComments {
        post_id: PostId(query.post_id),
    };

    let response = request.perform(&app).await?;
    Ok(Json(response).into_response())
}

pub async fn create(
    app: App,
    session_user: SessionUser,
    Json(form): Json<CreateComment>,
) -> Result<Response, ApiError> {
    let request = services::comments::CreateComment {
        post_id: PostId(form.post_id),
        content: &form.content,
        parent_id: form.parent_id.map(CommentId),
    };

    let response = request.perform(&app, &session_user).await?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{self, build_test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_and_list_threads() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let post = gateway.insert_post(alice.user.id, "Hello").await;
        let (name, value) = alice.auth_header();

        let server = build_test_server(&app);
        let response = server
            .post("/api/v1/comments")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "postId": post.id, "content": "first" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let root = response.json::<Value>();

        let response = server
            .post("/api/v1/comments")
            .add_header(name, value)
            .json(&json!({ "postId": post.id, "content": "reply", "parentId": root["id"] }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/v1/comments")
            .add_query_param("postId", post.id)
            .await;

        response.assert_status_ok();
        let threads = response.json::<Value>();
        assert_eq!(threads[0]["comment"]["content"], "first");
        assert_eq!(threads[0]["replies"][0]["content"], "reply");
        assert_eq!(threads[0]["replies"][0]["parent_id"], root["id"]);
        assert_eq!(threads[0]["replies"][0]["author"]["name"], "alice");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_map_failures_to_status_codes() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let post = gateway.insert_post(alice.user.id, "Hello").await;
        let (name, value) = alice.auth_header();
        let server = build_test_server(&app);

        let response = server
            .post("/api/v1/comments")
            .json(&json!({ "postId": post.id, "content": "anonymous" }))
            .await;
        response.assert_status_unauthorized();

        let response = server
            .post("/api/v1/comments")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "postId": 2_000_000, "content": "lost" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post("/api/v1/comments")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "postId": post.id, "content": "   " }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/comments")
            .add_header(name, value)
            .json(&json!({ "postId": post.id, "content": "hi", "parentId": 2_000_000 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server.get("/api/v1/comments").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
