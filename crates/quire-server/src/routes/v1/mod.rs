use axum::routing::get;
use axum::Router;

use crate::App;

mod comments;
mod posts;
mod relations;
mod users;

/// Builds the base router for Quire API v1.
pub fn build_axum_router(app: App) -> Router {
    Router::new()
        .route(
            "/comments",
            get(self::comments::list).post(self::comments::create),
        )
        .route("/posts/:id/stats", get(self::posts::stats))
        .route(
            "/relations/:kind/:target",
            get(self::relations::status)
                .post(self::relations::activate)
                .delete(self::relations::deactivate),
        )
        .route("/users/:name", get(self::users::profile))
        .route(
            "/users/:name/follow",
            get(self::users::follow_status).post(self::users::toggle_follow),
        )
        .with_state(app)
}
