use quire_api_types::user::Profile;
use quire_api_types::RelationKind;
use quire_error::{ApiError, ApiErrorCategory};

use super::relations::count_from;
use crate::App;

/// Public profile of an actor with their follow and post counters.
#[derive(Debug)]
pub struct GetProfile<'a> {
    pub name: &'a str,
}

impl GetProfile<'_> {
    #[tracing::instrument(skip(app), name = "services.users.profile")]
    pub async fn perform(self, app: &App) -> Result<Profile, ApiError> {
        let name = self.name;
        let user = app
            .with_store("services.users.find", || app.gateway.find_user_by_name(name))
            .await?;

        let Some(user) = user else {
            return Err(
                ApiError::new(ApiErrorCategory::NotFound).message("Could not find user specified")
            );
        };

        let id = user.id;
        let followers = app
            .with_store("services.users.count_followers", || {
                app.gateway.count_relations(RelationKind::Follow, id.0)
            })
            .await?;

        let following = count_from(app, RelationKind::Follow, id).await?;
        let posts = app
            .with_store("services.users.count_posts", || {
                app.gateway.count_posts_by_author(id)
            })
            .await?;

        Ok(Profile {
            id: user.id.0,
            name: user.name,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            followers,
            following,
            posts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::relations::{RelationTarget, ToggleRelation};
    use crate::test_utils::{self, TestResultExt};
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_count_follows_and_posts() {
        let (app, gateway) = test_utils::build_test_app();
        let alice = test_utils::users::start_session()
            .app(&app)
            .gateway(&gateway)
            .name("alice")
            .call()
            .await;
        let bob = test_utils::users::register()
            .gateway(&gateway)
            .name("bob")
            .display_name("Bob")
            .call()
            .await;
        gateway.insert_post(bob.id, "One").await;
        gateway.insert_post(bob.id, "Two").await;

        ToggleRelation {
            kind: RelationKind::Follow,
            target: RelationTarget::User("bob".into()),
        }
        .perform(&app, &alice.session_user())
        .await
        .unwrap();

        let profile = GetProfile { name: "bob" }.perform(&app).await.unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Bob"));
        assert_eq!((profile.followers, profile.following, profile.posts), (1, 0, 2));

        let profile = GetProfile { name: "alice" }.perform(&app).await.unwrap();
        assert_eq!((profile.followers, profile.following, profile.posts), (0, 1, 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_if_user_not_found() {
        let (app, _) = test_utils::build_test_app();
        let error = GetProfile { name: "nobody" }
            .perform(&app)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "not_found",
                "error": "Could not find user specified",
            }),
        );
    }
}
