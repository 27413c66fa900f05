use axum::http::{header, HeaderName, HeaderValue};
use quire_model::{MemoryGateway, User};

use crate::auth::jwt::LoginClaims;
use crate::extract::SessionUser;
use crate::App;

pub struct UserSessionData {
    pub user: User,
    /// User's login token
    pub token: String,
}

impl UserSessionData {
    #[must_use]
    pub fn session_user(&self) -> SessionUser {
        SessionUser::from(self.user.clone())
    }

    /// `Authorization` header to attach to test requests.
    #[must_use]
    pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
        bearer_header(&self.token)
    }
}

/// `Authorization` header carrying any token, valid or not.
#[must_use]
pub fn bearer_header(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {token}")).unwrap();
    (header::AUTHORIZATION, value)
}

#[bon::builder]
#[tracing::instrument(skip(gateway), name = "test_utils.users.register")]
pub async fn register(gateway: &MemoryGateway, name: &str, display_name: Option<&str>) -> User {
    gateway.insert_user(name, display_name).await
}

#[bon::builder]
#[tracing::instrument(skip(app, gateway), name = "test_utils.users.start_session")]
pub async fn start_session(app: &App, gateway: &MemoryGateway, name: &str) -> UserSessionData {
    let user = register().gateway(gateway).name(name).call().await;
    let token = LoginClaims::generate(&user).encode(app).unwrap();
    UserSessionData { user, token }
}
