use chrono::{TimeDelta, Utc};
use quire_error::ext::ResultExt;
use quire_error::Result;
use quire_model::User;
use serde::{Deserialize, Serialize};

use crate::app::auth::{DecodeJwtError, EncodeJwtError};
use crate::App;

const JWT_LOGIN_ISSUER: &str = "quire.api.login";

/// Claims of the bearer token handed out by the identity system.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginClaims {
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: i64,

    pub name: String,
}

impl LoginClaims {
    pub fn decode(app: &App, token: &str) -> Result<Self, DecodeJwtError> {
        app.decode_jwt(token, JWT_LOGIN_ISSUER)
    }

    pub fn encode(&self, app: &App) -> Result<String, EncodeJwtError> {
        app.encode_to_jwt(self)
            .attach_printable("could not encode login jwt claims")
    }

    #[must_use]
    pub fn generate(user: &User) -> Self {
        let now = Utc::now();
        Self {
            nbf: now.timestamp(),
            exp: (now + TimeDelta::days(1)).timestamp(),
            iss: JWT_LOGIN_ISSUER.to_string(),
            sub: user.id.0,

            name: user.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_api_types::ErrorCategory;
    use quire_model::MemoryGateway;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_decode_generated_claims() {
        let gateway = Arc::new(MemoryGateway::new());
        let alice = gateway.insert_user("alice", None).await;
        let app = App::new_for_tests(gateway);

        let token = LoginClaims::generate(&alice).encode(&app).unwrap();
        let claims = LoginClaims::decode(&app, &token).unwrap();
        assert_eq!(claims.sub, alice.id.0);
        assert_eq!(claims.name, "alice");
    }

    #[tokio::test]
    async fn should_reject_expired_or_foreign_tokens() {
        let gateway = Arc::new(MemoryGateway::new());
        let alice = gateway.insert_user("alice", None).await;
        let app = App::new_for_tests(gateway);

        let mut claims = LoginClaims::generate(&alice);
        claims.exp = (Utc::now() - TimeDelta::days(2)).timestamp();
        claims.nbf = (Utc::now() - TimeDelta::days(3)).timestamp();
        let token = claims.encode(&app).unwrap();

        let error = LoginClaims::decode(&app, &token).unwrap_err();
        assert_eq!(error.get_category(), ErrorCategory::AccessDenied);

        let error = LoginClaims::decode(&app, "not.a.token").unwrap_err();
        assert_eq!(error.get_category(), ErrorCategory::AccessDenied);
    }
}
