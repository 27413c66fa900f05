use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use quire_error::ext::ResultExt;
use quire_error::{ApiErrorCategory, Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::App;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

impl App {
    pub fn encode_to_jwt<T: Serialize>(&self, claims: &T) -> Result<String, EncodeJwtError> {
        jsonwebtoken::encode(&Header::new(JWT_ALGORITHM), claims, &self.jwt_encode)
            .change_context(EncodeJwtError)
    }

    pub fn decode_jwt<T: DeserializeOwned>(
        &self,
        token: &str,
        issuer: &str,
    ) -> Result<T, DecodeJwtError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 30;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[issuer]);

        let token = token.replace(char::is_whitespace, "");
        match jsonwebtoken::decode(&token, &self.jwt_decode, &validation) {
            Ok(data) => Ok(data.claims),
            Err(error) => match error.kind() {
                ErrorKind::Json(..)
                | ErrorKind::Base64(..)
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::ImmatureSignature
                | ErrorKind::ExpiredSignature => {
                    Err(Error::new(ApiErrorCategory::AccessDenied, DecodeJwtError))
                }
                _ => Err(Error::unknown_generic(error).change_context(DecodeJwtError)),
            },
        }
    }
}

#[derive(Debug, Error)]
#[error("Unauthorized")]
pub struct DecodeJwtError;

#[derive(Debug, Error)]
#[error("Failed to encode claims as JWT")]
pub struct EncodeJwtError;

impl App {
    pub(super) fn setup_jwt_keys(config: &quire_config::Server) -> (EncodingKey, DecodingKey) {
        let secret = config.auth.jwt_secret.as_bytes();
        (
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }
}
