use jsonwebtoken::{DecodingKey, EncodingKey};
use quire_model::Gateway;
use std::sync::Arc;

/// Inner type of [`App`] object.
///
/// [`App`]: super::App
pub struct AppInner {
    pub config: Arc<quire_config::Server>,
    pub gateway: Arc<dyn Gateway>,

    pub(super) jwt_encode: EncodingKey,
    pub(super) jwt_decode: DecodingKey,
}
