use foodie_db::Pool;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::sync::Arc;

/// Inner type of [`App`] object.
///
/// [`App`]: super::App
pub struct AppInner {
    pub config: Arc<foodie_config::Server>,

    pub(super) db: Pool,

    pub(crate) jwt_encode: EncodingKey,
    pub(crate) jwt_decode: DecodingKey,
}
