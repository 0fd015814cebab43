use foodie_utils::Sensitive;
use serde::Deserialize;
use std::num::NonZeroU64;

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Secret key used to sign login and email verification tokens.
    ///
    /// It must be at least [`Auth::MIN_SECRET_LEN`] characters long.
    ///
    /// **Environment variables**:
    /// - `FOODIE_AUTH_JWT_SECRET` or `JWT_SECRET`
    pub jwt_secret: Sensitive<String>,

    /// **Environment variables**:
    /// - `FOODIE_AUTH_TOKEN_LIFETIME_HOURS`
    #[serde(default = "Auth::default_token_lifetime_hours")]
    pub token_lifetime_hours: NonZeroU64,
}

impl Auth {
    pub const MIN_SECRET_LEN: usize = 12;
    const DEFAULT_TOKEN_LIFETIME_HOURS: u64 = 24 * 7;

    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: Sensitive::new("amaderfoodie-test-secret".into()),
            token_lifetime_hours: Self::default_token_lifetime_hours(),
        }
    }

    const fn default_token_lifetime_hours() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TOKEN_LIFETIME_HOURS) {
            Some(n) => n,
            None => panic!("DEFAULT_TOKEN_LIFETIME_HOURS is accidentally set to 0"),
        }
    }
}
