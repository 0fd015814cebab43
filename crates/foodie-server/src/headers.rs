use axum::http::{HeaderName, HeaderValue};
use axum_extra::headers::{Error, Header};

static X_REQUEST_ID: HeaderName = HeaderName::from_static(XRequestId::NAME);

/// The `x-request-id` header, assigned to every request that does
/// not carry one.
#[derive(Debug, Clone)]
pub struct XRequestId(HeaderValue);

impl XRequestId {
    pub const NAME: &'static str = "x-request-id";

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or_default()
    }
}

impl Header for XRequestId {
    fn name() -> &'static HeaderName {
        &X_REQUEST_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        values
            .next()
            .filter(|value| value.to_str().is_ok())
            .map(|value| Self(value.clone()))
            .ok_or_else(Error::invalid)
    }

    fn encode<E>(&self, values: &mut E)
    where
        E: Extend<HeaderValue>,
    {
        values.extend(std::iter::once(self.0.clone()));
    }
}
