use serde::ser::SerializeMap;
use serde::Serialize;

mod axum;
mod category;

pub use self::category::{ErrorCategory, LoginUserFailed, RegisterUserFailed};

/// Error returned to API clients.
///
/// It is serialized as `{"code": ..., "subcode"?: ..., "message"?: ...}`.
#[derive(Debug, Clone)]
#[must_use]
pub struct ApiError {
    pub category: ErrorCategory,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            category,
            message: None,
        }
    }

    pub fn unknown() -> Self {
        Self::new(ErrorCategory::Unknown)
    }

    pub fn message(self, message: impl Into<String>) -> Self {
        Self {
            category: self.category,
            message: Some(message.into()),
        }
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
    }
}

impl Eq for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message.as_deref() {
            Some(message) => write!(f, "{}: {message}", self.category),
            None => self.category.fmt(f),
        }
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let subcode = self.category.subcode();

        let mut len = 1;
        if subcode.is_some() {
            len += 1;
        }
        if self.message.is_some() {
            len += 1;
        }

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("code", self.category.code())?;
        if let Some(subcode) = subcode {
            map.serialize_entry("subcode", subcode)?;
        }
        if let Some(message) = self.message.as_ref() {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}
