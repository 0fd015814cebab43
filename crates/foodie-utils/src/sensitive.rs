use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::ops::Deref;

/// Keeps the raw sensitive data in memory but it cannot be
/// accidentally leaked through the console or logs.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<hidden>")
    }
}

impl<T> Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<hidden>")
    }
}

impl<T> AsRef<T> for Sensitive<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> Deref for Sensitive<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: Deref> Sensitive<T> {
    #[must_use]
    pub fn as_deref(&self) -> Sensitive<&T::Target> {
        Sensitive(self.0.deref())
    }
}

impl<T: AsRef<str>> Sensitive<T> {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::Sensitive;

    #[test]
    fn should_not_leak_value_in_debug_or_display() {
        let secret = Sensitive::new("my-jwt-secret");
        assert_eq!(format!("{secret:?}"), "<hidden>");
        assert_eq!(secret.to_string(), "<hidden>");
        assert_eq!(secret.as_str(), "my-jwt-secret");
    }

    #[test]
    fn should_be_transparent_in_serde() {
        let secret: Sensitive<String> = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(secret.value(), "hello");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"hello\"");
    }
}
