//! Category hooks let crates that own a foreign error type (such as
//! `sqlx::Error`) decide which [`ErrorCategory`] it should carry when it
//! gets wrapped into an [`Error`](crate::Error).
use error_stack::Context;
use std::any::{Any, TypeId};
use std::sync::{Arc, RwLock};

use crate::ErrorCategory;

type StoredHook = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Option<ErrorCategory> + Send + Sync>;

static HOOKS: RwLock<Vec<(TypeId, StoredHook)>> = RwLock::new(Vec::new());

/// Installs a category hook for `T`.
///
/// Installing a hook for the same type twice replaces the previous one.
pub fn install<T: Context>(hook: impl Fn(&T) -> Option<ErrorCategory> + Send + Sync + 'static) {
    let stored: StoredHook = Arc::new(move |value| value.downcast_ref::<T>().and_then(&hook));
    let mut lock = HOOKS.write().unwrap_or_else(|poison| poison.into_inner());

    let id = TypeId::of::<T>();
    lock.retain(|(existing, _)| *existing != id);
    lock.push((id, stored));
}

pub(crate) fn classify<T: Context>(value: &T) -> Option<ErrorCategory> {
    let hook = {
        let lock = HOOKS.read().unwrap_or_else(|poison| poison.into_inner());
        let id = TypeId::of::<T>();
        lock.iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, hook)| hook.clone())?
    };
    hook(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("pool timed out")]
    struct PoolTimedOut;

    #[test]
    fn should_classify_with_installed_hook() {
        install::<PoolTimedOut>(|_| Some(ErrorCategory::Outage));

        let error = Error::unknown(PoolTimedOut);
        assert_eq!(error.get_category(), &ErrorCategory::Outage);
    }
}
