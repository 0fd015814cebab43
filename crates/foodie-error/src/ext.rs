use error_stack::Context;
use std::fmt;

use crate::{Error, ErrorCategory};

/// Report helpers shared by plain [`std::result::Result`]s holding a
/// [`Context`] error and by [`crate::Result`].
///
/// Implementors only provide [`ResultExt::into_error_result`], every
/// other method goes through it. All of them are `#[track_caller]` so
/// the report points at the caller and not at this module.
pub trait ResultExt: Sized {
    type Ok;
    type Context: Context;

    /// Lifts the error side into an [`Error`]. Plain errors are
    /// classified with the installed hooks.
    fn into_error_result(self) -> crate::Result<Self::Ok, Self::Context>;

    #[track_caller]
    fn attach<A>(self, attachment: A) -> crate::Result<Self::Ok, Self::Context>
    where
        A: Send + Sync + 'static,
    {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.attach(attachment)),
        }
    }

    #[track_caller]
    fn attach_printable<A>(self, attachment: A) -> crate::Result<Self::Ok, Self::Context>
    where
        A: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.attach_printable(attachment)),
        }
    }

    #[track_caller]
    fn attach_printable_lazy<A, F>(self, attachment: F) -> crate::Result<Self::Ok, Self::Context>
    where
        A: fmt::Display + fmt::Debug + Send + Sync + 'static,
        F: FnOnce() -> A,
    {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.attach_printable(attachment())),
        }
    }

    /// Overrides the category the error was classified with.
    #[track_caller]
    fn category(self, category: ErrorCategory) -> crate::Result<Self::Ok, Self::Context> {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.category(category)),
        }
    }

    #[track_caller]
    fn change_context<P>(self, context: P) -> crate::Result<Self::Ok, P>
    where
        P: Context,
    {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.change_context(context)),
        }
    }

    #[track_caller]
    fn change_context_lazy<P, F>(self, context: F) -> crate::Result<Self::Ok, P>
    where
        P: Context,
        F: FnOnce() -> P,
    {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.change_context(context())),
        }
    }

    #[track_caller]
    fn erase_context(self) -> crate::Result<Self::Ok> {
        match self.into_error_result() {
            Ok(value) => Ok(value),
            Err(error) => Err(error.erase_context()),
        }
    }
}

impl<T, C: Context> ResultExt for std::result::Result<T, C> {
    type Ok = T;
    type Context = C;

    #[track_caller]
    fn into_error_result(self) -> crate::Result<T, C> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::unknown(error)),
        }
    }
}

impl<T, C: Context> ResultExt for crate::Result<T, C> {
    type Ok = T;
    type Context = C;

    fn into_error_result(self) -> Self {
        self
    }
}
