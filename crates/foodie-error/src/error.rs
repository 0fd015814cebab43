use error_stack::{Context, Report};
use std::any::{Any, TypeId};
use std::fmt;
use thiserror::Error;
use tracing::Span;

use crate::api::{ApiError, ErrorCategory};
use crate::hooks;

/// Context used for [`Error`] to indicate that the error has no
/// meaningful context type for the caller.
#[derive(Debug, Error)]
#[error("operation failed")]
pub struct NoContext;

/// An [`error_stack::Report`] paired with its [`ErrorCategory`] and the
/// [tracing span](Span) where it was created.
pub struct Error<C = NoContext> {
    pub(crate) inner: Box<ErrorInner<C>>,
}

pub(crate) struct ErrorInner<C> {
    pub(crate) category: ErrorCategory,
    pub(crate) report: Report<C>,
    pub(crate) span: Span,
}

// constructors
impl<C: Context> Error<C> {
    #[must_use]
    #[track_caller]
    pub fn new(category: ErrorCategory, context: C) -> Self {
        Self::from_report(category, Report::new(context))
    }

    /// Creates an error with [`ErrorCategory::Unknown`] unless an installed
    /// [category hook](crate::hooks) classifies the context otherwise.
    #[must_use]
    #[track_caller]
    pub fn unknown(context: C) -> Self {
        let category = hooks::classify(&context).unwrap_or(ErrorCategory::Unknown);
        Self::new(category, context)
    }

    #[must_use]
    pub fn from_report(category: ErrorCategory, report: Report<C>) -> Self {
        Self {
            inner: Box::new(ErrorInner {
                category,
                report,
                span: Span::current(),
            }),
        }
    }
}

impl Error {
    #[must_use]
    #[track_caller]
    pub fn new_generic<C: Context>(category: ErrorCategory, context: C) -> Self {
        Error::new(category, context).erase_context()
    }

    #[must_use]
    #[track_caller]
    pub fn unknown_generic<C: Context>(context: C) -> Self {
        Error::unknown(context).erase_context()
    }
}

// getters and setters
impl<C: Context> Error<C> {
    #[must_use]
    #[track_caller]
    pub fn attach<A>(mut self, attachment: A) -> Self
    where
        A: Send + Sync + 'static,
    {
        self.inner.report = self.inner.report.attach(attachment);
        self
    }

    #[must_use]
    #[track_caller]
    pub fn attach_printable<A>(mut self, attachment: A) -> Self
    where
        A: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.report = self.inner.report.attach_printable(attachment);
        self
    }

    #[must_use]
    pub fn downcast_ref<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.report.downcast_ref::<T>()
    }

    #[must_use]
    pub fn has<T: Send + Sync + 'static>(&self) -> bool {
        self.inner.report.contains::<T>()
    }

    #[must_use]
    pub fn get_category(&self) -> &ErrorCategory {
        &self.inner.category
    }

    #[must_use]
    pub fn category(mut self, category: ErrorCategory) -> Self {
        self.inner.category = category;
        self
    }

    #[must_use]
    #[track_caller]
    pub fn change_context<N: Context>(self, context: N) -> Error<N> {
        let ErrorInner {
            category,
            report,
            span,
        } = *self.inner;

        Error {
            inner: Box::new(ErrorInner {
                category,
                report: report.change_context(context),
                span,
            }),
        }
    }

    #[must_use]
    pub fn current_context(&self) -> &C {
        self.inner.report.current_context()
    }

    #[must_use]
    #[track_caller]
    pub fn erase_context(self) -> Error {
        let ErrorInner {
            category,
            report,
            span,
        } = *self.inner;

        // Reports that already carry `NoContext` are moved as is.
        let mut slot = Some(report);
        let report = match (&mut slot as &mut dyn Any)
            .downcast_mut::<Option<Report<NoContext>>>()
            .and_then(Option::take)
        {
            Some(report) => report,
            None => slot
                .map(|report| report.change_context(NoContext))
                .unwrap_or_else(|| unreachable!()),
        };

        Error {
            inner: Box::new(ErrorInner {
                category,
                report,
                span,
            }),
        }
    }

    #[must_use]
    pub fn span(&self) -> &Span {
        &self.inner.span
    }

    #[must_use]
    pub fn report(&self) -> &Report<C> {
        &self.inner.report
    }
}

impl<C: Context> From<C> for Error<C> {
    #[track_caller]
    fn from(value: C) -> Self {
        Error::unknown(value)
    }
}

impl<C: Context> Error<C> {
    /// Converts into an [`ApiError`] that is safe to show to the client.
    ///
    /// Internal errors are logged inside the span where the error was
    /// created and replaced with a generic message.
    pub fn into_api_error(self) -> ApiError {
        match self.get_category() {
            ErrorCategory::Unknown => self.inner.span.in_scope(|| {
                tracing::error!(error = %self, "Caught internal server error");
                ApiError::unknown()
                    .message("Unexpected error has occurred. Please try again later.")
            }),
            ErrorCategory::Outage => self.inner.span.in_scope(|| {
                tracing::error!(error = %self, "Caught outage error");
                ApiError::new(ErrorCategory::Outage)
                    .message("AmaderFoodie is not available at the moment. Please try again later.")
            }),
            category => {
                let error = ApiError::new(*category);
                if TypeId::of::<C>() == TypeId::of::<NoContext>() {
                    error
                } else {
                    error.message(self.current_context().to_string())
                }
            }
        }
    }
}

impl<C: Context> From<Error<C>> for ApiError {
    fn from(value: Error<C>) -> Self {
        value.into_api_error()
    }
}
