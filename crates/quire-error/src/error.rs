use core::{fmt, marker::PhantomData};
use error_stack::Report;
use quire_api_types::ErrorCategory;
use tracing::Span;

use crate::internal::{Context, ErrorInner, Frame, NoContext};

/// Error report with an [`ErrorCategory`] that decides how it is
/// presented to API clients.
///
/// `C` is the type of the most recent context. An error with a
/// [`NoContext`] type can hold any context and is what most
/// functions return when the caller has no reason to match on it.
pub struct Error<C = NoContext> {
    pub(crate) inner: Box<ErrorInner>,
    pub(crate) _phantom: PhantomData<C>,
}

// constructors
impl<C> Error<C> {
    #[must_use]
    #[track_caller]
    pub fn new(category: ErrorCategory, context: C) -> Self
    where
        C: Context,
    {
        let report = Report::new(Frame(Box::new(context)));
        Self {
            inner: ErrorInner::boxed(category, report),
            _phantom: PhantomData,
        }
    }

    #[must_use]
    #[track_caller]
    pub fn new_generic(category: ErrorCategory, context: C) -> Error
    where
        C: Context,
    {
        Self::new(category, context).erase_context()
    }

    #[must_use]
    #[track_caller]
    pub fn unknown(context: C) -> Self
    where
        C: Context,
    {
        Self::new(ErrorCategory::Unknown, context)
    }

    #[must_use]
    #[track_caller]
    pub fn unknown_generic(context: C) -> Error
    where
        C: Context,
    {
        Self::new_generic(ErrorCategory::Unknown, context)
    }
}

// getters and setters
impl<C> Error<C> {
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

    /// Looks for a context of type `T` anywhere in the report.
    #[must_use]
    pub fn downcast_ref<T: Context>(&self) -> Option<&T> {
        self.inner
            .report
            .frames()
            .filter_map(|frame| frame.downcast_ref::<Frame>())
            .find_map(|frame| frame.0.downcast_ref::<T>())
    }

    #[must_use]
    pub fn has<T: Context>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    #[must_use]
    pub fn get_category(&self) -> ErrorCategory {
        self.inner.category
    }

    #[must_use]
    pub fn category(mut self, category: ErrorCategory) -> Self {
        self.inner.category = category;
        self
    }

    #[must_use]
    #[track_caller]
    pub fn change_context<N>(mut self, context: N) -> Error<N>
    where
        N: Context,
    {
        self.inner.report = self.inner.report.change_context(Frame(Box::new(context)));
        Error {
            inner: self.inner,
            _phantom: PhantomData,
        }
    }

    /// Pushes a new context onto the report without changing
    /// the type of this error.
    #[must_use]
    #[track_caller]
    pub fn change_context_slient<N>(mut self, context: N) -> Self
    where
        N: Context,
    {
        self.inner.report = self.inner.report.change_context(Frame(Box::new(context)));
        self
    }

    #[must_use]
    pub fn current_context(&self) -> &C
    where
        C: Context,
    {
        self.inner
            .report
            .current_context()
            .0
            .downcast_ref()
            .unwrap_or_else(|| unreachable!())
    }

    #[must_use]
    pub fn erase_context(self) -> Error {
        Error {
            inner: self.inner,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn span(&self) -> &Span {
        &self.inner.span
    }
}

impl<C> From<Error<C>> for Error
where
    C: Context,
{
    #[track_caller]
    fn from(value: Error<C>) -> Self {
        value.erase_context()
    }
}

impl<C: Context> From<C> for Error {
    #[track_caller]
    fn from(value: C) -> Self {
        Error::unknown_generic(value)
    }
}

impl<C: Context> From<C> for Error<C> {
    #[track_caller]
    fn from(value: C) -> Self {
        Error::unknown(value)
    }
}

impl<C> Error<C> {
    /// Converts into the error object sent to API clients.
    ///
    /// Unknown and outage errors are logged in the span where they were
    /// created and their details are never exposed.
    pub fn into_api_error(self) -> quire_api_types::Error {
        use quire_api_types::Error as ApiError;

        match self.get_category() {
            ErrorCategory::Unknown => self.inner.span.in_scope(|| {
                tracing::error!(error = %self, "Caught internal server error");
                ApiError::unknown()
            }),
            ErrorCategory::Outage => self.inner.span.in_scope(|| {
                tracing::error!(error = %self, "Caught outage error");
                ApiError::new(ErrorCategory::Outage)
            }),
            category => {
                let message = self.inner.report.current_context().to_string();
                ApiError::new(category).message(message)
            }
        }
    }
}

impl<C> From<Error<C>> for quire_api_types::Error {
    fn from(value: Error<C>) -> Self {
        value.into_api_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("could not reach store")]
    struct StoreDown;

    #[derive(Debug, Error)]
    #[error("could not toggle relation")]
    struct ToggleFailed;

    #[test]
    fn should_keep_every_context() {
        let error = Error::new(ErrorCategory::Outage, StoreDown)
            .attach_printable("while counting likes")
            .change_context(ToggleFailed);

        assert!(error.has::<StoreDown>());
        assert!(error.has::<ToggleFailed>());
        assert_eq!(error.get_category(), ErrorCategory::Outage);
        assert_eq!(error.current_context().to_string(), "could not toggle relation");
    }

    #[test]
    fn should_hide_details_of_unknown_errors() {
        let error = Error::unknown(StoreDown).into_api_error();
        assert_eq!(error.category, ErrorCategory::Unknown);
        assert_ne!(error.message, "could not reach store");
    }

    #[test]
    fn should_use_context_as_message_of_client_errors() {
        let error = Error::new(ErrorCategory::Conflict, ToggleFailed).into_api_error();
        assert_eq!(error.category, ErrorCategory::Conflict);
        assert_eq!(error.message, "could not toggle relation");
    }
}
