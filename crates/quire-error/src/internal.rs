use quire_api_types::ErrorCategory;
use error_stack::Report;
use std::fmt;
use tracing::Span;

/// Anything that can be used as a context of an [`Error`].
///
/// Every `Send + Sync` error type implements it, which includes all of
/// the `thiserror` structs declared throughout the codebase.
///
/// [`Error`]: crate::Error
pub trait Context: std::error::Error + Send + Sync + 'static {}

impl<T: std::error::Error + Send + Sync + 'static> Context for T {}

/// Tag used for [`Error`] to indicate that this is an
/// error with no context type.
///
/// [`Error`]: crate::Error
pub struct NoContext;

/// A single context pushed onto the report.
///
/// Contexts are boxed so errors with different context types share
/// the same report type and can be converted freely.
pub(crate) struct Frame(pub(crate) Box<dyn std::error::Error + Send + Sync + 'static>);

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Frame {}

pub(crate) struct ErrorInner {
    pub category: ErrorCategory,
    pub report: Report<Frame>,
    pub span: Span,
}

impl ErrorInner {
    #[must_use]
    pub fn boxed(category: ErrorCategory, report: Report<Frame>) -> Box<Self> {
        Box::new(Self {
            category,
            report,
            span: Span::current(),
        })
    }
}
