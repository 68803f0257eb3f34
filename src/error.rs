use std::sync::Arc;
use thiserror::Error;

/// Errors produced by [`PageIter`](crate::PageIter) and [`Pager`](crate::Pager).
///
/// `E` is the error type of the underlying [`PageSource`](crate::PageSource). Once a retrieval
/// fails the error is latched on the iterator and every later call returns a clone of it. The
/// failure is kept behind an [`Arc`] so the clones share the very same value and `E` doesn't need
/// to be [`Clone`].
#[derive(Debug, Error)]
pub enum PagingError<E> {
    #[error("page size must not be negative")]
    InvalidPageSize,

    #[error("next_page must be called with an empty buffer")]
    BufferNotEmpty,

    #[error("no destination passed to next_page")]
    NilDestination,

    #[error("next_page destination should be of type {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("page retrieval failed: {0}")]
    Retrieval(#[source] Arc<E>),
}

impl<E> PagingError<E> {
    pub(crate) fn retrieval(err: E) -> Self {
        Self::Retrieval(Arc::new(err))
    }

    /// The error returned by the page source, if this is a retrieval failure.
    pub fn retrieval_error(&self) -> Option<&E> {
        match self {
            Self::Retrieval(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this error is latched on the iterator. Latched errors are returned by every later
    /// call, the rest only describe a misuse of a single `next_page` call.
    pub fn is_latched(&self) -> bool {
        matches!(self, Self::InvalidPageSize | Self::Retrieval(_))
    }
}

impl<E> Clone for PagingError<E> {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidPageSize => Self::InvalidPageSize,
            Self::BufferNotEmpty => Self::BufferNotEmpty,
            Self::NilDestination => Self::NilDestination,
            Self::TypeMismatch { expected, actual } => Self::TypeMismatch {
                expected: *expected,
                actual: *actual,
            },
            Self::Retrieval(err) => Self::Retrieval(Arc::clone(err)),
        }
    }
}
