//! `futures` adapters for async consumers of a [`PageIter`].
//!
//! Retrieval stays synchronous, the streams below just make the item sequence usable where a
//! [`Stream`] is expected.

use crate::{PageIter, PageSource, PagingError};
use futures::stream::{self, Stream};

impl<S> PageIter<S>
where
    S: PageSource,
{
    /// Turns the iterator into a stream of items. The stream ends after the first error.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = Result<S::Item, PagingError<S::Error>>> + Unpin {
        stream::iter(self)
    }

    /// A borrowing version of [`PageIter::into_stream`].
    pub fn items_stream(
        &mut self,
    ) -> impl Stream<Item = Result<S::Item, PagingError<S::Error>>> + Unpin + '_ {
        stream::iter(self.items())
    }
}
