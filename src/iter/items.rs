//! Item by item consumption of a [`PageIter`].

use super::PageIter;
use crate::{PageSource, PagingError};

type ItemResult<S> = Result<<S as PageSource>::Item, PagingError<<S as PageSource>::Error>>;

/// Borrowing item iterator returned by [`PageIter::items`].
///
/// Pages are drained out of the source buffer as a whole and yielded one item at a time. Items
/// drained but not yielded yet stay on the [`PageIter`], so dropping `Items` half way through a
/// page loses nothing. An error is yielded once, after that the iterator is finished.
pub struct Items<'a, S: PageSource> {
    iter: &'a mut PageIter<S>,
    finished: bool,
}

/// Owning item iterator returned by [`PageIter::into_iter`](IntoIterator::into_iter).
pub struct IntoItems<S: PageSource> {
    iter: PageIter<S>,
    finished: bool,
}

impl<S> PageIter<S>
where
    S: PageSource,
{
    /// Yields buffered items first and retrieves further pages as they're needed.
    pub fn items(&mut self) -> Items<'_, S> {
        Items {
            iter: self,
            finished: false,
        }
    }

    fn next_item(&mut self, finished: &mut bool) -> Option<ItemResult<S>> {
        if *finished {
            return None;
        }

        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(Ok(item));
            }

            if let Err(err) = self.advance() {
                *finished = true;
                return Some(Err(err));
            }

            if self.is_empty() {
                *finished = true;
                return None;
            }

            self.pending.extend(self.source.drain_buffer());
        }
    }
}

impl<S> Iterator for Items<'_, S>
where
    S: PageSource,
{
    type Item = ItemResult<S>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next_item(&mut self.finished)
    }
}

impl<S> IntoItems<S>
where
    S: PageSource,
{
    /// Gives the underlying iterator back, together with the items drained from the source but
    /// not yielded yet.
    pub fn into_inner(self) -> PageIter<S> {
        self.iter
    }
}

impl<S> Iterator for IntoItems<S>
where
    S: PageSource,
{
    type Item = ItemResult<S>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next_item(&mut self.finished)
    }
}

impl<S> IntoIterator for PageIter<S>
where
    S: PageSource,
{
    type Item = ItemResult<S>;
    type IntoIter = IntoItems<S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoItems {
            iter: self,
            finished: false,
        }
    }
}

impl<S> std::iter::FusedIterator for Items<'_, S> where S: PageSource {}
impl<S> std::iter::FusedIterator for IntoItems<S> where S: PageSource {}
