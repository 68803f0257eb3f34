//! Incremental iteration over a [`PageSource`], one buffered page at a time.

use crate::{FnSource, PageSource, PagingError};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

mod items;

pub use items::{IntoItems, Items};

/// Where an iterator is in its sequence.
///
/// `Exhausted` turns back into `Active` only when the iterator is moved to a non-empty token,
/// `Errored` absorbs every later operation.
#[derive(Debug)]
pub enum IterState<E> {
    Active,
    Exhausted,
    Errored(PagingError<E>),
}

impl<E> Clone for IterState<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Active => Self::Active,
            Self::Exhausted => Self::Exhausted,
            Self::Errored(err) => Self::Errored(err.clone()),
        }
    }
}

impl<E> IterState<E> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Keeps the retrieval cursor of a paginated sequence and refills the buffer of its
/// [`PageSource`] on demand.
///
/// Call [`PageIter::advance`] and then consume the buffer through the source. After a successful
/// `advance` either the buffer holds items or the sequence is over and the buffer stays empty.
///
/// ```
/// use token_pager::{PageIter, PageSource};
///
/// let pages = [(vec![1, 2], "a"), (vec![3], "")];
/// let mut iter = PageIter::from_fn(|_size, token: &str, buf: &mut Vec<i32>| {
///     let ix = if token.is_empty() { 0 } else { 1 };
///     buf.extend_from_slice(&pages[ix].0);
///     Ok::<_, std::convert::Infallible>(pages[ix].1.to_owned())
/// });
///
/// let mut all = Vec::new();
/// loop {
///     iter.advance().unwrap();
///     if iter.is_empty() {
///         break;
///     }
///     all.extend(iter.source_mut().drain_buffer());
/// }
///
/// assert_eq!(all, [1, 2, 3]);
/// ```
pub struct PageIter<S: PageSource> {
    source: S,
    max_size: usize,
    token: String,
    state: IterState<S::Error>,
    // drained out of the source by `items` but not yielded yet
    pending: VecDeque<S::Item>,
}

impl<S> PageIter<S>
where
    S: PageSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_size: 0,
            token: String::new(),
            state: IterState::Active,
            pending: VecDeque::new(),
        }
    }

    /// Sets the page size requested by [`PageIter::advance`]. 0 lets the source decide.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Starts the iteration at `token` instead of the first page.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    /// The continuation token of the next page to retrieve.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Moves the cursor to `token`. A non-empty token resumes an exhausted iterator from that
    /// page, a latched error stays latched.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();

        if !self.token.is_empty() && matches!(self.state, IterState::Exhausted) {
            debug!(token = %self.token, "resuming exhausted iterator");
            self.state = IterState::Active;
        }
    }

    pub fn state(&self) -> &IterState<S::Error> {
        &self.state
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<&PagingError<S::Error>> {
        match &self.state {
            IterState::Errored(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the source already returned the last page. Items of that page may still be
    /// buffered.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, IterState::Exhausted)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// The number of buffered items, including the ones [`PageIter::items`] has taken out of the
    /// source but not yielded yet.
    pub fn len(&self) -> usize {
        self.pending.len() + self.source.buffer_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes every buffered item, the ones left over by [`PageIter::items`] first.
    pub fn drain_buffered(&mut self) -> Vec<S::Item> {
        let mut items: Vec<_> = self.pending.drain(..).collect();
        items.extend(self.source.drain_buffer());
        items
    }

    /// Retrieves pages until the buffer is not empty or the sequence ends.
    ///
    /// Returns `Ok(())` in both cases, check [`PageIter::len`] to tell them apart. Once an error is
    /// returned it's latched and returned again by every later call without retrieving anything.
    pub fn advance(&mut self) -> Result<(), PagingError<S::Error>> {
        if let IterState::Errored(err) = &self.state {
            return Err(err.clone());
        }

        while self.is_empty() && self.state.is_active() {
            self.fetch_one(self.max_size)?;
        }

        Ok(())
    }

    /// Retrieves a single page of up to `size` items.
    ///
    /// A failed retrieval discards whatever it managed to put into the buffer and latches the
    /// error. The token is only updated on success.
    pub(crate) fn fetch_one(&mut self, size: usize) -> Result<(), PagingError<S::Error>> {
        trace!(size, token = %self.token, "retrieving page");

        match self.source.retrieve(size, &self.token) {
            Ok(token) => {
                if token.is_empty() {
                    debug!(buffered = self.len(), "last page retrieved");
                    self.state = IterState::Exhausted;
                }

                self.token = token;
                Ok(())
            }
            Err(err) => {
                let discarded = self.source.drain_buffer().into_iter().count();
                warn!(discarded, token = %self.token, "page retrieval failed");
                Err(self.latch(PagingError::retrieval(err)))
            }
        }
    }

    /// Puts the iterator into the terminal error state unless it already is there, and returns
    /// the error that is latched now.
    pub(crate) fn latch(&mut self, err: PagingError<S::Error>) -> PagingError<S::Error> {
        match &self.state {
            IterState::Errored(latched) => latched.clone(),
            _ => {
                self.state = IterState::Errored(err.clone());
                err
            }
        }
    }
}

impl<F, V, E> PageIter<FnSource<F, V, E>>
where
    F: FnMut(usize, &str, &mut Vec<V>) -> Result<String, E>,
{
    /// Builds an iterator over a closure that appends a page into the provided buffer and
    /// returns the next page token.
    pub fn from_fn(retrieve: F) -> Self {
        Self::new(FnSource::new(retrieve))
    }
}

impl<S> std::fmt::Debug for PageIter<S>
where
    S: PageSource + std::fmt::Debug,
    S::Error: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIter")
            .field("source", &self.source)
            .field("max_size", &self.max_size)
            .field("token", &self.token)
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .finish()
    }
}
