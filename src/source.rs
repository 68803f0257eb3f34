//! The capability a [`PageIter`](crate::PageIter) is driven by.

use std::marker::PhantomData;

/// A paginated data source which owns the buffer fetched items land in.
///
/// Iterators and pagers never look at the items themselves. They only ask the source to retrieve
/// a page into its buffer, check how many items are buffered and take the whole buffer away.
///
/// # Example
///
/// ```
/// use token_pager::PageSource;
///
/// struct Numbers {
///     numbers: Vec<u32>,
///     buffer: Vec<u32>,
/// }
///
/// impl PageSource for Numbers {
///     type Item = u32;
///     type Buffer = Vec<u32>;
///     type Error = std::convert::Infallible;
///
///     fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, Self::Error> {
///         let start: usize = page_token.parse().unwrap_or(0);
///         let end = (start + page_size.max(1)).min(self.numbers.len());
///         self.buffer.extend_from_slice(&self.numbers[start..end]);
///
///         if end < self.numbers.len() {
///             Ok(end.to_string())
///         } else {
///             Ok(String::new())
///         }
///     }
///
///     fn buffer_len(&self) -> usize {
///         self.buffer.len()
///     }
///
///     fn drain_buffer(&mut self) -> Self::Buffer {
///         std::mem::take(&mut self.buffer)
///     }
/// }
/// ```
pub trait PageSource {
    type Item;
    /// Whatever [`PageSource::drain_buffer`] hands back.
    type Buffer: IntoIterator<Item = Self::Item>;
    type Error;

    /// Fetches up to `page_size` items starting at `page_token` and appends them to the buffer.
    ///
    /// Returns the token of the following page. An empty token means there are no more pages. A
    /// `page_size` of 0 lets the source pick its own page size. An empty `page_token` on the very
    /// first call means "start from the beginning".
    fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, Self::Error>;

    /// The number of buffered items not consumed yet.
    fn buffer_len(&self) -> usize;

    /// Empties the buffer and returns its previous contents.
    fn drain_buffer(&mut self) -> Self::Buffer;
}

impl<S> PageSource for &mut S
where
    S: ?Sized + PageSource,
{
    type Item = S::Item;
    type Buffer = S::Buffer;
    type Error = S::Error;

    fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, Self::Error> {
        S::retrieve(self, page_size, page_token)
    }

    fn buffer_len(&self) -> usize {
        S::buffer_len(self)
    }

    fn drain_buffer(&mut self) -> Self::Buffer {
        S::drain_buffer(self)
    }
}

impl<S> PageSource for Box<S>
where
    S: ?Sized + PageSource,
{
    type Item = S::Item;
    type Buffer = S::Buffer;
    type Error = S::Error;

    fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, Self::Error> {
        S::retrieve(self.as_mut(), page_size, page_token)
    }

    fn buffer_len(&self) -> usize {
        S::buffer_len(self.as_ref())
    }

    fn drain_buffer(&mut self) -> Self::Buffer {
        S::drain_buffer(self.as_mut())
    }
}

/// A [`PageSource`] built out of a single closure which appends a page into a `Vec` buffer owned
/// by the source.
///
/// The closure receives the requested page size, the page token and the buffer, and returns the
/// next page token.
pub struct FnSource<F, V, E> {
    retrieve: F,
    buffer: Vec<V>,
    _error: PhantomData<fn() -> E>,
}

impl<F, V, E> FnSource<F, V, E>
where
    F: FnMut(usize, &str, &mut Vec<V>) -> Result<String, E>,
{
    pub fn new(retrieve: F) -> Self {
        Self {
            retrieve,
            buffer: Vec::new(),
            _error: PhantomData,
        }
    }

    /// Items buffered but not consumed yet.
    pub fn buffered(&self) -> &[V] {
        &self.buffer
    }
}

impl<F, V, E> PageSource for FnSource<F, V, E>
where
    F: FnMut(usize, &str, &mut Vec<V>) -> Result<String, E>,
{
    type Item = V;
    type Buffer = Vec<V>;
    type Error = E;

    fn retrieve(&mut self, page_size: usize, page_token: &str) -> Result<String, Self::Error> {
        (self.retrieve)(page_size, page_token, &mut self.buffer)
    }

    fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn drain_buffer(&mut self) -> Self::Buffer {
        std::mem::take(&mut self.buffer)
    }
}

impl<F, V, E> std::fmt::Debug for FnSource<F, V, E>
where
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource")
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}
