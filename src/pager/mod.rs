//! Explicit page by page retrieval on top of a [`PageIter`].

use crate::{PageIter, PageSource, PagingError};
use std::any::Any;
use tracing::debug;

/// Implemented by anything that can hand out the [`PageIter`] it's driven by, so that a
/// [`Pager`] can be put on top of it.
pub trait Pageable {
    type Source: PageSource;

    fn page_iter(&mut self) -> &mut PageIter<Self::Source>;
}

impl<S> Pageable for PageIter<S>
where
    S: PageSource,
{
    type Source = S;

    fn page_iter(&mut self) -> &mut PageIter<S> {
        self
    }
}

/// A dynamically typed page destination accepted by [`Pager::next_page_any`].
///
/// Implemented for every `'static` type, reports the type name for error messages.
pub trait Destination: Any {
    fn type_name(&self) -> &'static str;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> Destination for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Requests pages of a fixed size and reports the continuation token after each one, so that a
/// caller can resume the sequence later, e.g. in another request.
///
/// ```
/// use token_pager::{PageIter, Pager};
///
/// let numbers: Vec<u32> = (1..=5).collect();
/// let mut iter = PageIter::from_fn(|size, token: &str, buf: &mut Vec<u32>| {
///     let start: usize = token.parse().unwrap_or(0);
///     let end = (start + size).min(numbers.len());
///     buf.extend_from_slice(&numbers[start..end]);
///     let next = if end < numbers.len() { end.to_string() } else { String::new() };
///     Ok::<_, std::convert::Infallible>(next)
/// });
///
/// let mut pager = Pager::new(&mut iter, 2, "");
/// let mut page = Vec::new();
///
/// let token = pager.next_page(&mut page).unwrap();
/// assert_eq!((page.as_slice(), token.as_str()), (&[1, 2][..], "2"));
/// ```
pub struct Pager<'a, S: PageSource> {
    iter: &'a mut PageIter<S>,
    size: usize,
}

impl<'a, S> Pager<'a, S>
where
    S: PageSource,
{
    /// Puts a pager over the iterator of `pageable` and moves it to `token`. A non-empty `token`
    /// resumes an iterator that already reached the end of its sequence.
    ///
    /// A negative `size` doesn't fail here, the iterator gets [`PagingError::InvalidPageSize`]
    /// latched instead and the first call reports it.
    pub fn new<P>(pageable: &'a mut P, size: i64, token: impl Into<String>) -> Self
    where
        P: Pageable<Source = S>,
    {
        let iter = pageable.page_iter();
        iter.set_token(token);

        let size = match usize::try_from(size) {
            Ok(size) => size,
            Err(_) => {
                iter.latch(PagingError::InvalidPageSize);
                0
            }
        };

        Self { iter, size }
    }

    pub fn page_size(&self) -> usize {
        self.size
    }

    /// The token of the page the next call to [`Pager::next_page`] retrieves. Empty once the
    /// sequence is over.
    pub fn token(&self) -> &str {
        self.iter.token()
    }

    pub fn iter(&self) -> &PageIter<S> {
        &*self.iter
    }

    pub fn iter_mut(&mut self) -> &mut PageIter<S> {
        &mut *self.iter
    }

    /// Retrieves the next page and appends its items to `destination`.
    ///
    /// The page holds exactly `page_size` items unless the sequence ends first, so a source that
    /// returns short pages is queried several times. Returns the token of the following page, an
    /// empty token means the sequence is over.
    ///
    /// Fails with [`PagingError::BufferNotEmpty`] when items retrieved earlier haven't been
    /// consumed.
    pub fn next_page<D>(&mut self, destination: &mut D) -> Result<String, PagingError<S::Error>>
    where
        D: Extend<S::Item>,
    {
        self.check_ready()?;
        self.fill_page()?;

        destination.extend(self.iter.drain_buffered());
        Ok(self.iter.token().to_owned())
    }

    /// A dynamically typed version of [`Pager::next_page`].
    ///
    /// `destination` must be a `Vec` of the source items, otherwise
    /// [`PagingError::TypeMismatch`] is returned. Nothing is retrieved when any of the checks
    /// fails.
    pub fn next_page_any(
        &mut self,
        destination: Option<&mut dyn Destination>,
    ) -> Result<String, PagingError<S::Error>>
    where
        S::Item: 'static,
    {
        self.check_ready()?;

        let Some(destination) = destination else {
            return Err(PagingError::NilDestination);
        };

        let actual = Destination::type_name(&*destination);
        match destination.as_any_mut().downcast_mut::<Vec<S::Item>>() {
            Some(destination) => self.next_page(destination),
            None => Err(PagingError::TypeMismatch {
                expected: std::any::type_name::<Vec<S::Item>>(),
                actual,
            }),
        }
    }

    fn check_ready(&self) -> Result<(), PagingError<S::Error>> {
        if let Some(err) = self.iter.error() {
            return Err(err.clone());
        }

        if !self.iter.is_empty() {
            return Err(PagingError::BufferNotEmpty);
        }

        Ok(())
    }

    fn fill_page(&mut self) -> Result<(), PagingError<S::Error>> {
        while self.iter.len() < self.size && self.iter.state().is_active() {
            let remaining = self.size - self.iter.len();
            self.iter.fetch_one(remaining)?;
        }

        debug!(
            size = self.size,
            buffered = self.iter.len(),
            token = self.iter.token(),
            "page assembled"
        );

        Ok(())
    }
}

impl<S> std::fmt::Debug for Pager<'_, S>
where
    S: PageSource + std::fmt::Debug,
    S::Error: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("iter", &self.iter)
            .field("size", &self.size)
            .finish()
    }
}
