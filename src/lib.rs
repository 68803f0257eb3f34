#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("doc/Main.md")]

mod error;
pub mod iter;
pub mod pager;
pub mod source;

#[cfg(feature = "stream")]
#[cfg_attr(docsrs, doc(cfg(feature = "stream")))]
pub mod stream;

pub use error::PagingError;
pub use iter::{IntoItems, Items, IterState, PageIter};
pub use pager::{Destination, Pageable, Pager};
pub use source::{FnSource, PageSource};

#[doc = include_str!("doc/prelude")]
pub mod prelude {
    pub use crate::{PageIter, PageSource, Pageable, Pager, PagingError};
}

#[cfg(test)]
mod test_utils;
