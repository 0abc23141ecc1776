//! Historical list view-model
//!
//! - `page_cache` - unfiltered pages already fetched for the current page size
//! - `paginator` - full result set of the active search, sliced in memory
//! - `resolver` - picks one of the two or plans a remote query

pub mod page_cache;
pub mod paginator;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use page_cache::{CachedPage, PageCache};
pub use paginator::SearchResultPaginator;
pub use resolver::{FetchMode, FetchRequest, ListError, PageView, QueryModeResolver, Resolution};
