//! List endpoints
//!
//! - [`query`] - ordered key/value pairs sent as query string or form body
//! - [`params`] - shared parameter types and their query translation
//! - [`iter`] - the page-following [`ListIter`]

pub mod iter;
pub mod params;
pub mod query;

pub use iter::{ListIter, ListMeta, ListObject, Page};
pub use params::{Filters, ListParams, Params};
pub use query::Query;
