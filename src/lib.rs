//! Typed client for the Stripe REST API.
//!
//! Resource modules under [`resource`] build requests and hand them to a
//! [`Backend`](api::Backend). List operations return a
//! [`ListIter`](list::ListIter) that follows `starting_after` cursors across
//! pages as it is consumed.

pub mod api;
pub mod config;
pub mod error;
pub mod list;
pub mod resource;

pub use api::{Api, Backend, HttpBackend};
pub use error::{Error, ErrorKind, Result};
pub use list::{ListIter, ListMeta, ListObject, ListParams, Page, Params, Query};
