//! API interaction module
//!
//! This module provides the transport side of the library: the pluggable
//! backend, its HTTP implementation and the aggregate client.
//!
//! # Module Structure
//!
//! - [`backend`] - the [`Backend`] trait every resource client calls through
//! - [`http`] - [`HttpBackend`], the reqwest implementation
//! - [`client`] - [`Api`], one client per resource over a shared backend
//!
//! # Example
//!
//! ```no_run
//! use stripe_client::api::client::Api;
//! use stripe_client::list::ListParams;
//! use stripe_client::resource::charge::ChargeListParams;
//! use stripe_client::config::Config;
//!
//! fn example() -> stripe_client::error::Result<()> {
//!     let api = Api::from_config(&Config::load(), None)?;
//!     let params = ChargeListParams {
//!         list: ListParams::new().limit(10),
//!         ..Default::default()
//!     };
//!     for charge in api.charges.list(Some(&params)) {
//!         println!("{}", charge?.id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod http;

pub use backend::{call_json, Backend};
pub use client::Api;
pub use http::HttpBackend;
