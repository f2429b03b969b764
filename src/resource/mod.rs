//! Resource modules
//!
//! Each module pairs the resource's types with a `Client` holding a backend
//! handle and key, and exposes `Iter`, the [`ListIter`](crate::list::ListIter)
//! specialised to the resource.
//!
//! - [`charge`] - charges, captures
//! - [`refund`] - refunds nested under a charge
//! - [`invoiceitem`] - invoice items
//! - [`balance`] - balance and balance history
//! - [`plan`] - subscription plans
//! - [`account`] - the key owner's account

pub mod account;
pub mod balance;
pub mod charge;
pub mod common;
pub mod invoiceitem;
pub mod plan;
pub mod refund;

pub use common::{Card, Currency, Customer, Deleted, Expandable, Invoice};
