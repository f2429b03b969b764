//! Pluggable transport
//!
//! Resource clients never talk to the network directly; they go through a
//! [`Backend`], which makes one blocking round trip per call.

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::list::Query;

/// One HTTP round trip against the API.
///
/// `path` is relative to the API base (e.g. `/charges`). For `GET` and
/// `DELETE` the form is sent as a query string, otherwise as the body.
/// Returns the raw response body on success.
pub trait Backend: Send + Sync {
    fn call(&self, method: Method, path: &str, key: &str, form: Option<&Query>) -> Result<String>;
}

/// Call the backend and decode the JSON body into `T`
pub fn call_json<T: DeserializeOwned>(
    backend: &dyn Backend,
    method: Method,
    path: &str,
    key: &str,
    form: Option<&Query>,
) -> Result<T> {
    let body = backend.call(method, path, key, form)?;
    Ok(serde_json::from_str(&body)?)
}
