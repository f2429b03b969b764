//! Account: `/account`

use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::backend::{call_json, Backend};
use crate::error::Result;

/// The account that owns the API key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub default_currency: Option<String>,
    #[serde(default)]
    pub currencies_supported: Vec<String>,
    #[serde(default)]
    pub charge_enabled: bool,
    #[serde(default)]
    pub transfer_enabled: bool,
    #[serde(default)]
    pub details_submitted: bool,
}

#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn Backend>,
    key: String,
}

impl Client {
    pub fn new(backend: Arc<dyn Backend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn get(&self) -> Result<Account> {
        call_json(self.backend.as_ref(), Method::GET, "/account", &self.key, None)
    }
}
