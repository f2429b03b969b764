//! API client
//!
//! Bundles one client per resource around a shared backend and key.

use std::sync::Arc;

use super::backend::Backend;
use super::http::HttpBackend;
use crate::config::Config;
use crate::error::Result;
use crate::resource::{account, balance, charge, invoiceitem, plan, refund};

/// Main API client
#[derive(Clone)]
pub struct Api {
    pub charges: charge::Client,
    pub refunds: refund::Client,
    pub invoice_items: invoiceitem::Client,
    pub balance: balance::Client,
    pub plans: plan::Client,
    pub account: account::Client,
}

impl Api {
    /// Create a client over an explicit backend
    pub fn new(key: &str, backend: Arc<dyn Backend>) -> Self {
        Self {
            charges: charge::Client::new(Arc::clone(&backend), key),
            refunds: refund::Client::new(Arc::clone(&backend), key),
            invoice_items: invoiceitem::Client::new(Arc::clone(&backend), key),
            balance: balance::Client::new(Arc::clone(&backend), key),
            plans: plan::Client::new(Arc::clone(&backend), key),
            account: account::Client::new(backend, key),
        }
    }

    /// Create a client over the HTTP backend described by `config`
    pub fn from_config(config: &Config, key: Option<&str>) -> Result<Self> {
        let key = config.effective_key(key)?;
        let base = config.effective_base(None);
        tracing::info!("Using API base: {}", base);

        let backend = HttpBackend::with_base(&base, config.timeout())?;
        Ok(Self::new(&key, Arc::new(backend)))
    }
}
