//! Invoice items: `/invoiceitems`

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::{Currency, Customer, Deleted, Expandable, Invoice};
use crate::api::backend::{call_json, Backend};
use crate::error::Result;
use crate::list::{ListIter, ListObject, ListParams, Page, Params, Query};

/// A pending line item to be added to a customer's next invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    #[serde(default, rename = "livemode")]
    pub live: bool,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub customer: Option<Expandable<Customer>>,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub proration: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub invoice: Option<Expandable<Invoice>>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ListObject for InvoiceItem {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceItemParams {
    pub params: Params,
    pub customer: String,
    pub amount: i64,
    pub currency: Currency,
    pub invoice: String,
    pub description: String,
    pub subscription: String,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceItemListParams {
    pub list: ListParams,
    pub created: i64,
    pub customer: String,
}

pub type Iter = ListIter<InvoiceItem>;

/// Client for `/invoiceitems`
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

    /// Create an invoice item
    pub fn create(&self, params: &InvoiceItemParams) -> Result<InvoiceItem> {
        let mut body = Query::new();
        body.add("customer", params.customer.as_str());
        body.add("amount", params.amount.to_string());
        body.add("currency", params.currency.as_str());

        if !params.invoice.is_empty() {
            body.add("invoice", params.invoice.as_str());
        }
        if !params.description.is_empty() {
            body.add("description", params.description.as_str());
        }
        if !params.subscription.is_empty() {
            body.add("subscription", params.subscription.as_str());
        }
        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::POST,
            "/invoiceitems",
            &self.key,
            Some(&body),
        )
    }

    pub fn get(&self, id: &str, params: Option<&Params>) -> Result<InvoiceItem> {
        let body = params.map(|p| {
            let mut q = Query::new();
            p.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::GET,
            &format!("/invoiceitems/{}", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    /// Update amount, description or metadata
    pub fn update(&self, id: &str, params: Option<&InvoiceItemParams>) -> Result<InvoiceItem> {
        let body = params.map(|p| {
            let mut q = Query::new();
            if p.amount != 0 {
                q.add("amount", p.amount.to_string());
            }
            if !p.description.is_empty() {
                q.add("description", p.description.as_str());
            }
            p.params.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::POST,
            &format!("/invoiceitems/{}", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    pub fn delete(&self, id: &str) -> Result<Deleted> {
        call_json(
            self.backend.as_ref(),
            Method::DELETE,
            &format!("/invoiceitems/{}", urlencoding::encode(id)),
            &self.key,
            None,
        )
    }

    pub fn list(&self, params: Option<&InvoiceItemListParams>) -> Iter {
        let mut query = Query::new();
        let mut list_params = None;

        if let Some(params) = params {
            if params.created > 0 {
                query.add("created", params.created.to_string());
            }
            if !params.customer.is_empty() {
                query.add("customer", params.customer.as_str());
            }
            params.list.append_to(&mut query);
            list_params = Some(&params.list);
        }

        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();
        ListIter::new(list_params, query, move |q: &Query| {
            call_json::<Page<InvoiceItem>>(backend.as_ref(), Method::GET, "/invoiceitems", &key, Some(q))
        })
    }
}
