//! Charges: `/charges`

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::balance::Transaction;
use super::common::{Card, Currency, Customer, Expandable, Invoice};
use super::refund::Refund;
use crate::api::backend::{call_json, Backend};
use crate::error::Result;
use crate::list::{ListIter, ListObject, ListParams, Page, Params, Query};

/// A charge against a card or customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    #[serde(default, rename = "livemode")]
    pub live: bool,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub captured: bool,
    #[serde(default)]
    pub card: Option<Card>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub refunded: bool,
    #[serde(default)]
    pub refunds: Option<Page<Refund>>,
    #[serde(default)]
    pub amount_refunded: u64,
    #[serde(default, rename = "balance_transaction")]
    pub transaction: Option<Expandable<Transaction>>,
    #[serde(default)]
    pub customer: Option<Expandable<Customer>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub failure_message: Option<String>,
    #[serde(default)]
    pub failure_code: Option<String>,
    #[serde(default)]
    pub invoice: Option<Expandable<Invoice>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub receipt_email: Option<String>,
    #[serde(default)]
    pub statement_description: Option<String>,
}

impl ListObject for Charge {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Raw card details, used when no token or customer is given
#[derive(Debug, Clone, Default)]
pub struct CardParams {
    pub name: String,
    pub number: String,
    pub month: String,
    pub year: String,
    pub cvc: String,
}

impl CardParams {
    fn append_to(&self, query: &mut Query) {
        query.add("card[number]", self.number.as_str());
        query.add("card[exp_month]", self.month.as_str());
        query.add("card[exp_year]", self.year.as_str());
        if !self.cvc.is_empty() {
            query.add("card[cvc]", self.cvc.as_str());
        }
        if !self.name.is_empty() {
            query.add("card[name]", self.name.as_str());
        }
    }
}

/// Parameters for creating or updating a charge
#[derive(Debug, Clone, Default)]
pub struct ChargeParams {
    pub params: Params,
    pub amount: u64,
    pub currency: Currency,
    pub customer: String,
    pub token: String,
    pub card: Option<CardParams>,
    pub description: String,
    pub statement: String,
    pub email: String,
    pub no_capture: bool,
    pub fee: u64,
}

/// Parameters for capturing an uncaptured charge
#[derive(Debug, Clone, Default)]
pub struct CaptureParams {
    pub params: Params,
    pub amount: u64,
    pub fee: u64,
    pub email: String,
}

/// Filters for listing charges
#[derive(Debug, Clone, Default)]
pub struct ChargeListParams {
    pub list: ListParams,
    pub created: i64,
    pub customer: String,
}

pub type Iter = ListIter<Charge>;

/// Client for `/charges`
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

    /// Create a charge
    pub fn create(&self, params: &ChargeParams) -> Result<Charge> {
        let mut body = Query::new();
        body.add("amount", params.amount.to_string());
        body.add("currency", params.currency.as_str());

        if !params.customer.is_empty() {
            body.add("customer", params.customer.as_str());
        } else if !params.token.is_empty() {
            body.add("card", params.token.as_str());
        } else if let Some(card) = &params.card {
            card.append_to(&mut body);
        }

        if !params.description.is_empty() {
            body.add("description", params.description.as_str());
        }
        if !params.statement.is_empty() {
            body.add("statement_description", params.statement.as_str());
        }
        if !params.email.is_empty() {
            body.add("receipt_email", params.email.as_str());
        }
        if params.no_capture {
            body.add("capture", "false");
        }
        if params.fee > 0 {
            body.add("application_fee", params.fee.to_string());
        }

        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::POST,
            "/charges",
            &self.key,
            Some(&body),
        )
    }

    /// Retrieve a charge
    pub fn get(&self, id: &str, params: Option<&Params>) -> Result<Charge> {
        let body = params.map(|p| {
            let mut q = Query::new();
            p.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::GET,
            &format!("/charges/{}", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    /// Update a charge's description or metadata
    pub fn update(&self, id: &str, params: &ChargeParams) -> Result<Charge> {
        let mut body = Query::new();
        if !params.description.is_empty() {
            body.add("description", params.description.as_str());
        }
        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::POST,
            &format!("/charges/{}", urlencoding::encode(id)),
            &self.key,
            Some(&body),
        )
    }

    /// Capture a charge created with `no_capture`
    pub fn capture(&self, id: &str, params: Option<&CaptureParams>) -> Result<Charge> {
        let body = params.map(|p| {
            let mut q = Query::new();
            if p.amount > 0 {
                q.add("amount", p.amount.to_string());
            }
            if p.fee > 0 {
                q.add("application_fee", p.fee.to_string());
            }
            if !p.email.is_empty() {
                q.add("receipt_email", p.email.as_str());
            }
            p.params.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::POST,
            &format!("/charges/{}/capture", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    /// List charges, following pages as the iterator is consumed
    pub fn list(&self, params: Option<&ChargeListParams>) -> Iter {
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
            call_json::<Page<Charge>>(backend.as_ref(), Method::GET, "/charges", &key, Some(q))
        })
    }
}
