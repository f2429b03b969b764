//! Balance and balance history: `/balance`, `/balance/history`

use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::Currency;
use crate::api::backend::{call_json, Backend};
use crate::error::Result;
use crate::list::{ListIter, ListObject, ListParams, Page, Params, Query};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Available,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Charge,
    Refund,
    Adjustment,
    ApplicationFee,
    ApplicationFeeRefund,
    Transfer,
    TransferCancel,
    TransferFailure,
    #[serde(other)]
    Unknown,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Charge => "charge",
            TransactionType::Refund => "refund",
            TransactionType::Adjustment => "adjustment",
            TransactionType::ApplicationFee => "application_fee",
            TransactionType::ApplicationFeeRefund => "application_fee_refund",
            TransactionType::Transfer => "transfer",
            TransactionType::TransferCancel => "transfer_cancel",
            TransactionType::TransferFailure => "transfer_failure",
            TransactionType::Unknown => "unknown",
        }
    }
}

/// Funds in one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub amount: i64,
    pub currency: Currency,
}

/// Account balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(default, rename = "livemode")]
    pub live: bool,
    #[serde(default)]
    pub available: Vec<Amount>,
    #[serde(default)]
    pub pending: Vec<Amount>,
}

/// One movement of funds in the balance history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub available_on: i64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub fee: i64,
    #[serde(default)]
    pub net: i64,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl ListObject for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Filters for listing balance history
#[derive(Debug, Clone, Default)]
pub struct TransactionListParams {
    pub list: ListParams,
    pub created: i64,
    pub available: i64,
    pub currency: String,
    pub source: String,
    pub transfer: String,
    pub kind: Option<TransactionType>,
}

pub type Iter = ListIter<Transaction>;

/// Client for `/balance`
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

    /// Current balance
    pub fn get(&self, params: Option<&Params>) -> Result<Balance> {
        let body = params.map(|p| {
            let mut q = Query::new();
            p.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::GET,
            "/balance",
            &self.key,
            body.as_ref(),
        )
    }

    /// A single balance transaction
    pub fn get_transaction(&self, id: &str, params: Option<&Params>) -> Result<Transaction> {
        let body = params.map(|p| {
            let mut q = Query::new();
            p.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::GET,
            &format!("/balance/history/{}", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    /// List balance history
    pub fn list(&self, params: Option<&TransactionListParams>) -> Iter {
        let mut query = Query::new();
        let mut list_params = None;

        if let Some(params) = params {
            if params.created > 0 {
                query.add("created", params.created.to_string());
            }
            if params.available > 0 {
                query.add("available_on", params.available.to_string());
            }
            if !params.currency.is_empty() {
                query.add("currency", params.currency.as_str());
            }
            if !params.source.is_empty() {
                query.add("source", params.source.as_str());
            }
            if !params.transfer.is_empty() {
                query.add("transfer", params.transfer.as_str());
            }
            if let Some(kind) = params.kind {
                query.add("type", kind.as_str());
            }
            params.list.append_to(&mut query);
            list_params = Some(&params.list);
        }

        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();
        ListIter::new(list_params, query, move |q: &Query| {
            call_json::<Page<Transaction>>(backend.as_ref(), Method::GET, "/balance/history", &key, Some(q))
        })
    }
}
