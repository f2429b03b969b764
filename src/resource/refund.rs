//! Refunds: `/charges/{charge}/refunds`

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::balance::Transaction;
use super::charge::Charge;
use super::common::{Currency, Expandable};
use crate::api::backend::{call_json, Backend};
use crate::error::Result;
use crate::list::{ListIter, ListObject, ListParams, Page, Params, Query};

/// A refund of part or all of a charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, rename = "balance_transaction")]
    pub transaction: Option<Expandable<Transaction>>,
    #[serde(default)]
    pub charge: Option<Expandable<Charge>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ListObject for Refund {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Parameters for creating, retrieving or updating a refund
#[derive(Debug, Clone, Default)]
pub struct RefundParams {
    pub params: Params,
    pub charge: String,
    pub amount: u64,
    pub fee: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RefundListParams {
    pub list: ListParams,
    pub charge: String,
}

pub type Iter = ListIter<Refund>;

/// Client for a charge's refunds
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn Backend>,
    key: String,
}

fn refunds_path(charge: &str) -> String {
    format!("/charges/{}/refunds", urlencoding::encode(charge))
}

impl Client {
    pub fn new(backend: Arc<dyn Backend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Refund a charge
    pub fn create(&self, params: &RefundParams) -> Result<Refund> {
        let mut body = Query::new();
        if params.amount > 0 {
            body.add("amount", params.amount.to_string());
        }
        if params.fee {
            body.add("refund_application_fee", "true");
        }
        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::POST,
            &refunds_path(&params.charge),
            &self.key,
            Some(&body),
        )
    }

    pub fn get(&self, id: &str, params: &RefundParams) -> Result<Refund> {
        let mut body = Query::new();
        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::GET,
            &format!("{}/{}", refunds_path(&params.charge), urlencoding::encode(id)),
            &self.key,
            Some(&body),
        )
    }

    /// Update a refund's metadata
    pub fn update(&self, id: &str, params: &RefundParams) -> Result<Refund> {
        let mut body = Query::new();
        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::POST,
            &format!("{}/{}", refunds_path(&params.charge), urlencoding::encode(id)),
            &self.key,
            Some(&body),
        )
    }

    /// List the refunds of one charge
    pub fn list(&self, params: &RefundListParams) -> Iter {
        let mut query = Query::new();
        params.list.append_to(&mut query);

        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();
        let path = refunds_path(&params.charge);
        ListIter::new(Some(&params.list), query, move |q: &Query| {
            call_json::<Page<Refund>>(backend.as_ref(), Method::GET, &path, &key, Some(q))
        })
    }
}
