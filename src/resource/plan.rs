//! Plans: `/plans`

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::common::{Currency, Deleted};
use crate::api::backend::{call_json, Backend};
use crate::error::Result;
use crate::list::{ListIter, ListObject, ListParams, Page, Params, Query};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
            Interval::Year => "year",
        }
    }
}

/// A recurring price for subscriptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    #[serde(default, rename = "livemode")]
    pub live: bool,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub currency: Currency,
    pub interval: Interval,
    #[serde(default)]
    pub interval_count: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub trial_period_days: Option<u64>,
    #[serde(default)]
    pub statement_description: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ListObject for Plan {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanParams {
    pub params: Params,
    pub id: String,
    pub name: String,
    pub amount: u64,
    pub currency: Currency,
    pub interval: Interval,
    pub interval_count: u64,
    pub trial_period: u64,
    pub statement: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlanListParams {
    pub list: ListParams,
}

pub type Iter = ListIter<Plan>;

/// Client for `/plans`
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

    pub fn create(&self, params: &PlanParams) -> Result<Plan> {
        let mut body = Query::new();
        body.add("id", params.id.as_str());
        body.add("name", params.name.as_str());
        body.add("amount", params.amount.to_string());
        body.add("currency", params.currency.as_str());
        body.add("interval", params.interval.as_str());

        if params.interval_count > 0 {
            body.add("interval_count", params.interval_count.to_string());
        }
        if params.trial_period > 0 {
            body.add("trial_period_days", params.trial_period.to_string());
        }
        if !params.statement.is_empty() {
            body.add("statement_description", params.statement.as_str());
        }
        params.params.append_to(&mut body);

        call_json(
            self.backend.as_ref(),
            Method::POST,
            "/plans",
            &self.key,
            Some(&body),
        )
    }

    pub fn get(&self, id: &str, params: Option<&Params>) -> Result<Plan> {
        let body = params.map(|p| {
            let mut q = Query::new();
            p.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::GET,
            &format!("/plans/{}", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    /// Rename a plan or change its metadata
    pub fn update(&self, id: &str, params: Option<&PlanParams>) -> Result<Plan> {
        let body = params.map(|p| {
            let mut q = Query::new();
            if !p.name.is_empty() {
                q.add("name", p.name.as_str());
            }
            if !p.statement.is_empty() {
                q.add("statement_description", p.statement.as_str());
            }
            p.params.append_to(&mut q);
            q
        });

        call_json(
            self.backend.as_ref(),
            Method::POST,
            &format!("/plans/{}", urlencoding::encode(id)),
            &self.key,
            body.as_ref(),
        )
    }

    pub fn delete(&self, id: &str) -> Result<Deleted> {
        call_json(
            self.backend.as_ref(),
            Method::DELETE,
            &format!("/plans/{}", urlencoding::encode(id)),
            &self.key,
            None,
        )
    }

    pub fn list(&self, params: Option<&PlanListParams>) -> Iter {
        let mut query = Query::new();
        let mut list_params = None;

        if let Some(params) = params {
            params.list.append_to(&mut query);
            list_params = Some(&params.list);
        }

        let backend = Arc::clone(&self.backend);
        let key = self.key.clone();
        ListIter::new(list_params, query, move |q: &Query| {
            call_json::<Page<Plan>>(backend.as_ref(), Method::GET, "/plans", &key, Some(q))
        })
    }
}
