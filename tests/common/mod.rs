//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use reqwest::Method;
use serde_json::{json, Value};
use stripe_client::{Backend, Error, Query, Result};

/// One recorded backend call
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub key: String,
    pub form: Option<Query>,
}

/// In-memory backend serving cursor-paginated lists of fixed objects.
///
/// Lists are newest-first; `starting_after` moves toward the end of the
/// list and `ending_before` toward the start, like the real API.
pub struct FakeBackend {
    path: String,
    objects: Vec<Value>,
    default_limit: usize,
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new(path: &str, objects: Vec<Value>) -> Self {
        Self {
            path: path.to_string(),
            objects,
            default_limit: 10,
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make the `n`th call (1-based) fail with a transport error
    pub fn failing_on(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o["id"] == id)
    }

    fn page(&self, form: Option<&Query>) -> Value {
        let limit = form
            .and_then(|f| f.get("limit"))
            .and_then(|l| l.parse().ok())
            .unwrap_or(self.default_limit);

        let (start, end) = if let Some(before) = form.and_then(|f| f.get("ending_before")) {
            let end = self.position(before).unwrap_or(0);
            (end.saturating_sub(limit), end)
        } else {
            let start = form
                .and_then(|f| f.get("starting_after"))
                .and_then(|after| self.position(after))
                .map(|i| i + 1)
                .unwrap_or(0);
            (start, (start + limit).min(self.objects.len()))
        };

        let has_more = if form.and_then(|f| f.get("ending_before")).is_some() {
            start > 0
        } else {
            end < self.objects.len()
        };

        json!({
            "object": "list",
            "url": format!("/v1{}", self.path),
            "has_more": has_more,
            "total_count": self.objects.len(),
            "data": &self.objects[start..end],
        })
    }
}

impl Backend for FakeBackend {
    fn call(&self, method: Method, path: &str, key: &str, form: Option<&Query>) -> Result<String> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                method: method.clone(),
                path: path.to_string(),
                key: key.to_string(),
                form: form.cloned(),
            });
            calls.len()
        };

        if self.fail_on_call == Some(n) {
            return Err(Error::transport("connection reset by peer"));
        }

        if method != Method::GET || path != self.path {
            return Err(Error::from_response(
                404,
                r#"{"error": {"type": "invalid_request_error", "message": "Unrecognized request URL"}}"#,
            ));
        }

        Ok(self.page(form).to_string())
    }
}

pub fn charge_json(id: &str, amount: u64) -> Value {
    json!({
        "id": id,
        "object": "charge",
        "livemode": false,
        "amount": amount,
        "captured": true,
        "created": 1400000000,
        "currency": "usd",
        "paid": true,
        "refunded": false,
        "amount_refunded": 0,
        "customer": "cus_1",
        "metadata": {}
    })
}

pub fn charges(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| charge_json(&format!("ch_{i}"), 100 * i as u64))
        .collect()
}

pub fn plan_json(id: &str) -> Value {
    json!({
        "id": id,
        "object": "plan",
        "amount": 100,
        "currency": "usd",
        "interval": "month",
        "interval_count": 1,
        "name": "Test Plan",
        "metadata": {}
    })
}
