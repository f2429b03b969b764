//! Shared request parameters and their query translation
//!
//! Translation is presence-driven: a field only produces a pair when it holds
//! a non-default value.

use std::collections::BTreeMap;

use super::query::Query;

pub const LIMIT: &str = "limit";
pub const STARTING_AFTER: &str = "starting_after";
pub const ENDING_BEFORE: &str = "ending_before";

/// Parameters accepted by every non-list operation
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub metadata: BTreeMap<String, String>,
    pub expand: Vec<String>,
}

impl Params {
    pub fn append_to(&self, query: &mut Query) {
        for (key, value) in &self.metadata {
            query.add(format!("metadata[{key}]"), value.as_str());
        }
        for field in &self.expand {
            query.add("expand[]", field.as_str());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Filter {
    key: String,
    op: String,
    value: String,
}

/// Free-form list filters, e.g. `created[gt]=1400000000`
#[derive(Debug, Clone, Default)]
pub struct Filters {
    entries: Vec<Filter>,
}

impl Filters {
    /// Add a filter. An empty `op` renders as `key=value`, otherwise `key[op]=value`.
    pub fn add_filter(&mut self, key: &str, op: &str, value: &str) {
        self.entries.push(Filter {
            key: key.to_string(),
            op: op.to_string(),
            value: value.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append_to(&self, query: &mut Query) {
        for f in &self.entries {
            if f.op.is_empty() {
                query.add(f.key.as_str(), f.value.as_str());
            } else {
                query.add(format!("{}[{}]", f.key, f.op), f.value.as_str());
            }
        }
    }
}

/// Pagination intent shared by every list operation
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Return items after this id
    pub start: Option<String>,
    /// Return items before this id; takes precedence over `start`
    pub end: Option<String>,
    /// Page size; `Some(0)` is treated as unset
    pub limit: Option<u64>,
    /// Fetch one page only, never auto-advance
    pub single: bool,
    pub filters: Filters,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn starting_after(mut self, id: impl Into<String>) -> Self {
        self.start = Some(id.into());
        self
    }

    pub fn ending_before(mut self, id: impl Into<String>) -> Self {
        self.end = Some(id.into());
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Whether traversal pages backward via `ending_before`
    pub fn is_backward(&self) -> bool {
        self.end.as_deref().is_some_and(|e| !e.is_empty())
    }

    pub fn append_to(&self, query: &mut Query) {
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.add(LIMIT, limit.to_string());
        }

        if self.is_backward() {
            if let Some(end) = &self.end {
                query.add(ENDING_BEFORE, end.as_str());
            }
        } else if let Some(start) = self.start.as_deref().filter(|s| !s.is_empty()) {
            query.add(STARTING_AFTER, start);
        }

        self.filters.append_to(query);
    }
}
