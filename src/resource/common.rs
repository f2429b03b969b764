//! Types shared between resources

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::list::ListObject;

/// Lowercase ISO currency code, e.g. `usd`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(pub String);

impl Currency {
    pub const USD: &'static str = "usd";
    pub const EUR: &'static str = "eur";
    pub const GBP: &'static str = "gbp";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Currency {
    fn from(value: &str) -> Self {
        Currency(value.to_lowercase())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference that is either a bare id or, when expanded, the full object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(Box<T>),
}

impl<T: ListObject> Expandable<T> {
    pub fn id(&self) -> &str {
        match self {
            Expandable::Id(id) => id,
            Expandable::Object(obj) => obj.id(),
        }
    }

    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Id(_) => None,
            Expandable::Object(obj) => Some(obj),
        }
    }
}

/// Acknowledgement returned by DELETE endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

/// Customer as embedded in other resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default, rename = "livemode")]
    pub live: bool,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ListObject for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Invoice as referenced from charges and invoice items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(default, rename = "livemode")]
    pub live: bool,
    #[serde(default)]
    pub amount_due: i64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub subscription: Option<String>,
}

impl ListObject for Invoice {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payment card attached to a charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last4: String,
    #[serde(default, alias = "type")]
    pub brand: String,
    #[serde(default)]
    pub exp_month: u8,
    #[serde(default)]
    pub exp_year: u16,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}
