//! Lead records and their raw, provider-shaped counterparts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A discovered business.
///
/// `id` is generated on ingestion and never derived from content.
/// `name` is non-empty and, with `address`, forms the dedup identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Lead {
    /// Create a lead with only a name; other fields empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: String::new(),
            phone: String::new(),
            website: String::new(),
            rating: None,
            review_count: None,
            description: String::new(),
            email: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_review_count(mut self, count: u64) -> Self {
        self.review_count = Some(count);
        self
    }

    /// Key for case-insensitive name comparison.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Key for exact address comparison, `None` when blank.
    pub fn address_key(&self) -> Option<&str> {
        let trimmed = self.address.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// One element of a provider batch, before validation.
///
/// Every field is untyped: the provider may send numbers as strings,
/// strings as numbers, or nulls anywhere. Built from any JSON object;
/// unknown keys are ignored and repeated spellings of the review count
/// never make an object unreadable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawLead {
    pub name: Option<Value>,
    pub address: Option<Value>,
    pub phone: Option<Value>,
    pub website: Option<Value>,
    pub rating: Option<Value>,
    pub review_count: Option<Value>,
    pub description: Option<Value>,
    pub email: Option<Value>,
}

/// Accepted spellings of the review count, in order of preference.
const REVIEW_COUNT_KEYS: [&str; 3] = ["reviewCount", "reviews", "review_count"];

impl From<Map<String, Value>> for RawLead {
    fn from(mut object: Map<String, Value>) -> Self {
        let review_count = REVIEW_COUNT_KEYS
            .iter()
            .filter_map(|key| object.remove(*key))
            .find(|value| !value.is_null());

        Self {
            name: object.remove("name"),
            address: object.remove("address"),
            phone: object.remove("phone"),
            website: object.remove("website"),
            rating: object.remove("rating"),
            review_count,
            description: object.remove("description"),
            email: object.remove("email"),
        }
    }
}

impl RawLead {
    /// Validate and coerce into a [`Lead`] with a fresh id.
    ///
    /// Returns `None` when the name is missing or blank.
    pub fn into_lead(self) -> Option<Lead> {
        let name = coerce_text(self.name.as_ref());
        if name.is_empty() {
            return None;
        }

        let email = coerce_text(self.email.as_ref());

        Some(Lead {
            id: Uuid::new_v4(),
            name,
            address: coerce_text(self.address.as_ref()),
            phone: coerce_text(self.phone.as_ref()),
            website: coerce_text(self.website.as_ref()),
            rating: coerce_rating(self.rating.as_ref()),
            review_count: coerce_count(self.review_count.as_ref()),
            description: coerce_text(self.description.as_ref()),
            email: (!email.is_empty()).then_some(email),
        })
    }
}

fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_rating(value: Option<&Value>) -> Option<f64> {
    let rating = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (rating.is_finite() && rating >= 0.0).then_some(rating)
}

fn coerce_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => s.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    }
}

/// Subject and body of a drafted outreach email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}
