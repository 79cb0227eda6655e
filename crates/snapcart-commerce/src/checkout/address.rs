//! Address types.

use serde::{Deserialize, Serialize};

/// A delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    /// Recipient name.
    pub recipient_name: String,
    /// Contact phone for the courier.
    pub phone: String,
    /// Address line 1.
    pub address1: String,
    /// Address line 2 (unit, building, etc.).
    #[serde(default)]
    pub address2: Option<String>,
    /// City.
    pub city: String,
    /// Postcode.
    pub postcode: String,
    /// State (e.g., "Selangor").
    pub state: String,
    /// Country name.
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Malaysia".to_string()
}

impl Address {
    /// Create a new address.
    pub fn new(
        recipient_name: impl Into<String>,
        phone: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            phone: phone.into(),
            address1: address1.into(),
            address2: None,
            city: city.into(),
            postcode: postcode.into(),
            state: state.into(),
            country: default_country(),
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("recipient_name", &self.recipient_name),
            ("phone", &self.phone),
            ("address1", &self.address1),
            ("city", &self.city),
            ("postcode", &self.postcode),
            ("state", &self.state),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address1.clone()];
        if let Some(ref addr2) = self.address2 {
            parts.push(addr2.clone());
        }
        parts.push(format!("{} {}", self.postcode, self.city));
        parts.push(self.state.clone());
        parts.push(self.country.clone());
        parts.join(", ")
    }
}
