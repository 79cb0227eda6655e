//! Signed-in buyer profile.

use crate::ids::BuyerId;
use serde::{Deserialize, Serialize};

/// The parent or guardian placing orders, with the children registered to
/// their account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuyerProfile {
    pub id: BuyerId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Child names that photos can be assigned to.
    #[serde(default)]
    pub children: Vec<String>,
}

impl BuyerProfile {
    pub fn new(id: impl Into<BuyerId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, name: impl Into<String>) -> Self {
        self.children.push(name.into());
        self
    }

    /// Case-insensitive match against the registered children.
    pub fn has_child(&self, name: &str) -> bool {
        let name = name.trim();
        self.children.iter().any(|c| c.trim().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_child() {
        let buyer = BuyerProfile::new("b1", "Siti", "siti@example.com").with_child("Adam");
        assert!(buyer.has_child("adam"));
        assert!(buyer.has_child(" Adam "));
        assert!(!buyer.has_child("Hana"));
    }
}
