//! Product model and write payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// A product as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "wire::decimal")]
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "wire::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Payload for creating a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            quantity,
            image_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Empty optional text is sent as absent
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.filter(|d| !d.trim().is_empty());
        self.image_url = self
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }
}

/// Partial update payload
///
/// Unset fields are left out of the request body. The nested options on
/// `description` and `image_url` distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
}

impl ProductPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = Some(image_url);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.image_url.is_none()
    }

    /// Empty optional text becomes an explicit clear
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.description = self
            .description
            .map(|d| d.filter(|d| !d.trim().is_empty()));
        self.image_url = self
            .image_url
            .map(|u| u.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_accepts_decimal_string_and_naive_timestamp() {
        let json = r#"{
            "id": 7,
            "name": "Shampoo",
            "description": null,
            "price": "12.50",
            "quantity": 5,
            "image_url": "http://img/shampoo.png",
            "updated_at": "2025-09-05T10:00:00"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.price, 12.5);
        assert!(product.has_image());
        assert_eq!(product.updated_at.timestamp(), 1757066400);
    }

    #[test]
    fn test_product_accepts_numeric_price_and_missing_optionals() {
        let json = r#"{"id":1,"name":"Apple","price":3.0,"quantity":50,"updated_at":"2025-09-05T10:00:00Z"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, 3.0);
        assert!(product.description.is_none());
        assert!(!product.has_image());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = ProductPatch::new().quantity(9);
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"quantity":9}"#);

        let clear = ProductPatch::new().image_url(None);
        assert_eq!(serde_json::to_string(&clear).unwrap(), r#"{"image_url":null}"#);
    }

    #[test]
    fn test_draft_normalized_drops_blank_optionals() {
        let draft = ProductDraft::new(" Mango ", 5.5, 10)
            .with_description("   ")
            .with_image_url("");
        let draft = draft.normalized();
        assert_eq!(draft.name, "Mango");
        assert!(draft.description.is_none());
        assert!(draft.image_url.is_none());
    }

    #[test]
    fn test_patch_normalized_turns_blank_image_into_clear() {
        let patch = ProductPatch::new().image_url(Some(" ".into())).normalized();
        assert_eq!(patch.image_url, Some(None));
    }
}
