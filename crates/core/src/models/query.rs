//! List query: filters and sort order sent with a product listing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sortable product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Name,
    Price,
    Quantity,
    UpdatedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Price => "price",
            SortBy::Quantity => "quantity",
            SortBy::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "price" => Ok(SortBy::Price),
            "quantity" => Ok(SortBy::Quantity),
            "updated_at" => Ok(SortBy::UpdatedAt),
            other => Err(Error::Validation(format!(
                "Invalid sort field '{}', expected name|price|quantity|updated_at",
                other
            ))),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(Error::Validation(format!(
                "Invalid sort direction '{}', expected asc|desc",
                other
            ))),
        }
    }
}

/// Filters and ordering for a product listing
///
/// Every field is optional. Unset fields, and blank search text, are left
/// out of the outgoing request entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub text: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<i64>,
    pub has_image: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub sort_dir: Option<SortDir>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn min_quantity(mut self, min_quantity: i64) -> Self {
        self.min_quantity = Some(min_quantity);
        self
    }

    pub fn has_image(mut self, has_image: bool) -> Self {
        self.has_image = Some(has_image);
        self
    }

    pub fn sort(mut self, sort_by: SortBy, sort_dir: SortDir) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_dir = Some(sort_dir);
        self
    }

    /// Query-string pairs in wire naming, with unset and blank entries dropped
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            params.push(("q", text.to_string()));
        }
        if let Some(min_price) = self.min_price {
            params.push(("min_price", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            params.push(("max_price", max_price.to_string()));
        }
        if let Some(min_quantity) = self.min_quantity {
            params.push(("min_qty", min_quantity.to_string()));
        }
        if let Some(has_image) = self.has_image {
            params.push(("has_image", has_image.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.as_str().to_string()));
        }
        if let Some(sort_dir) = self.sort_dir {
            params.push(("sort_dir", sort_dir.as_str().to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(ListQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_only_set_filters_are_sent() {
        let params = ListQuery::new().min_price(10.0).has_image(true).to_params();
        assert_eq!(
            params,
            vec![
                ("min_price", "10".to_string()),
                ("has_image", "true".to_string())
            ]
        );
    }

    #[test]
    fn test_blank_text_is_omitted() {
        let params = ListQuery::new().text("   ").to_params();
        assert!(params.is_empty());

        let params = ListQuery::new().text(" an ").to_params();
        assert_eq!(params, vec![("q", "an".to_string())]);
    }

    #[test]
    fn test_full_query_uses_wire_names() {
        let params = ListQuery::new()
            .text("mango")
            .min_price(1.5)
            .max_price(9.0)
            .min_quantity(3)
            .has_image(false)
            .sort(SortBy::UpdatedAt, SortDir::Desc)
            .to_params();
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["q", "min_price", "max_price", "min_qty", "has_image", "sort_by", "sort_dir"]
        );
        assert_eq!(params[1].1, "1.5");
        assert_eq!(params[5].1, "updated_at");
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("PRICE".parse::<SortBy>().unwrap(), SortBy::Price);
        assert_eq!("desc".parse::<SortDir>().unwrap(), SortDir::Desc);
        assert!("color".parse::<SortBy>().is_err());
        assert!("up".parse::<SortDir>().is_err());
    }
}
