//! Catalog payloads.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Most units a shopper can pick for a single product in one go.
pub const MAX_SELECTABLE_QUANTITY: u32 = 10;

/// Product categories offered by the catalog filter.
pub const CATEGORIES: &[&str] = &["Men", "Women", "Unisex"];

/// A product as returned by `GET /products` and `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Upper bound of the quantity picker: the stock, capped at
    /// [`MAX_SELECTABLE_QUANTITY`]. Zero when out of stock.
    #[must_use]
    pub fn max_selectable_quantity(&self) -> u32 {
        u32::try_from(self.stock).map_or(0, |stock| stock.min(MAX_SELECTABLE_QUANTITY))
    }
}

/// Response body of `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Body of `POST /products`. Every field is required by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub stock: u32,
    pub category: String,
}

/// Body of `PUT /products/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductUpdate {
    /// True when no field would be sent; the backend rejects such updates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.stock.is_none()
            && self.category.is_none()
    }
}

/// Acknowledgement returned by the admin product endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductMutation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

/// Query parameters for `GET /products`.
///
/// Unset filters are left out of the query string entirely. The backend
/// treats any `in_stock` value as true, so it is only ever sent as `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ProductFilter {
    /// Restrict to a category. Empty strings mean "all".
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.is_empty()).then_some(category);
        self
    }

    /// Restrict to a price range; either bound may be open.
    #[must_use]
    pub const fn price_range(mut self, min: Option<Price>, max: Option<Price>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Only show products with stock left.
    #[must_use]
    pub const fn in_stock_only(mut self, only: bool) -> Self {
        self.in_stock = if only { Some(true) } else { None };
        self
    }

    /// Cap the number of returned products.
    #[must_use]
    pub const fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Whether the in-stock restriction is active.
    #[must_use]
    pub const fn is_in_stock_only(&self) -> bool {
        matches!(self.in_stock, Some(true))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(stock: i32) -> Product {
        Product {
            product_id: ProductId::new(1),
            name: "Premium Sneaker".to_string(),
            description: String::new(),
            price: Price::from_cents(9999),
            image_url: String::new(),
            stock,
            category: "Men".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_max_selectable_quantity() {
        assert_eq!(product(50).max_selectable_quantity(), 10);
        assert_eq!(product(3).max_selectable_quantity(), 3);
        assert_eq!(product(0).max_selectable_quantity(), 0);
        assert_eq!(product(-2).max_selectable_quantity(), 0);
        assert!(!product(0).in_stock());
    }

    #[test]
    fn test_filter_omits_unset_fields() {
        let filter = ProductFilter::default().category("").in_stock_only(false);
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({}));

        let filter = ProductFilter::default()
            .category("Women")
            .price_range(Some(Price::from_cents(1000)), None)
            .in_stock_only(true)
            .limit(Some(5));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"category": "Women", "min_price": 10.0, "in_stock": true, "limit": 5})
        );
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = ProductUpdate {
            stock: Some(4),
            ..ProductUpdate::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"stock": 4}));
        assert!(ProductUpdate::default().is_empty());
    }

    #[test]
    fn test_product_accepts_string_price() {
        let p: Product = serde_json::from_value(json!({
            "product_id": 2,
            "name": "Tee",
            "price": "15.50",
            "stock": 4,
            "category": "Unisex",
            "created_at": "Wed, 01 Jan 2025 10:00:00 GMT"
        }))
        .unwrap();
        assert_eq!(p.price, Price::from_cents(1550));
        assert!(p.in_stock());
    }
}
