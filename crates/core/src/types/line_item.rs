//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One product in the cart together with the requested quantity.
///
/// A line item carries a snapshot of the product fields the cart needs for
/// display and totals, taken when the product was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    /// Always at least 1 inside a cart. Restored values that do not coerce to
    /// a non-negative integer, or are missing, read as 0 so the cart can drop
    /// them.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

impl LineItem {
    /// Snapshot a product into a line item.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            quantity,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// Deserialize a quantity without ever failing.
///
/// Integers are clamped into `u32`, fractional numbers are truncated, numeric
/// strings are parsed, and everything else (including negatives) is zero.
pub fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_quantity(&value))
}

fn coerce_quantity(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map_or_else(
            || n.as_f64().map_or(0, truncate_f64),
            |v| u32::try_from(v).unwrap_or(u32::MAX),
        ),
        serde_json::Value::String(s) => s.trim().parse::<f64>().map_or(0, truncate_f64),
        _ => 0,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped before the cast
fn truncate_f64(v: f64) -> u32 {
    if v.is_nan() || v < 1.0 {
        0
    } else {
        v.trunc().min(f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item_json(quantity: serde_json::Value) -> serde_json::Value {
        json!({
            "product_id": 1,
            "name": "Runner",
            "price": 10,
            "category": "Men",
            "image_url": "",
            "quantity": quantity,
        })
    }

    #[test]
    fn test_quantity_coercion() {
        let cases = [
            (json!(3), 3),
            (json!(2.9), 2),
            (json!("4"), 4),
            (json!(-1), 0),
            (json!("lots"), 0),
            (json!(null), 0),
            (json!(5_000_000_000_u64), u32::MAX),
        ];
        for (raw, expected) in cases {
            let item: LineItem = serde_json::from_value(item_json(raw.clone())).unwrap();
            assert_eq!(item.quantity, expected, "{raw}");
        }
    }

    #[test]
    fn test_extra_product_fields_are_ignored() {
        let item: LineItem = serde_json::from_value(json!({
            "product_id": 9,
            "name": "Sneaker",
            "description": "High quality sneaker",
            "price": "99.99",
            "stock": 50,
            "quantity": 1,
        }))
        .unwrap();

        assert_eq!(item.product_id, ProductId::new(9));
        assert_eq!(item.price, Price::from_cents(9999));
        assert!(item.category.is_empty());
    }

    #[test]
    fn test_missing_price_and_quantity_read_as_zero() {
        let item: LineItem =
            serde_json::from_value(json!({"product_id": 4, "name": "Bare"})).unwrap();

        assert_eq!(item.price, Price::default());
        assert_eq!(item.quantity, 0);
        assert_eq!(item.line_total(), Decimal::ZERO);
    }

    #[test]
    fn test_line_total() {
        let item: LineItem = serde_json::from_value(item_json(json!(3))).unwrap();
        assert_eq!(item.line_total(), Decimal::from(30));
    }
}
