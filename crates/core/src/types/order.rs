//! Order payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, OrderItemId, ProductId, UserId};
use super::line_item::{LineItem, lenient_quantity};
use super::price::Price;

/// One entry of an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
///
/// Only ids and quantities are sent; the backend prices the order itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
}

impl OrderRequest {
    /// Build a request from the cart's line items, preserving their order.
    #[must_use]
    pub fn from_line_items(items: &[LineItem]) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| OrderItemRequest {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default)]
    pub message: Option<String>,
    pub order_id: OrderId,
    pub total_amount: Price,
    #[serde(default)]
    pub items_count: usize,
}

/// A line of a placed order, priced at the time of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub product_id: ProductId,
    #[serde(deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    pub price: Price,
}

impl OrderItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// A placed order, as listed in the order history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub total_amount: Price,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The calendar date the order was placed on, if the timestamp parses.
    ///
    /// The backend has emitted RFC 2822 (`Wed, 01 Jan 2025 10:00:00 GMT`),
    /// RFC 3339 and plain `YYYY-MM-DD HH:MM:SS` timestamps over time.
    #[must_use]
    pub fn placed_on(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
                    .map(|dt| dt.date())
                    .ok()
            })
    }

    /// Number of distinct lines in the order.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Response body of `GET /orders/user/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order_with_date(created_at: &str) -> Order {
        serde_json::from_value(json!({
            "order_id": 1,
            "created_at": created_at,
            "total_amount": "20.00",
        }))
        .unwrap()
    }

    #[test]
    fn test_placed_on_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            order_with_date("Wed, 01 Jan 2025 10:00:00 GMT").placed_on(),
            Some(expected)
        );
        assert_eq!(
            order_with_date("2025-01-01T10:00:00+00:00").placed_on(),
            Some(expected)
        );
        assert_eq!(
            order_with_date("2025-01-01 10:00:00").placed_on(),
            Some(expected)
        );
        assert_eq!(order_with_date("yesterday").placed_on(), None);
    }

    #[test]
    fn test_order_history_payload() {
        let list: OrderList = serde_json::from_value(json!({
            "orders": [{
                "order_id": 12,
                "user_id": 3,
                "created_at": "Wed, 01 Jan 2025 10:00:00 GMT",
                "total_amount": 59.97,
                "items": [
                    {"order_item_id": 1, "order_id": 12, "product_id": 4, "quantity": 3, "price": "19.99"}
                ]
            }],
            "count": 1
        }))
        .unwrap();

        let order = list.orders.first().unwrap();
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.items.first().unwrap().line_total(), Decimal::new(5997, 2));
        assert_eq!(order.total_amount, Price::from_cents(5997));
    }

    #[test]
    fn test_order_request_keeps_cart_order() {
        let items: Vec<LineItem> = serde_json::from_value(json!([
            {"product_id": 5, "name": "B", "price": 1, "quantity": 2},
            {"product_id": 2, "name": "A", "price": 1, "quantity": 1},
        ]))
        .unwrap();

        let request = OrderRequest::from_line_items(&items);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"items": [
                {"product_id": 5, "quantity": 2},
                {"product_id": 2, "quantity": 1},
            ]})
        );
    }
}
