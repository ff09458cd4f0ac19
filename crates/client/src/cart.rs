//! Persistent shopping cart.
//!
//! The cart is an ordered list of line items, unique by product, held in
//! memory and written through to storage on every change. Readers never see a
//! state that has not been flushed.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use elitecart_core::{LineItem, Product, ProductId};

use crate::storage::{self, Restored, Storage, keys};

/// The shopper's cart.
///
/// Quantities inside the cart are always at least 1: setting a quantity to
/// zero or below removes the line instead.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    items: Vec<LineItem>,
}

impl CartStore {
    /// Restore the cart from storage.
    ///
    /// A missing record gives an empty cart. So does a record that cannot be
    /// read or decoded; that case is logged and otherwise ignored.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let items = match storage::restore_json::<Vec<LineItem>>(storage.as_ref(), keys::CART) {
            Restored::Present(items) => normalize(items),
            Restored::Absent => Vec::new(),
            Restored::Corrupt(reason) => {
                warn!(%reason, "Discarding unreadable cart record");
                Vec::new()
            }
        };
        debug!(lines = items.len(), "Cart restored");
        Self { storage, items }
    }

    /// Line items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line for a product, if it is in the cart.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product is already in the cart its quantity grows by `quantity`;
    /// otherwise a new line is appended. Adding zero units does nothing. Stock
    /// is not checked here.
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            debug!("Ignoring add of zero units");
            return;
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(LineItem::from_product(product, quantity)),
        }
        self.persist();
    }

    /// Drop a product from the cart. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Set a product's quantity.
    ///
    /// Zero or negative quantities remove the line. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.quantity = quantity;
            self.persist();
        }
    }

    /// Empty the cart and delete its persisted record.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.items.clear();
        storage::remove_best_effort(self.storage.as_ref(), keys::CART);
    }

    /// Sum of price times quantity over all lines; zero when empty.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    fn persist(&self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => storage::write_best_effort(self.storage.as_ref(), keys::CART, &json),
            Err(e) => warn!(error = %e, "Failed to serialize cart"),
        }
    }
}

/// Restore the cart invariants on a decoded record: zero-quantity lines are
/// dropped and repeated products are merged into their first occurrence.
fn normalize(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity == 0 {
            debug!(product_id = %item.product_id, "Dropping restored line with no quantity");
            continue;
        }
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => merged.push(item),
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elitecart_core::Price;
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::storage::testing::BrokenStorage;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            image_url: format!("https://img.example.com/{id}.jpg"),
            stock: 20,
            category: "Unisex".to_string(),
            created_at: None,
        }
    }

    fn cart() -> (CartStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (CartStore::load(Arc::new(storage.clone())), storage)
    }

    fn persisted(storage: &MemoryStorage) -> Option<serde_json::Value> {
        storage
            .get(keys::CART)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let (mut cart, _) = cart();
        let p = product(1, 1000);

        cart.add_item(&p, 1);
        cart.add_item(&p, 2);
        cart.add_item(&p, 4);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(p.product_id).unwrap().quantity, 7);
    }

    #[test]
    fn test_add_appends_in_order_and_persists() {
        let (mut cart, storage) = cart();
        cart.add_item(&product(2, 500), 1);
        cart.add_item(&product(1, 1000), 3);

        let ids: Vec<i32> = cart.items().iter().map(|i| i.product_id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);

        let record = persisted(&storage).unwrap();
        assert_eq!(record.as_array().unwrap().len(), 2);
        assert_eq!(record[1]["quantity"], json!(3));
    }

    #[test]
    fn test_add_zero_is_noop() {
        let (mut cart, storage) = cart();
        cart.add_item(&product(1, 1000), 0);
        assert!(cart.is_empty());
        assert!(!storage.contains(keys::CART));
    }

    #[test]
    fn test_update_to_zero_or_negative_removes() {
        let (mut cart, _) = cart();
        cart.add_item(&product(1, 1000), 2);
        cart.add_item(&product(2, 1000), 2);

        cart.update_quantity(ProductId::new(1), 0);
        cart.update_quantity(ProductId::new(2), -1);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_sets_rather_than_increments() {
        let (mut cart, storage) = cart();
        cart.add_item(&product(1, 1000), 2);

        cart.update_quantity(ProductId::new(1), 5);

        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
        assert_eq!(persisted(&storage).unwrap()[0]["quantity"], json!(5));
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let (mut cart, _) = cart();
        cart.add_item(&product(1, 1000), 2);
        cart.update_quantity(ProductId::new(99), 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_item_count(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut cart, _) = cart();
        cart.add_item(&product(1, 1000), 2);
        let before = cart.items().to_vec();

        cart.remove_item(ProductId::new(42));

        assert_eq!(cart.items(), before.as_slice());
    }

    #[test]
    fn test_removing_last_line_keeps_empty_record() {
        let (mut cart, storage) = cart();
        cart.add_item(&product(1, 1000), 1);
        cart.remove_item(ProductId::new(1));
        assert_eq!(persisted(&storage), Some(json!([])));
    }

    #[test]
    fn test_clear_deletes_record() {
        let (mut cart, storage) = cart();
        cart.add_item(&product(1, 1000), 1);

        cart.clear();

        assert!(cart.is_empty());
        assert!(!storage.contains(keys::CART));

        let reloaded = CartStore::load(Arc::new(storage.clone()));
        assert!(reloaded.is_empty());
        cart.clear();
        assert!(CartStore::load(Arc::new(storage)).is_empty());
    }

    #[test]
    fn test_totals() {
        let (mut cart, _) = cart();
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.total_item_count(), 0);

        cart.add_item(&product(1, 1999), 2);
        cart.add_item(&product(2, 500), 3);

        assert_eq!(cart.total_price(), Decimal::new(5498, 2));
        assert_eq!(cart.total_item_count(), 5);
    }

    #[test]
    fn test_total_treats_bad_price_as_zero() {
        let storage = MemoryStorage::new();
        storage
            .set(
                keys::CART,
                r#"[{"product_id":1,"name":"A","price":10,"quantity":2},
                    {"product_id":2,"name":"B","price":"bad","quantity":3}]"#,
            )
            .unwrap();

        let cart = CartStore::load(Arc::new(storage));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_price(), Decimal::from(20));
        assert_eq!(cart.total_item_count(), 5);
    }

    #[test]
    fn test_missing_fields_only_affect_their_line() {
        let storage = MemoryStorage::new();
        storage
            .set(
                keys::CART,
                r#"[{"product_id":1,"name":"A","price":10,"quantity":2},
                    {"product_id":2,"name":"B","quantity":3},
                    {"product_id":3,"name":"C","price":5}]"#,
            )
            .unwrap();

        let cart = CartStore::load(Arc::new(storage));

        assert_eq!(cart.len(), 2);
        assert!(cart.get(ProductId::new(3)).is_none());
        assert_eq!(cart.total_price(), Decimal::from(20));
        assert_eq!(cart.total_item_count(), 5);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let (mut cart, storage) = cart();
        cart.add_item(&product(3, 300), 1);
        cart.add_item(&product(1, 1999), 2);
        cart.add_item(&product(2, 4550), 5);

        let reloaded = CartStore::load(Arc::new(storage));

        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_load_corrupt_record_gives_empty_cart() {
        let storage = MemoryStorage::new();
        storage.set(keys::CART, "not json at all").unwrap();
        assert!(CartStore::load(Arc::new(storage.clone())).is_empty());

        storage.set(keys::CART, r#"{"product_id":1}"#).unwrap();
        assert!(CartStore::load(Arc::new(storage)).is_empty());
    }

    #[test]
    fn test_load_normalizes_record() {
        let storage = MemoryStorage::new();
        storage
            .set(
                keys::CART,
                r#"[{"product_id":1,"name":"A","price":1,"quantity":2},
                    {"product_id":2,"name":"B","price":1,"quantity":0},
                    {"product_id":3,"name":"C","price":1,"quantity":"x"},
                    {"product_id":1,"name":"A","price":1,"quantity":3}]"#,
            )
            .unwrap();

        let cart = CartStore::load(Arc::new(storage));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 5);
    }

    #[test]
    fn test_broken_storage_never_fails_operations() {
        let mut cart = CartStore::load(Arc::new(BrokenStorage));
        let p = product(1, 1000);

        cart.add_item(&p, 2);
        cart.update_quantity(p.product_id, 4);
        assert_eq!(cart.total_item_count(), 4);

        cart.clear();
        assert!(cart.is_empty());
    }
}
