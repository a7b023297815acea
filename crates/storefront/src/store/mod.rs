//! Cart and favorites store.
//!
//! The [`Store`] is the single source of truth for what is in the cart and
//! what is favorited. It is constructed once at startup with its storage
//! backend and notifier injected, and every mutation:
//!
//! 1. updates the in-memory collection,
//! 2. writes the whole collection to storage (best-effort, see [`crate::storage`]),
//! 3. tells the shopper what happened through the [`Notifier`].

mod line_item;

pub use line_item::CartLineItem;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument, warn};
use zapkart_core::{CartTotals, DEFAULT_PRODUCT_NAME, NotificationKind, ProductId, ProductSnapshot};

use crate::error::add_breadcrumb;
use crate::notifications::Notifier;
use crate::storage::{self, CART_KEY, FAVORITES_KEY, KeyValueStore};

/// Cart and favorites for one shopper session.
pub struct Store {
    cart: Vec<CartLineItem>,
    favorites: Vec<ProductSnapshot>,
    cart_open: bool,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("cart", &self.cart)
            .field("favorites", &self.favorites)
            .field("cart_open", &self.cart_open)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open the store, restoring the cart and favorites from `storage`.
    ///
    /// Never fails. Missing or corrupt data starts the affected collection
    /// empty; the failure is logged.
    #[instrument(skip_all)]
    pub fn open(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let cart = sanitize_cart(storage::load_collection(storage.as_ref(), CART_KEY));
        let favorites =
            sanitize_favorites(storage::load_collection(storage.as_ref(), FAVORITES_KEY));

        debug!(
            cart_lines = cart.len(),
            favorites = favorites.len(),
            "Store opened"
        );

        Self {
            cart,
            favorites,
            cart_open: false,
            storage,
            notifier,
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Cart lines in display (insertion) order.
    #[must_use]
    pub fn cart(&self) -> &[CartLineItem] {
        &self.cart
    }

    /// Favorites in display (insertion) order.
    #[must_use]
    pub fn favorites(&self) -> &[ProductSnapshot] {
        &self.favorites
    }

    /// The cart line for `id`, if any.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.cart.iter().find(|line| line.product_id() == id)
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart
            .iter()
            .fold(0_u64, |count, line| count.saturating_add(line.quantity()))
    }

    /// Subtotal, tax and total of the cart.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(
            self.cart
                .iter()
                .map(|line| (line.product.price, line.quantity())),
        )
    }

    /// Whether `id` is in the favorites list.
    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.favorites.iter().any(|fav| &fav.id == id)
    }

    /// Favorites whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search_favorites(&self, query: &str) -> Vec<&ProductSnapshot> {
        self.favorites
            .iter()
            .filter(|fav| fav.name_matches(query))
            .collect()
    }

    /// Whether the cart drawer is open. Session-only, never persisted.
    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    /// Open or close the cart drawer.
    pub const fn set_cart_open(&mut self, open: bool) {
        self.cart_open = open;
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add one unit of `product`, merging with an existing line.
    #[instrument(skip_all)]
    pub fn add_to_cart(&mut self, product: impl Into<ProductSnapshot>) {
        let product = product.into();
        let id = product.id.to_string();

        let existing = self
            .cart
            .iter_mut()
            .find(|line| line.product_id() == &product.id);

        let message = if let Some(line) = existing {
            line.increment();
            format!("Quantity updated for \"{}\"", product.name)
        } else {
            let message = format!("\"{}\" added to cart", product.name);
            self.cart.push(CartLineItem::new(product));
            message
        };

        debug!(product_id = %id, "Added to cart");
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
        self.persist_cart();
        self.notifier.notify(NotificationKind::Success, Some(message));
    }

    /// Remove the line for `id`. Removing an absent id changes nothing but
    /// still tells the shopper, using the generic product label.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        let name = match self.cart.iter().position(|line| line.product_id() == id) {
            Some(index) => {
                let line = self.cart.remove(index);
                let product_id = id.to_string();
                add_breadcrumb(
                    "cart",
                    "Removed from cart",
                    Some(&[("product_id", product_id.as_str())]),
                );
                self.persist_cart();
                line.product.name
            }
            None => DEFAULT_PRODUCT_NAME.to_string(),
        };

        self.notifier.notify(
            NotificationKind::Success,
            Some(format!("\"{name}\" removed from cart")),
        );
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A quantity below 1 removes the line. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity < 1 {
            self.remove_from_cart(id);
            return;
        }

        let Some(line) = self.cart.iter_mut().find(|line| line.product_id() == id) else {
            debug!("Quantity update for product not in cart");
            return;
        };

        line.set_quantity(quantity.unsigned_abs());
        self.persist_cart();
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        add_breadcrumb("cart", "Cleared cart", None);
        self.persist_cart();
        self.notifier.notify(
            NotificationKind::Success,
            Some("Cart cleared successfully".to_string()),
        );
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Add `product` to favorites, or remove it if already there.
    ///
    /// Returns whether the product is a favorite afterwards. Removal is
    /// announced with the `Error` kind for its styling.
    #[instrument(skip_all)]
    pub fn toggle_favorite(&mut self, product: impl Into<ProductSnapshot>) -> bool {
        let product = product.into();

        let (now_favorite, kind, message) =
            if let Some(index) = self.favorites.iter().position(|fav| fav.id == product.id) {
                self.favorites.remove(index);
                (
                    false,
                    NotificationKind::Error,
                    format!("\"{}\" removed from favorites", product.name),
                )
            } else {
                let message = format!("\"{}\" added to favorites", product.name);
                self.favorites.push(product);
                (true, NotificationKind::Success, message)
            };

        self.persist_favorites();
        self.notifier.notify(kind, Some(message));
        now_favorite
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_cart(&self) {
        storage::save_collection(self.storage.as_ref(), CART_KEY, &self.cart);
    }

    fn persist_favorites(&self) {
        storage::save_collection(self.storage.as_ref(), FAVORITES_KEY, &self.favorites);
    }
}

/// Drop zero-quantity lines and duplicate ids (first occurrence wins).
fn sanitize_cart(lines: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut seen = HashSet::new();
    let before = lines.len();
    let lines: Vec<CartLineItem> = lines
        .into_iter()
        .filter(|line| line.quantity() >= 1 && seen.insert(line.product_id().clone()))
        .collect();

    if lines.len() != before {
        warn!(
            dropped = before - lines.len(),
            "Dropped invalid cart lines from storage"
        );
    }
    lines
}

/// Drop duplicate favorites (first occurrence wins).
fn sanitize_favorites(favorites: Vec<ProductSnapshot>) -> Vec<ProductSnapshot> {
    let mut seen = HashSet::new();
    let before = favorites.len();
    let favorites: Vec<ProductSnapshot> = favorites
        .into_iter()
        .filter(|fav| seen.insert(fav.id.clone()))
        .collect();

    if favorites.len() != before {
        warn!(
            dropped = before - favorites.len(),
            "Dropped duplicate favorites from storage"
        );
    }
    favorites
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use zapkart_core::Product;

    use super::*;
    use crate::notifications::{Notification, RecordingNotifier};
    use crate::storage::MemoryStore;

    struct Fixture {
        storage: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        store: Store,
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryStore::new()))
    }

    fn fixture_with(storage: Arc<MemoryStore>) -> Fixture {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = Store::open(storage.clone(), notifier.clone());
        Fixture {
            storage,
            notifier,
            store,
        }
    }

    fn product(id: i64, name: &str, price: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": name,
            "price": price,
            "category": "home",
        }))
        .unwrap()
    }

    fn last_message(notifier: &RecordingNotifier) -> String {
        notifier.last().and_then(|n| n.message).unwrap_or_default()
    }

    #[test]
    fn test_add_twice_merges_into_one_line() {
        let mut f = fixture();
        let p = product(1, "X", 10);

        f.store.add_to_cart(&p);
        assert_eq!(last_message(&f.notifier), "\"X\" added to cart");

        f.store.add_to_cart(&p);
        assert_eq!(last_message(&f.notifier), "Quantity updated for \"X\"");

        assert_eq!(f.store.cart().len(), 1);
        assert_eq!(f.store.cart()[0].quantity(), 2);
        assert_eq!(f.store.item_count(), 2);
    }

    #[test]
    fn test_add_add_then_zero_scenario() {
        let mut f = fixture();
        let p = product(1, "X", 10);

        f.store.add_to_cart(&p);
        f.store.add_to_cart(&p);
        f.store.update_quantity(&ProductId::from(1), 0);

        assert!(f.store.cart().is_empty());
        assert_eq!(last_message(&f.notifier), "\"X\" removed from cart");
        assert_eq!(f.storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_non_positive_quantity_removes() {
        for quantity in [0, -1, -50, i64::MIN] {
            let mut f = fixture();
            f.store.add_to_cart(&product(7, "Lamp", 5));
            f.store.update_quantity(&ProductId::from(7), quantity);
            assert!(f.store.cart().is_empty(), "quantity {quantity} should remove");
        }
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let mut f = fixture();
        f.store.add_to_cart(&product(1, "X", 10));
        let notifications = f.notifier.received().len();

        f.store.update_quantity(&ProductId::from(1), 12);

        assert_eq!(f.store.line(&ProductId::from(1)).unwrap().quantity(), 12);
        // Quantity edits are silent
        assert_eq!(f.notifier.received().len(), notifications);
    }

    #[test]
    fn test_update_quantity_keeps_large_values_exact() {
        let mut f = fixture();
        f.store.add_to_cart(&product(1, "X", 10));
        f.store.add_to_cart(&product(2, "Y", 1));

        f.store.update_quantity(&ProductId::from(1), 5_000_000_000);
        assert_eq!(
            f.store.line(&ProductId::from(1)).unwrap().quantity(),
            5_000_000_000
        );
        assert_eq!(f.store.item_count(), 5_000_000_001);
        assert_eq!(f.store.totals().subtotal, Decimal::from(50_000_000_001_i64));

        f.store.update_quantity(&ProductId::from(2), i64::MAX);
        assert_eq!(
            f.store.item_count(),
            i64::MAX.unsigned_abs() + 5_000_000_000
        );
    }

    #[test]
    fn test_totals_with_absurd_stored_price_do_not_panic() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(
                CART_KEY,
                r#"[{"id": 1, "name": "A", "price": "70000000000000000000000000000", "quantity": 3},
                    {"id": 2, "name": "B", "price": 10, "quantity": 1}]"#,
            )
            .unwrap();

        let f = fixture_with(storage);

        assert_eq!(f.store.cart().len(), 2);
        assert_eq!(f.store.totals().total, Decimal::MAX);
    }

    #[test]
    fn test_update_quantity_unknown_id_is_ignored() {
        let mut f = fixture();
        f.store.update_quantity(&ProductId::from(99), 3);

        assert!(f.store.cart().is_empty());
        assert!(f.notifier.received().is_empty());
        assert!(f.storage.get(CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut f = fixture();
        f.store.add_to_cart(&product(1, "X", 10));
        let before = f.store.cart().to_vec();

        f.store.remove_from_cart(&ProductId::from(2));

        assert_eq!(f.store.cart(), before.as_slice());
        assert_eq!(last_message(&f.notifier), "\"Product\" removed from cart");
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let mut f = fixture();
        f.store.add_to_cart(&product(3, "C", 1));
        f.store.add_to_cart(&product(1, "A", 1));
        f.store.add_to_cart(&product(2, "B", 1));
        f.store.add_to_cart(&product(3, "C", 1));

        let ids: Vec<String> = f
            .store
            .cart()
            .iter()
            .map(|line| line.product_id().to_string())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_missing_name_uses_generic_label() {
        let mut f = fixture();
        let nameless: Product = serde_json::from_str(r#"{"id": 5, "price": 3}"#).unwrap();

        f.store.add_to_cart(&nameless);

        assert_eq!(f.store.cart()[0].product.name, "Product");
        assert_eq!(last_message(&f.notifier), "\"Product\" added to cart");
    }

    #[test]
    fn test_clear_cart() {
        let mut f = fixture();
        f.store.add_to_cart(&product(1, "X", 10));
        f.store.add_to_cart(&product(2, "Y", 10));

        f.store.clear_cart();

        assert!(f.store.cart().is_empty());
        assert_eq!(last_message(&f.notifier), "Cart cleared successfully");
        assert_eq!(f.storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_totals() {
        let mut f = fixture();
        f.store.add_to_cart(&product(1, "X", 10));
        f.store.add_to_cart(&product(1, "X", 10));
        f.store.add_to_cart(&product(2, "Y", 5));

        let totals = f.store.totals();
        assert_eq!(totals.subtotal, Decimal::from(25));
        assert_eq!(totals.tax, "4.5".parse::<Decimal>().unwrap());
        assert_eq!(totals.total, "29.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_snapshot_is_independent_of_catalog() {
        let mut f = fixture();
        let mut p = product(1, "Old Name", 10);
        f.store.add_to_cart(&p);

        p.title = Some("New Name".to_string());
        p.price = Decimal::from(99);
        f.store.add_to_cart(&p);

        let line = &f.store.cart()[0];
        assert_eq!(line.product.name, "Old Name");
        assert_eq!(line.product.price, Decimal::from(10));
        assert_eq!(line.quantity(), 2);
    }

    #[test]
    fn test_toggle_favorite_is_involution() {
        let mut f = fixture();
        f.store.toggle_favorite(&product(1, "Kept", 1));
        let before: Vec<ProductId> = f.store.favorites().iter().map(|p| p.id.clone()).collect();

        let p = product(2, "Lamp", 20);
        assert!(f.store.toggle_favorite(&p));
        assert!(f.store.is_favorite(&p.id));
        assert_eq!(
            f.notifier.last(),
            Some(Notification {
                kind: NotificationKind::Success,
                message: Some("\"Lamp\" added to favorites".to_string()),
            })
        );

        assert!(!f.store.toggle_favorite(&p));
        assert!(!f.store.is_favorite(&p.id));
        assert_eq!(
            f.notifier.last(),
            Some(Notification {
                kind: NotificationKind::Error,
                message: Some("\"Lamp\" removed from favorites".to_string()),
            })
        );

        let after: Vec<ProductId> = f.store.favorites().iter().map(|p| p.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_favorite_snapshot_can_be_added_to_cart() {
        let mut f = fixture();
        f.store.toggle_favorite(&product(4, "Chair", 40));

        let favorite = f.store.favorites()[0].clone();
        f.store.add_to_cart(favorite);

        assert_eq!(f.store.cart()[0].product.name, "Chair");
        assert!(f.store.is_favorite(&ProductId::from(4)));
    }

    #[test]
    fn test_search_favorites() {
        let mut f = fixture();
        f.store.toggle_favorite(&product(1, "Desk Lamp", 1));
        f.store.toggle_favorite(&product(2, "Office Chair", 1));
        f.store.toggle_favorite(&product(3, "Lamp Shade", 1));

        let names: Vec<&str> = f
            .store
            .search_favorites("lamp")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Desk Lamp", "Lamp Shade"]);
        assert_eq!(f.store.search_favorites("").len(), 3);
    }

    #[test]
    fn test_state_round_trips_through_storage() {
        let storage = Arc::new(MemoryStore::new());
        let mut f = fixture_with(storage.clone());
        f.store.add_to_cart(&product(1, "X", 10));
        f.store.add_to_cart(&product(1, "X", 10));
        f.store.add_to_cart(&product(2, "Y", 3));
        f.store.toggle_favorite(&product(5, "Z", 8));

        let reopened = fixture_with(storage);

        assert_eq!(reopened.store.cart(), f.store.cart());
        assert_eq!(reopened.store.favorites(), f.store.favorites());
        assert!(reopened.notifier.received().is_empty());
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(CART_KEY, "not json at all").unwrap();
        storage.set(FAVORITES_KEY, "[{\"no_id\": true}]").unwrap();

        let f = fixture_with(storage);

        assert!(f.store.cart().is_empty());
        assert!(f.store.favorites().is_empty());
    }

    #[test]
    fn test_load_drops_invalid_lines() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(
                CART_KEY,
                r#"[{"id": 1, "name": "A", "quantity": 2},
                    {"id": 2, "name": "B", "quantity": 0},
                    {"id": 1, "name": "A again", "quantity": 5}]"#,
            )
            .unwrap();

        let f = fixture_with(storage);

        assert_eq!(f.store.cart().len(), 1);
        assert_eq!(f.store.cart()[0].product.name, "A");
        assert_eq!(f.store.cart()[0].quantity(), 2);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let storage = Arc::new(MemoryStore::new());
        let mut f = fixture_with(storage.clone());
        storage.fail_writes(true);

        f.store.add_to_cart(&product(1, "X", 10));
        f.store.toggle_favorite(&product(1, "X", 10));

        assert_eq!(f.store.cart().len(), 1);
        assert!(f.store.is_favorite(&ProductId::from(1)));
        assert!(storage.get(CART_KEY).unwrap().is_none());
        assert_eq!(f.notifier.received().len(), 2);
    }

    #[test]
    fn test_cart_drawer_flag_is_not_persisted() {
        let storage = Arc::new(MemoryStore::new());
        let mut f = fixture_with(storage.clone());

        f.store.set_cart_open(true);
        assert!(f.store.is_cart_open());
        assert!(storage.is_empty());

        let reopened = fixture_with(storage);
        assert!(!reopened.store.is_cart_open());
    }
}
