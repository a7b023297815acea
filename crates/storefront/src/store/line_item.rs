//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zapkart_core::{ProductId, ProductSnapshot, line_total};

/// One distinct product in the cart.
///
/// Serialized as the snapshot's fields plus `quantity`, the same flat shape
/// the browser storefront keeps in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: ProductSnapshot,
    quantity: u64,
}

impl CartLineItem {
    /// A new line with quantity 1.
    #[must_use]
    pub const fn new(product: ProductSnapshot) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Always at least 1 for lines held by the store.
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Unit price times quantity, in USD. Saturates instead of overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.product.price, self.quantity)
    }

    pub(crate) const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Set the quantity. Callers guarantee `quantity >= 1`.
    pub(crate) const fn set_quantity(&mut self, quantity: u64) {
        self.quantity = quantity;
    }
}
