//! Core types for ZapKart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::ProductId;
pub use price::{
    CartTotals, TAX_RATE, USD_TO_INR_RATE, format_inr, line_total, original_price, usd_to_inr,
};
pub use product::{DEFAULT_PRODUCT_NAME, Product, ProductSnapshot, placeholder_image};
pub use status::{NotificationKind, ParseNotificationKindError};
