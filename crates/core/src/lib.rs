//! ZapKart Core - Shared types library.
//!
//! This crate provides common types used across all ZapKart components:
//! - `storefront` - Cart/favorites store, notifications, catalog
//! - `integration-tests` - Cross-module scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, product records and snapshots, prices, notification kinds

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
