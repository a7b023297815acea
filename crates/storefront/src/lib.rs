//! ZapKart storefront library.
//!
//! Cart and favorites store, toast notifications, local storage and the
//! product catalog client. The binary wires these together; everything is
//! exposed here so it can be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notifications;
pub mod state;
pub mod storage;
pub mod store;
