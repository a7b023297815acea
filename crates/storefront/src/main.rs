//! ZapKart Storefront - headless session bootstrap.
//!
//! Loads configuration, restores the shopper's cart and favorites from
//! local storage, loads the product catalog and logs a summary.
//!
//! # Architecture
//!
//! - Product catalog from a JSON product API, sample data when offline
//! - Cart and favorites persisted to a local storage directory
//! - Toast notifications driven by tokio timers

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zapkart_core::{format_inr, usd_to_inr};
use zapkart_storefront::config::StorefrontConfig;
use zapkart_storefront::error::AppError;
use zapkart_storefront::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zapkart_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = match config.map_err(AppError::from).and_then(AppState::from_config) {
        Ok(state) => state,
        Err(e) => {
            e.capture();
            // Flush before exit skips destructors
            drop(sentry_guard);
            std::process::exit(1);
        }
    };
    tracing::info!(
        storage_dir = %state.config().storage_dir.display(),
        catalog_url = state.catalog().products_url(),
        "Storefront state initialized"
    );

    let catalog = state.catalog().load().await;
    if let Some(notice) = catalog.notice() {
        tracing::warn!("{notice}");
    }
    tracing::info!(
        products = catalog.products.len(),
        categories = catalog.categories().len(),
        brands = catalog.brands().len(),
        "Catalog loaded"
    );

    let store = state.open_store();
    let totals = store.totals();
    tracing::info!(
        lines = store.cart().len(),
        items = store.item_count(),
        favorites = store.favorites().len(),
        subtotal = %format_inr(usd_to_inr(totals.subtotal)),
        total = %format_inr(usd_to_inr(totals.total)),
        "Session restored"
    );

    drop(sentry_guard);
}
