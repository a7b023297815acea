//! Integration tests for ZapKart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zapkart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - store operations against memory and file storage
//! - `toast_timeline` - notification timing on a paused tokio clock
//! - `catalog_api` - catalog client against a local stub product API
//!
//! Everything runs offline; the stub API binds to a loopback port.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use url::Url;
use zapkart_core::Product;
use zapkart_storefront::config::CatalogConfig;

/// Parse a product from inline JSON.
///
/// # Panics
///
/// Panics if `json` is not a valid product record.
#[must_use]
pub fn product(json: &str) -> Product {
    serde_json::from_str(json).unwrap_or_else(|e| panic!("invalid product fixture: {e}"))
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: Arc<str>,
    hits: Arc<AtomicUsize>,
}

async fn products_handler(State(state): State<StubState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.to_string(),
    )
}

/// A loopback product API that answers `GET /products` with a fixed response.
pub struct StubApi {
    base_url: Url,
    hits: Arc<AtomicUsize>,
}

impl StubApi {
    /// Start serving `body` with `status` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if `status` is not a valid HTTP status or no loopback port can be bound.
    pub async fn serve(status: u16, body: impl Into<String>) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = StubState {
            status: StatusCode::from_u16(status)
                .unwrap_or_else(|e| panic!("invalid stub status {status}: {e}")),
            body: Arc::from(body.into()),
            hits: Arc::clone(&hits),
        };
        let router = Router::new()
            .route("/products", get(products_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind stub API: {e}"));
        let port = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("stub API has no address: {e}"))
            .port();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                panic!("stub API stopped: {e}");
            }
        });

        Self {
            base_url: Url::parse(&format!("http://127.0.0.1:{port}"))
                .unwrap_or_else(|e| panic!("invalid stub URL: {e}")),
            hits,
        }
    }

    /// Catalog configuration pointing at this stub.
    #[must_use]
    pub fn catalog_config(&self, limit: u32) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            limit,
        }
    }

    /// Number of `/products` requests answered so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
