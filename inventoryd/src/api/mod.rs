//! HTTP boundary: one ingress router mounting a CRUD router per registry.

use axum::{
    http::{header, Method},
    Router,
};
use shared::protocol::{HOST_COLLECTION, HOST_PREFIX, SERVICE_COLLECTION, SERVICE_PREFIX};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::registry::Inventory;

pub mod error;
pub mod registry;

pub use error::ApiError;

/// Process-wide ingress: prefix-based dispatch plus CORS and request tracing
#[derive(Default)]
pub struct Ingress {
    router: Router,
}

impl Ingress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `routes` under `prefix`
    pub fn mount(mut self, prefix: &str, routes: Router) -> Self {
        self.router = self.router.nest(prefix, routes);
        self
    }

    pub fn build(self) -> Router {
        self.router
            .layer(cors())
            .layer(TraceLayer::new_for_http())
    }
}

/// Any origin; every OPTIONS request is answered here with an empty 200
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
}

/// The daemon's full router: hosts under `/host/v1`, services under `/service/v1`
pub fn router(inventory: &Inventory) -> Router {
    Ingress::new()
        .mount(HOST_PREFIX, registry::routes(HOST_COLLECTION, inventory.hosts.clone()))
        .mount(
            SERVICE_PREFIX,
            registry::routes(SERVICE_COLLECTION, inventory.services.clone()),
        )
        .build()
}
