//! In-memory host and service inventory served over HTTP.
//!
//! Two registries share one process: hosts, and services that must point at
//! an existing host when they are written.

pub mod api;
pub mod config;
pub mod error;
pub mod registry;

pub use api::{router, ApiError, Ingress};
pub use config::Config;
pub use error::{HostError, ServiceError};
pub use registry::{Inventory, Registry};
