//! Error kinds of each registry.
//!
//! Host and service registries keep separate enums so a host `NotFound`
//! can never be mistaken for a service `NotFound`.

use thiserror::Error;

/// Constructors the generic in-memory store needs from a registry's error type
pub trait RecordError: std::error::Error + Send + Sync + 'static {
    fn already_exists() -> Self;
    fn not_found() -> Self;
    fn inconsistent_ids() -> Self;
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[error("already exists")]
    AlreadyExists,

    #[error("not found")]
    NotFound,

    #[error("inconsistent IDs")]
    InconsistentIds,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("already exists")]
    AlreadyExists,

    #[error("not found")]
    NotFound,

    #[error("inconsistent IDs")]
    InconsistentIds,

    /// The referenced host does not resolve in the host registry
    #[error("not found host ID")]
    HostNotFound,
}

impl RecordError for HostError {
    fn already_exists() -> Self {
        Self::AlreadyExists
    }

    fn not_found() -> Self {
        Self::NotFound
    }

    fn inconsistent_ids() -> Self {
        Self::InconsistentIds
    }
}

impl RecordError for ServiceError {
    fn already_exists() -> Self {
        Self::AlreadyExists
    }

    fn not_found() -> Self {
        Self::NotFound
    }

    fn inconsistent_ids() -> Self {
        Self::InconsistentIds
    }
}
