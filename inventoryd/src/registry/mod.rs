//! Registry capability and the decorators composed around it.
//!
//! Every layer (in-memory store, host check, logging) implements the same
//! [`Registry`] trait, so layers stack in any order and a different store can
//! be swapped in underneath without touching the decorators.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::types::{HostRecord, ServiceRecord};
use crate::error::{HostError, RecordError, ServiceError};

pub mod integrity;
pub mod logging;
pub mod memory;

pub use integrity::HostChecked;
pub use logging::Logged;
pub use memory::MemoryRegistry;

/// Create/read/update/delete over one record type
#[async_trait]
pub trait Registry: Send + Sync {
    type Record: RegistryRecord;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn create(&self, record: Self::Record) -> Result<(), Self::Error>;

    async fn read(&self, id: &str) -> Result<Self::Record, Self::Error>;

    /// Upserts: an absent `id` is inserted rather than rejected.
    async fn update(&self, id: &str, record: Self::Record) -> Result<(), Self::Error>;

    async fn delete(&self, id: &str) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T: Registry + ?Sized> Registry for Arc<T> {
    type Record = T::Record;
    type Error = T::Error;

    async fn create(&self, record: Self::Record) -> Result<(), Self::Error> {
        (**self).create(record).await
    }

    async fn read(&self, id: &str) -> Result<Self::Record, Self::Error> {
        (**self).read(id).await
    }

    async fn update(&self, id: &str, record: Self::Record) -> Result<(), Self::Error> {
        (**self).update(id, record).await
    }

    async fn delete(&self, id: &str) -> Result<(), Self::Error> {
        (**self).delete(id).await
    }
}

pub type HostRegistry = dyn Registry<Record = HostRecord, Error = HostError>;
pub type ServiceRegistry = dyn Registry<Record = ServiceRecord, Error = ServiceError>;

/// A record the in-memory store can key and timestamp
pub trait RegistryRecord: Clone + Send + Sync + 'static {
    type Error: RecordError;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

impl RegistryRecord for HostRecord {
    type Error = HostError;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

impl RegistryRecord for ServiceRecord {
    type Error = ServiceError;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

/// Both registries, wired the way the daemon serves them.
///
/// Logging is outermost on the service side, so the logged duration
/// includes the host lookup.
#[derive(Clone)]
pub struct Inventory {
    pub hosts: Arc<HostRegistry>,
    pub services: Arc<ServiceRegistry>,
}

impl Inventory {
    pub fn in_memory() -> Self {
        let hosts: Arc<HostRegistry> =
            Arc::new(Logged::new("host", MemoryRegistry::<HostRecord>::new()));

        let services: Arc<ServiceRegistry> = Arc::new(Logged::new(
            "service",
            HostChecked::new(hosts.clone(), MemoryRegistry::<ServiceRecord>::new()),
        ));

        Self { hosts, services }
    }
}
