use std::sync::Arc;
use async_trait::async_trait;
use shared::types::ServiceRecord;
use crate::error::ServiceError;
use super::{HostRegistry, Registry};

/// Rejects service writes whose `host_id` does not resolve in the host registry.
///
/// The lookup finishes before the wrapped registry is called, so a rejected
/// write never touches it. Reads and deletes pass straight through, and a
/// host deleted later is not chased down: its services keep the dangling id.
pub struct HostChecked<S> {
    hosts: Arc<HostRegistry>,
    next: S,
}

impl<S> HostChecked<S> {
    pub fn new(hosts: Arc<HostRegistry>, next: S) -> Self {
        Self { hosts, next }
    }

    async fn ensure_host(&self, host_id: &str) -> Result<(), ServiceError> {
        self.hosts
            .read(host_id)
            .await
            .map(|_| ())
            .map_err(|_| ServiceError::HostNotFound)
    }
}

#[async_trait]
impl<S> Registry for HostChecked<S>
where
    S: Registry<Record = ServiceRecord, Error = ServiceError>,
{
    type Record = ServiceRecord;
    type Error = ServiceError;

    async fn create(&self, record: ServiceRecord) -> Result<(), ServiceError> {
        self.ensure_host(&record.host_id).await?;
        self.next.create(record).await
    }

    async fn read(&self, id: &str) -> Result<ServiceRecord, ServiceError> {
        self.next.read(id).await
    }

    async fn update(&self, id: &str, record: ServiceRecord) -> Result<(), ServiceError> {
        self.ensure_host(&record.host_id).await?;
        self.next.update(id, record).await
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.next.delete(id).await
    }
}
