use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::error::RecordError;
use super::{Registry, RegistryRecord};

/// In-memory registry keyed by record id.
///
/// One reader/writer lock guards the whole map: reads share it, writes
/// exclude every other access. The lock is never held across another
/// registry's call.
pub struct MemoryRegistry<R> {
    records: RwLock<HashMap<String, R>>,
}

impl<R: RegistryRecord> MemoryRegistry<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<R: RegistryRecord> Default for MemoryRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: RegistryRecord> Registry for MemoryRegistry<R> {
    type Record = R;
    type Error = R::Error;

    async fn create(&self, mut record: R) -> Result<(), R::Error> {
        let mut records = self.records.write().await;
        if records.contains_key(record.id()) {
            return Err(R::Error::already_exists());
        }

        let now = Utc::now();
        record.stamp(now, now);
        records.insert(record.id().to_string(), record);
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<R, R::Error> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(R::Error::not_found)
    }

    async fn update(&self, id: &str, mut record: R) -> Result<(), R::Error> {
        if id != record.id() {
            return Err(R::Error::inconsistent_ids());
        }

        let mut records = self.records.write().await;
        // First update of an absent id keeps whatever creation time the payload carried
        let created_at = records
            .get(id)
            .map(RegistryRecord::created_at)
            .unwrap_or_else(|| record.created_at());
        record.stamp(created_at, Utc::now());
        records.insert(id.to_string(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), R::Error> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(R::Error::not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use chrono::DateTime;
    use shared::types::{HostRecord, ServiceRecord};
    use tokio::time::timeout;
    use crate::error::{HostError, ServiceError};

    fn test_host(id: &str) -> HostRecord {
        HostRecord {
            id: id.to_string(),
            name: "n1".to_string(),
            ip: "10.0.0.1".to_string(),
            port: "22".to_string(),
            rack: "r1".to_string(),
            data_center: "dc1".to_string(),
            remark: "test".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let store = MemoryRegistry::<HostRecord>::new();
        let host = test_host("h1");

        store.create(host.clone()).await.unwrap();

        let stored = store.read("h1").await.unwrap();
        assert_ne!(stored.created_at, DateTime::<Utc>::default());
        assert_eq!(stored.created_at, stored.updated_at);

        let expected = HostRecord {
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            ..host
        };
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_create_duplicate_keeps_original() {
        let store = MemoryRegistry::<HostRecord>::new();
        store.create(test_host("h1")).await.unwrap();
        let original = store.read("h1").await.unwrap();

        let mut duplicate = test_host("h1");
        duplicate.name = "other".to_string();
        assert_eq!(store.create(duplicate).await, Err(HostError::AlreadyExists));

        assert_eq!(store.read("h1").await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_read_missing() {
        let store = MemoryRegistry::<HostRecord>::new();
        assert_eq!(store.read("nope").await, Err(HostError::NotFound));
    }

    #[tokio::test]
    async fn test_update_with_mismatched_ids() {
        let store = MemoryRegistry::<HostRecord>::new();
        store.create(test_host("h1")).await.unwrap();
        let original = store.read("h1").await.unwrap();

        let mut changed = test_host("h2");
        changed.name = "changed".to_string();
        assert_eq!(
            store.update("h1", changed).await,
            Err(HostError::InconsistentIds)
        );

        assert_eq!(store.read("h1").await.unwrap(), original);
        assert_eq!(store.read("h2").await, Err(HostError::NotFound));
    }

    #[tokio::test]
    async fn test_update_preserves_creation_time() {
        let store = MemoryRegistry::<HostRecord>::new();
        store.create(test_host("h1")).await.unwrap();
        let before = store.read("h1").await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let mut changed = test_host("h1");
        changed.ip = "10.0.0.2".to_string();
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        store.update("h1", changed).await.unwrap();

        let after = store.read("h1").await.unwrap();
        assert_eq!(after.ip, "10.0.0.2");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_id_inserts() {
        // Update is an upsert: an absent id is stored, not rejected
        let store = MemoryRegistry::<HostRecord>::new();
        let mut host = test_host("h1");
        let created_at = Utc::now() - chrono::Duration::hours(1);
        host.created_at = created_at;

        store.update("h1", host).await.unwrap();

        let stored = store.read("h1").await.unwrap();
        assert_eq!(stored.created_at, created_at);
        assert!(stored.updated_at > created_at);
    }

    #[tokio::test]
    async fn test_delete_then_read() {
        let store = MemoryRegistry::<HostRecord>::new();
        store.create(test_host("h1")).await.unwrap();

        store.delete("h1").await.unwrap();

        assert_eq!(store.read("h1").await, Err(HostError::NotFound));
        assert_eq!(store.delete("h1").await, Err(HostError::NotFound));
    }

    #[tokio::test]
    async fn test_service_store_uses_service_errors() {
        let store = MemoryRegistry::<ServiceRecord>::new();
        let service = ServiceRecord {
            id: "s1".to_string(),
            host_id: "h1".to_string(),
            ..Default::default()
        };

        store.create(service.clone()).await.unwrap();
        assert_eq!(store.create(service).await, Err(ServiceError::AlreadyExists));
        assert_eq!(store.read("s2").await, Err(ServiceError::NotFound));
    }

    #[tokio::test]
    async fn test_readers_share_lock_and_writer_waits() {
        let store = MemoryRegistry::<HostRecord>::new();
        store.create(test_host("h1")).await.unwrap();

        let guard = store.records.read().await;

        let read = timeout(Duration::from_millis(50), store.read("h1")).await;
        assert!(read.is_ok(), "Read should not block behind another reader");

        let write = timeout(Duration::from_millis(50), store.delete("h1")).await;
        assert!(write.is_err(), "Write should wait while a reader holds the lock");

        drop(guard);
        store.delete("h1").await.unwrap();
    }

    #[tokio::test]
    async fn test_writer_excludes_readers() {
        let store = Arc::new(MemoryRegistry::<HostRecord>::new());
        store.create(test_host("h1")).await.unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));

        let guard = store.records.write().await;

        let reader = {
            let store = store.clone();
            let events = events.clone();
            tokio::spawn(async move {
                let result = store.read("h1").await;
                events.lock().unwrap().push("read");
                result
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        events.lock().unwrap().push("write released");
        drop(guard);

        let result = reader.await.unwrap();
        assert!(result.is_ok());
        assert_eq!(*events.lock().unwrap(), vec!["write released", "read"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_are_exclusive() {
        let store = Arc::new(MemoryRegistry::<HostRecord>::new());

        let attempts = (0..16).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.create(test_host("h1")).await })
        });
        let results = futures::future::join_all(attempts).await;

        let created = results
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(created, 1, "Exactly one concurrent create should win");
    }
}
