use std::fmt::Display;
use std::time::Instant;
use async_trait::async_trait;
use super::{Registry, RegistryRecord};

/// Emits one tracing event per operation: registry, method, id, elapsed
/// time and the error, if any. Results pass through untouched.
pub struct Logged<S> {
    registry: &'static str,
    next: S,
}

impl<S> Logged<S> {
    pub fn new(registry: &'static str, next: S) -> Self {
        Self { registry, next }
    }

    fn log<T, E: Display>(&self, method: &str, id: &str, begin: Instant, result: &Result<T, E>) {
        let took = begin.elapsed();
        match result {
            Ok(_) => tracing::info!(registry = self.registry, method, id, ?took),
            Err(e) => tracing::info!(registry = self.registry, method, id, ?took, error = %e),
        }
    }
}

#[async_trait]
impl<S: Registry> Registry for Logged<S> {
    type Record = S::Record;
    type Error = S::Error;

    async fn create(&self, record: Self::Record) -> Result<(), Self::Error> {
        let begin = Instant::now();
        // The record moves into the call; keep the id for the event
        let id = record.id().to_string();
        let result = self.next.create(record).await;
        self.log("create", &id, begin, &result);
        result
    }

    async fn read(&self, id: &str) -> Result<Self::Record, Self::Error> {
        let begin = Instant::now();
        let result = self.next.read(id).await;
        self.log("read", id, begin, &result);
        result
    }

    async fn update(&self, id: &str, record: Self::Record) -> Result<(), Self::Error> {
        let begin = Instant::now();
        let result = self.next.update(id, record).await;
        self.log("update", id, begin, &result);
        result
    }

    async fn delete(&self, id: &str) -> Result<(), Self::Error> {
        let begin = Instant::now();
        let result = self.next.delete(id).await;
        self.log("delete", id, begin, &result);
        result
    }
}
