//! Typed HTTP client for the host and service registries served by `inventoryd`.

use std::collections::HashMap;
use reqwest::{Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{
    collection_path, ErrorBody, HOST_COLLECTION, HOST_PREFIX, SERVICE_COLLECTION, SERVICE_PREFIX,
};
use shared::types::{HostRecord, ServiceRecord};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid instance address {instance}: {reason}")]
    InvalidInstance { instance: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status and this `error` message
    #[error("{status}: {message}")]
    Status { status: u16, message: String },

    #[error("Response is missing the {0} envelope")]
    MissingEnvelope(&'static str),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base: String,
}

impl InventoryClient {
    /// `instance` is a host:port or URL; "http://" is assumed when no scheme is given.
    /// Any path on the instance is dropped.
    pub fn new(instance: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), instance)
    }

    pub fn with_client(http: reqwest::Client, instance: &str) -> Result<Self> {
        let target = if instance.starts_with("http") {
            instance.to_string()
        } else {
            format!("http://{}", instance)
        };

        let mut url = Url::parse(&target).map_err(|e| ClientError::InvalidInstance {
            instance: instance.to_string(),
            reason: e.to_string(),
        })?;
        url.set_path("");
        url.set_query(None);

        Ok(Self {
            http,
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub async fn create_host(&self, host: &HostRecord) -> Result<()> {
        self.create(HOST_PREFIX, HOST_COLLECTION, host).await
    }

    pub async fn get_host(&self, id: &str) -> Result<HostRecord> {
        self.read(HOST_PREFIX, HOST_COLLECTION, id).await
    }

    pub async fn update_host(&self, id: &str, host: &HostRecord) -> Result<()> {
        self.update(HOST_PREFIX, HOST_COLLECTION, id, host).await
    }

    pub async fn delete_host(&self, id: &str) -> Result<()> {
        self.delete(HOST_PREFIX, HOST_COLLECTION, id).await
    }

    pub async fn create_service(&self, service: &ServiceRecord) -> Result<()> {
        self.create(SERVICE_PREFIX, SERVICE_COLLECTION, service).await
    }

    pub async fn get_service(&self, id: &str) -> Result<ServiceRecord> {
        self.read(SERVICE_PREFIX, SERVICE_COLLECTION, id).await
    }

    pub async fn update_service(&self, id: &str, service: &ServiceRecord) -> Result<()> {
        self.update(SERVICE_PREFIX, SERVICE_COLLECTION, id, service).await
    }

    pub async fn delete_service(&self, id: &str) -> Result<()> {
        self.delete(SERVICE_PREFIX, SERVICE_COLLECTION, id).await
    }

    fn collection_url(&self, prefix: &str, collection: &str) -> String {
        format!("{}{}", self.base, collection_path(prefix, collection))
    }

    fn record_url(&self, prefix: &str, collection: &str, id: &str) -> String {
        format!(
            "{}{}",
            self.collection_url(prefix, collection),
            urlencoding::encode(id)
        )
    }

    async fn create<T: Serialize>(&self, prefix: &str, collection: &str, record: &T) -> Result<()> {
        let url = self.collection_url(prefix, collection);
        tracing::debug!("POST {}", url);
        let response = self.http.post(url).json(record).send().await?;
        check(response).await.map(|_| ())
    }

    async fn read<T: DeserializeOwned>(
        &self,
        prefix: &str,
        collection: &'static str,
        id: &str,
    ) -> Result<T> {
        let url = self.record_url(prefix, collection, id);
        tracing::debug!("GET {}", url);
        let response = check(self.http.get(url).send().await?).await?;

        let mut envelope: HashMap<String, T> = response.json().await?;
        envelope
            .remove(collection)
            .ok_or(ClientError::MissingEnvelope(collection))
    }

    async fn update<T: Serialize>(
        &self,
        prefix: &str,
        collection: &str,
        id: &str,
        record: &T,
    ) -> Result<()> {
        let url = self.record_url(prefix, collection, id);
        tracing::debug!("PUT {}", url);
        let response = self.http.put(url).json(record).send().await?;
        check(response).await.map(|_| ())
    }

    async fn delete(&self, prefix: &str, collection: &str, id: &str) -> Result<()> {
        let url = self.record_url(prefix, collection, id);
        tracing::debug!("DELETE {}", url);
        let response = self.http.delete(url).send().await?;
        check(response).await.map(|_| ())
    }
}

/// Turn a non-2xx response into `ClientError::Status`
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
