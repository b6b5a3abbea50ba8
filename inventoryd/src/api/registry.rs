use std::collections::HashMap;
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use crate::registry::Registry;
use super::error::ApiError;

struct RegistryState<R: ?Sized> {
    collection: &'static str,
    registry: Arc<R>,
}

impl<R: ?Sized> Clone for RegistryState<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection,
            registry: self.registry.clone(),
        }
    }
}

/// CRUD routes for one registry, relative to its mount prefix:
/// `POST /<collection>/` and `GET|PUT|DELETE /<collection>/:id`.
pub fn routes<R>(collection: &'static str, registry: Arc<R>) -> Router
where
    R: Registry + ?Sized + 'static,
    R::Record: Serialize + DeserializeOwned,
    ApiError: From<R::Error>,
{
    Router::new()
        .route(&format!("/{}/", collection), post(create::<R>))
        .route(
            &format!("/{}/:id", collection),
            get(read::<R>).put(update::<R>).delete(delete::<R>),
        )
        .with_state(RegistryState { collection, registry })
}

/// Bodies are JSON whatever the request's Content-Type says
fn decode<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(&body?)?)
}

async fn create<R>(
    State(state): State<RegistryState<R>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError>
where
    R: Registry + ?Sized + 'static,
    R::Record: Serialize + DeserializeOwned,
    ApiError: From<R::Error>,
{
    let record = decode(body)?;
    state.registry.create(record).await?;
    Ok(Json(json!({})))
}

/// Answers `{"<collection>": record}`
async fn read<R>(
    State(state): State<RegistryState<R>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<HashMap<&'static str, R::Record>>, ApiError>
where
    R: Registry + ?Sized + 'static,
    R::Record: Serialize + DeserializeOwned,
    ApiError: From<R::Error>,
{
    let Path(id) = id?;
    let record = state.registry.read(&id).await?;
    Ok(Json(HashMap::from([(state.collection, record)])))
}

async fn update<R>(
    State(state): State<RegistryState<R>>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError>
where
    R: Registry + ?Sized + 'static,
    R::Record: Serialize + DeserializeOwned,
    ApiError: From<R::Error>,
{
    let Path(id) = id?;
    let record = decode(body)?;
    state.registry.update(&id, record).await?;
    Ok(Json(json!({})))
}

async fn delete<R>(
    State(state): State<RegistryState<R>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
    R: Registry + ?Sized + 'static,
    R::Record: Serialize + DeserializeOwned,
    ApiError: From<R::Error>,
{
    let Path(id) = id?;
    state.registry.delete(&id).await?;
    Ok(Json(json!({})))
}
