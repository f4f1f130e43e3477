use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use std::collections::BTreeMap;
use tracing::info;

use crate::{
    errors::{AppError, AppResult},
    metrics::{record_counter_created, record_counter_deleted, record_operation},
    store::CounterStore,
};

/// Body of every successful counter response: `{"<name>": <value>}`.
pub type CounterBody = BTreeMap<String, u64>;

/// Counter CRUD under `/counters/:name`.
/// Needs a [`CounterStore`] injected as an extension.
pub fn router() -> Router {
    Router::new().route(
        "/counters/:name",
        post(create_counter)
            .put(update_counter)
            .get(read_counter)
            .delete(delete_counter),
    )
}

/// The `:name` path segment. Undecodable names are rejected with the JSON error body.
pub struct CounterName(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CounterName
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(name))
    }
}

fn body(name: String, value: u64) -> Json<CounterBody> {
    Json(BTreeMap::from([(name, value)]))
}

async fn create_counter(
    Extension(store): Extension<CounterStore>,
    CounterName(name): CounterName,
) -> AppResult<impl IntoResponse> {
    info!("Request to create counter: {name}");
    let result = store.create(&name);
    record_operation("create", &result);
    let value = result?;
    record_counter_created();
    Ok((StatusCode::CREATED, body(name, value)))
}

async fn update_counter(
    Extension(store): Extension<CounterStore>,
    CounterName(name): CounterName,
) -> AppResult<impl IntoResponse> {
    info!("Request to update counter: {name}");
    let result = store.update(&name);
    record_operation("update", &result);
    Ok(body(name, result?))
}

async fn read_counter(
    Extension(store): Extension<CounterStore>,
    CounterName(name): CounterName,
) -> AppResult<impl IntoResponse> {
    info!("Request to read counter: {name}");
    let result = store.read(&name);
    record_operation("read", &result);
    Ok(body(name, result?))
}

async fn delete_counter(
    Extension(store): Extension<CounterStore>,
    CounterName(name): CounterName,
) -> AppResult<impl IntoResponse> {
    info!("Request to delete counter: {name}");
    let result = store.delete(&name);
    record_operation("delete", &result);
    result?;
    record_counter_deleted();
    Ok(StatusCode::NO_CONTENT)
}
