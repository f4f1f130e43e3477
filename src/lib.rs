mod app;
pub mod counters;
mod errors;
pub mod metrics;
pub mod store;

pub mod prelude {
    pub use super::app::App;
    pub use super::counters::{self, CounterBody};
    pub use super::errors::{AppError, AppResult};
    pub use super::metrics::*;
    pub use super::store::{CounterStore, StoreError, StoreResult};
    pub use axum::extract::{Json, Path};
    pub use axum::http::StatusCode;
    pub use axum::response::IntoResponse;
    pub use axum::routing::{delete, get, post, put};
    pub use axum::{Extension, Router};
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};
}
