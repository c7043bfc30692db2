//! Store endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::db::{Store, StoreDetail};
use crate::http::error::ApiError;
use crate::http::extractors::{IdPath, JsonBody};
use crate::http::server::AppState;
use crate::models::{NewStore, StoreChanges};

/// POST /stores - open a store for an existing user
async fn create_store(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    let input = NewStore::from_json(&body)?;

    // Advisory: the foreign key and the unique user_id still decide
    // concurrent creates.
    if !state.storage.user_exists(input.user_id).await? {
        return Err(ApiError::not_found("user", input.user_id));
    }

    let store = state.storage.create_store(input).await?;

    tracing::info!(store_id = %store.id, user_id = %store.user_id, "Store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// GET /stores/{id} - store with owner and products
async fn get_store(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<StoreDetail>, ApiError> {
    Ok(Json(state.storage.get_store(id).await?))
}

/// PUT /stores/{id} - rename
async fn update_store(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody,
) -> Result<Json<Store>, ApiError> {
    let changes = StoreChanges::from_json(&body)?;
    Ok(Json(state.storage.update_store(id, changes).await?))
}

/// DELETE /stores/{id} - remove store and its products
async fn delete_store(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.storage.delete_store(id).await?;

    tracing::info!(store_id = %id, "Store deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Store routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stores", post(create_store)).route(
        "/stores/{id}",
        get(get_store).put(update_store).delete(delete_store),
    )
}
