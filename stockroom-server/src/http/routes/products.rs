//! Product endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::{Product, ProductDetail};
use crate::http::error::ApiError;
use crate::http::extractors::{IdPath, JsonBody};
use crate::http::server::AppState;
use crate::models::{NewProduct, ProductChanges};

/// POST /products - add a product to an existing store
async fn create_product(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let input = NewProduct::from_json(&body)?;

    if !state.storage.store_exists(input.store_id).await? {
        return Err(ApiError::not_found("store", input.store_id));
    }

    let product = state.storage.create_product(input).await?;

    tracing::info!(product_id = %product.id, store_id = %product.store_id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products - newest first, with store and owner
async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductDetail>>, ApiError> {
    let products = state
        .storage
        .list_products()
        .await
        .map_err(ApiError::listing)?;
    Ok(Json(products))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<ProductDetail>, ApiError> {
    Ok(Json(state.storage.get_product(id).await?))
}

/// PUT /products/{id} - change name and/or price
async fn update_product(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody,
) -> Result<Json<Product>, ApiError> {
    let changes = ProductChanges::from_json(&body)?;
    Ok(Json(state.storage.update_product(id, changes).await?))
}

/// DELETE /products/{id}
async fn delete_product(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.storage.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
