//! User endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::db::{User, UserDetail, UserWithStore};
use crate::http::error::ApiError;
use crate::http::extractors::{IdPath, JsonBody};
use crate::http::server::AppState;
use crate::models::{NewUser, UserChanges};

/// POST /users - register a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let input = NewUser::from_json(&body)?;
    let user = state.storage.create_user(input).await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users - all users with their store
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserWithStore>>, ApiError> {
    let users = state
        .storage
        .list_users()
        .await
        .map_err(ApiError::listing)?;
    Ok(Json(users))
}

/// GET /users/{id} - user with store and products
async fn get_user(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<Json<UserDetail>, ApiError> {
    Ok(Json(state.storage.get_user(id).await?))
}

/// PUT /users/{id} - change email and/or name
async fn update_user(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody,
) -> Result<Json<User>, ApiError> {
    let changes = UserChanges::from_json(&body)?;
    let user = state.storage.update_user(id, changes).await?;
    Ok(Json(user))
}

/// DELETE /users/{id} - remove user, its store and the store's products
async fn delete_user(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.storage.delete_user(id).await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
