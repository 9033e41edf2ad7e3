use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::UserStore;
use crate::models::{User, UserPayload};
use crate::utils::{AppError, ErrorBody};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/users/getUsers - Lists every user
#[utoipa::path(
    get,
    path = "/api/users/getUsers",
    tag = "Users",
    responses(
        (status = 200, description = "All user records", body = [User]),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    )
)]
pub async fn get_users(store: web::Data<dyn UserStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /getUsers");

    let users = store.list().await.map_err(|e| {
        log::error!("❌ Error listing users: {}", e);
        e
    })?;

    log::info!("✅ Listed {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/users/addUsers - Creates a user
#[utoipa::path(
    post,
    path = "/api/users/addUsers",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    )
)]
pub async fn add_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let new_user = UserPayload::try_from(body.into_inner())
        .and_then(UserPayload::validate)
        .map_err(|e| {
            log::warn!("⚠️ Rejected user: {}", e);
            e
        })?;

    log::info!("📝 POST /addUsers - {}", new_user.email);

    let user = store.insert(new_user).await.map_err(|e| {
        log::warn!("⚠️ Failed to add user: {}", e);
        e
    })?;

    log::info!("✅ User created: {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

/// PUT /api/users/updateUser/{id} - Replaces the editable fields
#[utoipa::path(
    put,
    path = "/api/users/updateUser/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    )
)]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let fields = UserPayload::try_from(body.into_inner())?.validate()?;

    log::info!("✏️ PUT /updateUser/{}", id);

    let user = store.replace(&id, fields).await.map_err(|e| {
        log::warn!("⚠️ Failed to update user {}: {}", id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/users/deleteUser/{id} - Deletes a user
#[utoipa::path(
    delete,
    path = "/api/users/deleteUser/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    )
)]
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    log::info!("🗑️ DELETE /deleteUser/{}", id);

    store.remove(&id).await.map_err(|e| {
        log::warn!("⚠️ Failed to delete user {}: {}", id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
