use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        version = "1.0.0",
        description = "CRUD API over the user directory.\n\nErrors are returned as `{\"message\": string}` with status 400 (validation), 404 (unknown id), 409 (email in use) or 503 (database unavailable)."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::users::get_users,
        crate::api::users::add_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::users::MessageResponse,
            crate::models::User,
            crate::models::UserPayload,
            crate::utils::ErrorBody,
        )
    ),
    tags(
        (name = "Users", description = "Create, list, update and delete user records."),
        (name = "Health", description = "Service and database health."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/users/getUsers",
            "/api/users/addUsers",
            "/api/users/updateUser/{id}",
            "/api/users/deleteUser/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
