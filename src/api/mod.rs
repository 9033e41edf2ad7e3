pub mod health;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::utils::AppError;

/// Registers the health check and the `/api/users` routes.
///
/// The caller provides the store as `web::Data<dyn UserStore>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("Invalid request body: {}", err)).into());

    cfg.app_data(json_config)
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/users")
                .route("/getUsers", web::get().to(users::get_users))
                .route("/addUsers", web::post().to(users::add_user))
                .route("/updateUser/{id}", web::put().to(users::update_user))
                .route("/deleteUser/{id}", web::delete().to(users::delete_user)),
        );
}
