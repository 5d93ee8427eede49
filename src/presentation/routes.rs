use crate::presentation::error::json_config;
use crate::presentation::handlers::{delete_user, health_check, login, register, update_user};
use crate::presentation::middleware::JwtAuthMiddleware;
use actix_web::web;
use std::sync::Arc;

/// Registers the user endpoints. Only `/users` itself (update and delete)
/// sits behind bearer authentication.
pub fn configure(jwt_secret: Arc<str>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(json_config())
            .route("/health", web::get().to(health_check))
            .route("/users/register", web::post().to(register))
            .route("/users/login", web::post().to(login))
            .service(
                web::resource("/users")
                    .wrap(JwtAuthMiddleware::new(jwt_secret))
                    .route(web::put().to(update_user))
                    .route(web::delete().to(delete_user)),
            );
    }
}
