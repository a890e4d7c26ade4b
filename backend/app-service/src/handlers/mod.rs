use actix_middleware::{RequestGate, SessionResolver};
use actix_web::web;
use error_types::ServiceError;
use std::sync::Arc;

pub mod auth;
pub mod question;
pub mod user;

/// Fallback for any method a resource does not serve
pub async fn method_not_allowed() -> Result<web::Json<()>, ServiceError> {
    Err(ServiceError::MethodNotSupported)
}

fn bad_request(err: impl std::fmt::Display) -> actix_web::Error {
    ServiceError::BadRequest(err.to_string()).into()
}

/// Registers all API routes
///
/// `/user/auth` must be registered ahead of the gated `/user` scope, which
/// would otherwise claim it by prefix. Extractor failures render the same
/// `{message}` body as every other error.
pub fn configure(cfg: &mut web::ServiceConfig, resolver: Arc<SessionResolver>) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| bad_request(err)));

    cfg.service(
        web::resource("/user/auth")
            .route(web::post().to(auth::register))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::scope("/user")
            .wrap(RequestGate::new(resolver.clone()))
            .service(
                web::resource("")
                    .route(web::get().to(user::get_profile))
                    .route(web::put().to(user::update_profile))
                    .route(web::delete().to(user::deactivate))
                    .default_service(web::to(method_not_allowed)),
            ),
    )
    .service(
        web::scope("/question")
            .wrap(RequestGate::new(resolver))
            .service(
                web::resource("")
                    .route(web::get().to(question::get_questions))
                    .route(web::post().to(question::create_question))
                    .route(web::put().to(question::update_question))
                    .route(web::delete().to(question::delete_question))
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
