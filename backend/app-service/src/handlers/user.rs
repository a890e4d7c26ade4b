use actix_middleware::AuthSession;
use actix_web::{web, HttpResponse};
use error_types::ServiceError;

use crate::models::{MessageResponse, ProfileUpdate};
use crate::state::AppState;

/// GET /user
pub async fn get_profile(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<HttpResponse, ServiceError> {
    let profile = state.accounts.profile(session.subject_id()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /user
pub async fn update_profile(
    state: web::Data<AppState>,
    session: AuthSession,
    req: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ServiceError> {
    state
        .accounts
        .update_profile(session.subject_id(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}

/// DELETE /user
pub async fn deactivate(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<HttpResponse, ServiceError> {
    state.accounts.deactivate(session.subject_id()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}
