use actix_web::{web, HttpResponse};
use error_types::ServiceError;

use crate::models::RegisterRequest;
use crate::state::AppState;

/// POST /user/auth
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = state.accounts.register(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
