use actix_middleware::AuthSession;
use actix_web::{web, HttpResponse};
use error_types::ServiceError;

use crate::models::{MessageResponse, QuestionCreated, QuestionParams};
use crate::state::AppState;

/// Query string first, JSON body otherwise; a missing or unreadable body
/// counts as no parameters
fn params(
    query: web::Query<QuestionParams>,
    body: Option<web::Json<QuestionParams>>,
) -> QuestionParams {
    QuestionParams::from_parts(query.into_inner(), body.map(web::Json::into_inner))
}

/// GET /question lists the caller's questions, `questionId` selects one
pub async fn get_questions(
    state: web::Data<AppState>,
    session: AuthSession,
    query: web::Query<QuestionParams>,
    body: Option<web::Json<QuestionParams>>,
) -> Result<HttpResponse, ServiceError> {
    let params = params(query, body);
    match params.question_id.as_deref().filter(|id| !id.is_empty()) {
        Some(question_id) => {
            let question = state
                .questions
                .get(session.subject_id(), question_id)
                .await?;
            Ok(HttpResponse::Ok().json(question))
        }
        None => {
            let questions = state.questions.list(session.subject_id()).await?;
            Ok(HttpResponse::Ok().json(questions))
        }
    }
}

/// POST /question
pub async fn create_question(
    state: web::Data<AppState>,
    session: AuthSession,
    query: web::Query<QuestionParams>,
    body: Option<web::Json<QuestionParams>>,
) -> Result<HttpResponse, ServiceError> {
    let params = params(query, body);
    let question_id = state
        .questions
        .create(session.subject_id(), &params.content)
        .await?;

    Ok(HttpResponse::Ok().json(QuestionCreated {
        message: "success".to_string(),
        question_id,
    }))
}

/// PUT /question
pub async fn update_question(
    state: web::Data<AppState>,
    session: AuthSession,
    query: web::Query<QuestionParams>,
    body: Option<web::Json<QuestionParams>>,
) -> Result<HttpResponse, ServiceError> {
    let params = params(query, body);
    state
        .questions
        .update(session.subject_id(), &params.question_id, &params.content)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}

/// DELETE /question
pub async fn delete_question(
    state: web::Data<AppState>,
    session: AuthSession,
    query: web::Query<QuestionParams>,
    body: Option<web::Json<QuestionParams>>,
) -> Result<HttpResponse, ServiceError> {
    let params = params(query, body);
    state
        .questions
        .delete(session.subject_id(), &params.question_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success()))
}
