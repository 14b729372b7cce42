use axum::{Json, Router, debug_handler, extract::State, http::StatusCode, routing::post};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::quiz::NewQuizResult,
    schema::quiz_results,
    subscribers::validate_email,
};

pub fn route() -> Router<App> {
    Router::<App>::new().route("/quiz", post(submit_quiz))
}

#[derive(Deserialize)]
pub struct QuizSubmission {
    email: Option<String>,
    respuestas: serde_json::Value,
    puntuacion: i32,
}

#[derive(Serialize)]
pub struct QuizResponse {
    success: bool,
    id: i32,
}

#[debug_handler]
pub async fn submit_quiz(
    State(ctx): State<App>,
    crate::json::Json(submission): crate::json::Json<QuizSubmission>,
) -> Result<Json<QuizResponse>, AppError> {
    if !submission.respuestas.is_object() && !submission.respuestas.is_array() {
        return Err(("Answers must be an object or an array", StatusCode::BAD_REQUEST))?;
    }

    if !(0..=100).contains(&submission.puntuacion) {
        return Err(("Score out of range", StatusCode::BAD_REQUEST))?;
    }

    let email = match submission.email.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(e) => Some(validate_email(e).map_err(|e| (e, StatusCode::BAD_REQUEST))?),
        None => None,
    };

    let mut conn = ctx.diesel.get().await?;

    let id: i32 = diesel::insert_into(quiz_results::table)
        .values(NewQuizResult {
            email,
            answers: submission.respuestas,
            score: submission.puntuacion,
        })
        .returning(quiz_results::id)
        .get_result(&mut conn)
        .await?;

    Ok(Json(QuizResponse { success: true, id }))
}
