use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{App, error::AppError, models::comment::status, schema::comments};

#[derive(Deserialize)]
pub struct ModerationAction {
    accion: String,
}

#[derive(Serialize)]
pub struct ModerationResponse {
    success: bool,
    status: String,
}

#[debug_handler]
pub async fn moderate_comment(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    crate::json::Json(payload): crate::json::Json<ModerationAction>,
) -> Result<Json<ModerationResponse>, AppError> {
    let new_status = match payload.accion.as_str() {
        "aprobar" => status::APPROVED,
        "rechazar" => status::REJECTED,
        _ => return Err(("unknown moderation action", StatusCode::BAD_REQUEST))?,
    };

    let mut conn = ctx.diesel.get().await?;

    // Only pending comments transition; moderating twice is a no-op error
    let updated = diesel::update(comments::table)
        .filter(comments::id.eq(id))
        .filter(comments::status.eq(status::PENDING))
        .set(comments::status.eq(new_status))
        .execute(&mut conn)
        .await?;

    if updated == 0 {
        let exists: Option<i32> = comments::table
            .filter(comments::id.eq(id))
            .select(comments::id)
            .first(&mut conn)
            .await
            .optional()?;

        return match exists {
            Some(_) => Err(("comment is not pending moderation", StatusCode::BAD_REQUEST).into()),
            None => Err(("not found", StatusCode::NOT_FOUND).into()),
        };
    }

    Ok(Json(ModerationResponse {
        success: true,
        status: new_status.into(),
    }))
}
