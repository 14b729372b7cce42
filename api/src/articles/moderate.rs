use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::article::{Article, status, valid_transition},
    schema::articles,
    subscribers,
};

#[derive(Deserialize)]
pub struct StatusChange {
    estado: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    success: bool,
    estado: String,
}

#[debug_handler]
pub async fn set_status(
    State(ctx): State<App>,
    Path(slug): Path<String>,
    crate::json::Json(payload): crate::json::Json<StatusChange>,
) -> Result<Json<StatusResponse>, AppError> {
    if !status::ALL.contains(&payload.estado.as_str()) {
        return Err(("unknown status", StatusCode::BAD_REQUEST))?;
    }

    let mut conn = ctx.diesel.get().await?;

    let article: Article = articles::table
        .filter(articles::slug.eq(&slug))
        .select(Article::as_select())
        .first(&mut conn)
        .await?;

    if !valid_transition(&article.status, &payload.estado) {
        return Err((
            format!(
                "invalid status transition: {} -> {}",
                article.status, payload.estado
            ),
            StatusCode::BAD_REQUEST,
        ))?;
    }

    let now = chrono::Utc::now().naive_utc();
    let published_at = match payload.estado.as_str() {
        status::PUBLISHED => Some(now),
        _ => article.published_at,
    };

    let updated: Article = diesel::update(articles::table)
        .filter(articles::id.eq(article.id))
        .set((
            articles::status.eq(&payload.estado),
            articles::published_at.eq(published_at),
            articles::updated_at.eq(now),
        ))
        .returning(Article::as_returning())
        .get_result(&mut conn)
        .await?;

    // Notify in the background, the moderation action doesn't wait on mail
    if payload.estado == status::PUBLISHED {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            subscribers::notify_article_published(&ctx, &updated).await;
        });
    }

    Ok(Json(StatusResponse {
        success: true,
        estado: payload.estado,
    }))
}

#[debug_handler]
pub async fn delete_article(
    State(ctx): State<App>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    // Translations, embeddings and comments go with it (FK cascade)
    let deleted = diesel::delete(articles::table.filter(articles::slug.eq(&slug)))
        .execute(&mut conn)
        .await?;

    if deleted == 0 {
        return Err(("not found", StatusCode::NOT_FOUND))?;
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
