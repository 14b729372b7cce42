use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;

use crate::{
    App,
    error::AppError,
    models::article::status,
    schema::articles,
};

#[derive(Serialize)]
pub struct CounterResponse {
    success: bool,
    count: i64,
}

#[debug_handler]
pub async fn react_article(
    State(ctx): State<App>,
    Path(slug): Path<String>,
) -> Result<Json<CounterResponse>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let count = diesel::update(articles::table)
        .filter(articles::slug.eq(&slug))
        .filter(articles::status.eq(status::PUBLISHED))
        .set(articles::reactions.eq(articles::reactions + 1))
        .returning(articles::reactions)
        .get_result(&mut conn)
        .await?;

    Ok(Json(CounterResponse {
        success: true,
        count,
    }))
}

#[debug_handler]
pub async fn share_article(
    State(ctx): State<App>,
    Path(slug): Path<String>,
) -> Result<Json<CounterResponse>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let count = diesel::update(articles::table)
        .filter(articles::slug.eq(&slug))
        .filter(articles::status.eq(status::PUBLISHED))
        .set(articles::shares.eq(articles::shares + 1))
        .returning(articles::shares)
        .get_result(&mut conn)
        .await?;

    Ok(Json(CounterResponse {
        success: true,
        count,
    }))
}
