use std::time::Duration;

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
    models::comment::status,
    real_ip::ClientIp,
    schema::comments,
};

const LIKE_GUARD_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Serialize)]
pub struct LikeResponse {
    success: bool,
    likes: i64,
}

#[debug_handler]
pub async fn like_comment(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    ClientIp(ip): ClientIp,
) -> Result<Json<LikeResponse>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let guard_key = format!("like:{id}:{ip}");
    let cache = &ctx.counters_ttl_cache;

    let likes = if cache.get(&guard_key).await.is_none() {
        cache.insert(guard_key, true, LIKE_GUARD_TTL).await;

        diesel::update(comments::table)
            .filter(comments::id.eq(id))
            .filter(comments::status.eq(status::APPROVED))
            .set(comments::likes.eq(comments::likes + 1))
            .returning(comments::likes)
            .get_result(&mut conn)
            .await?
    } else {
        comments::table
            .filter(comments::id.eq(id))
            .filter(comments::status.eq(status::APPROVED))
            .select(comments::likes)
            .first(&mut conn)
            .await?
    };

    Ok(Json(LikeResponse {
        success: true,
        likes,
    }))
}
