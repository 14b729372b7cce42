use axum::{
    Json, debug_handler,
    extract::{Query, State},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::comment::{Comment, status},
    schema::comments,
};

use super::{CommentTree, thread_comments};

#[derive(Deserialize)]
pub struct Queries {
    articulo_id: i32,
}

#[derive(Serialize)]
pub struct CommentsResponse {
    success: bool,
    comments: Vec<CommentTree>,
}

#[debug_handler]
pub async fn get_comments(
    State(ctx): State<App>,
    Query(q): Query<Queries>,
) -> Result<Json<CommentsResponse>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let rows: Vec<Comment> = comments::table
        .filter(comments::article_id.eq(q.articulo_id))
        .filter(comments::status.eq(status::APPROVED))
        .select(Comment::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(CommentsResponse {
        success: true,
        comments: thread_comments(rows),
    }))
}
