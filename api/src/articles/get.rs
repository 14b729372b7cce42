use std::time::Duration;

use axum::{
    Json, debug_handler,
    extract::{Path, Query, State},
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::article::{Article, ArticleTranslation, status},
    real_ip::ClientIp,
    schema::{article_translations, articles},
};

use super::{ArticleView, ORIGINAL_LANG};

/// A view from the same IP only counts again after this window.
const VIEW_GUARD_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Deserialize)]
pub struct Queries {
    lang: Option<String>,
}

#[derive(Serialize)]
pub struct ArticleResponse {
    success: bool,
    articulo: ArticleView,
}

#[debug_handler]
pub async fn get_article(
    State(ctx): State<App>,
    Path(slug): Path<String>,
    Query(q): Query<Queries>,
    ClientIp(ip): ClientIp,
) -> Result<Json<ArticleResponse>, AppError> {
    let mut conn = ctx.diesel.get().await?;

    let mut article: Article = articles::table
        .filter(articles::slug.eq(&slug))
        .filter(articles::status.eq(status::PUBLISHED))
        .select(Article::as_select())
        .first(&mut conn)
        .await?;

    let guard_key = format!("view:{slug}:{ip}");
    let cache = &ctx.counters_ttl_cache;
    if cache.get(&guard_key).await.is_none() {
        cache.insert(guard_key, true, VIEW_GUARD_TTL).await;

        article.views = diesel::update(articles::table)
            .filter(articles::id.eq(article.id))
            .set(articles::views.eq(articles::views + 1))
            .returning(articles::views)
            .get_result(&mut conn)
            .await?;
    }

    let available_langs: Vec<String> = article_translations::table
        .filter(article_translations::article_id.eq(article.id))
        .select(article_translations::lang)
        .load(&mut conn)
        .await?;

    let translation = match q
        .lang
        .as_deref()
        .filter(|lang| !lang.is_empty() && *lang != ORIGINAL_LANG)
    {
        Some(lang) => {
            article_translations::table
                .filter(article_translations::article_id.eq(article.id))
                .filter(article_translations::lang.eq(lang))
                .select(ArticleTranslation::as_select())
                .first(&mut conn)
                .await
                .optional()?
        }
        None => None,
    };

    Ok(Json(ArticleResponse {
        success: true,
        articulo: ArticleView::from_article(article, translation, available_langs),
    }))
}
