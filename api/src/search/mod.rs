pub mod ranking;

use axum::{
    Json, Router, debug_handler,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::{
        article::{Article, status},
        embedding::ArticleEmbedding,
    },
    openai,
    schema::{article_embeddings, articles, search_cache},
};

/// Results under this similarity never show up.
const SIMILARITY_THRESHOLD: f32 = 0.75;
const CACHE_TTL_HOURS: i64 = 1;
const MAX_RESULTS: usize = 50;

pub fn route() -> Router<App> {
    Router::<App>::new().route("/buscar", get(search_articles))
}

#[derive(Deserialize)]
pub struct Queries {
    q: String,
    limite: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchHit {
    pub article_id: i32,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub similarity: f32,
}

#[derive(Serialize)]
pub struct SearchResponse {
    success: bool,
    cached: bool,
    resultados: Vec<SearchHit>,
}

#[debug_handler]
pub async fn search_articles(
    State(ctx): State<App>,
    Query(q): Query<Queries>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = q.q.trim().to_lowercase();
    if query.is_empty() {
        return Err(("No query provided", StatusCode::BAD_REQUEST))?;
    }

    let limit = q.limite.unwrap_or(10).min(MAX_RESULTS);
    let now = Utc::now().naive_utc();

    let mut conn = ctx.diesel.get().await?;

    let cached: Option<serde_json::Value> = search_cache::table
        .filter(search_cache::query.eq(&query))
        .filter(search_cache::expires_at.gt(now))
        .order(search_cache::created_at.desc())
        .select(search_cache::results)
        .first(&mut conn)
        .await
        .optional()?;

    if let Some(results) = cached {
        let mut hits: Vec<SearchHit> = serde_json::from_value(results).unwrap_or_default();
        hits.truncate(limit);
        return Ok(Json(SearchResponse {
            success: true,
            cached: true,
            resultados: hits,
        }));
    }

    // Release the connection while the embedding call is in flight
    drop(conn);
    let query_vector = openai::embed(&ctx, &query).await?;
    let mut conn = ctx.diesel.get().await?;

    let rows: Vec<(ArticleEmbedding, Article)> = article_embeddings::table
        .inner_join(articles::table)
        .filter(articles::status.eq(status::PUBLISHED))
        .select((ArticleEmbedding::as_select(), Article::as_select()))
        .load(&mut conn)
        .await?;

    // Rows whose stored vector doesn't decode are skipped, not fatal
    let mut metas = Vec::with_capacity(rows.len());
    let mut vectors = Vec::with_capacity(rows.len());
    for (embedding, article) in &rows {
        if let Some(vector) = embedding.vector() {
            metas.push(article);
            vectors.push(vector);
        } else {
            tracing::warn!(article_id = article.id, "Undecodable embedding row");
        }
    }

    let hits: Vec<SearchHit> = ranking::rank(&query_vector, &vectors, SIMILARITY_THRESHOLD, MAX_RESULTS)
        .into_iter()
        .map(|r| {
            let article = metas[r.index];
            SearchHit {
                article_id: article.id,
                slug: article.slug.clone(),
                title: article.title.clone(),
                category: article.category.clone(),
                similarity: r.similarity,
            }
        })
        .collect();

    // Opportunistic cache maintenance; neither failure affects the response
    let _ = diesel::delete(search_cache::table.filter(search_cache::expires_at.le(now)))
        .execute(&mut conn)
        .await;
    let _ = diesel::insert_into(search_cache::table)
        .values((
            search_cache::query.eq(&query),
            search_cache::results.eq(serde_json::to_value(&hits).unwrap_or_default()),
            search_cache::expires_at.eq(now + Duration::hours(CACHE_TTL_HOURS)),
        ))
        .execute(&mut conn)
        .await;

    let mut hits = hits;
    hits.truncate(limit);

    Ok(Json(SearchResponse {
        success: true,
        cached: false,
        resultados: hits,
    }))
}
