use std::collections::HashMap;

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
    models::article::{Article, ArticleTranslation, status},
    schema::{article_translations, articles},
};

use super::{ArticleSummary, ORIGINAL_LANG};

#[derive(Deserialize)]
pub struct Queries {
    categoria: Option<String>,
    region: Option<String>,
    lang: Option<String>,
    pagina: Option<i64>,
    por_pagina: Option<i64>,
}

#[derive(Serialize)]
pub struct ListResponse {
    success: bool,
    articles: Vec<ArticleSummary>,
    pagina: i64,
    por_pagina: i64,
}

#[debug_handler]
pub async fn list_articles(
    State(ctx): State<App>,
    Query(q): Query<Queries>,
) -> Result<Json<ListResponse>, AppError> {
    let pagina = q.pagina.unwrap_or(0).max(0);
    let por_pagina = q.por_pagina.unwrap_or(20).clamp(1, 100);

    let mut conn = ctx.diesel.get().await?;

    let mut query = articles::table
        .filter(articles::status.eq(status::PUBLISHED))
        .into_boxed();

    if let Some(categoria) = q.categoria.filter(|c| !c.is_empty()) {
        query = query.filter(articles::category.eq(categoria));
    }
    if let Some(region) = q.region.filter(|r| !r.is_empty()) {
        query = query.filter(articles::region.eq(region));
    }

    let rows: Vec<Article> = query
        .order(articles::published_at.desc())
        .limit(por_pagina)
        .offset(pagina * por_pagina)
        .select(Article::as_select())
        .load(&mut conn)
        .await?;

    // Translation overlay: one extra query for the page's articles, original
    // text as fallback for the rest.
    let translations: HashMap<i32, ArticleTranslation> = match q
        .lang
        .as_deref()
        .filter(|lang| !lang.is_empty() && *lang != ORIGINAL_LANG)
    {
        Some(lang) => {
            let ids: Vec<i32> = rows.iter().map(|a| a.id).collect();
            article_translations::table
                .filter(article_translations::article_id.eq_any(&ids))
                .filter(article_translations::lang.eq(lang))
                .select(ArticleTranslation::as_select())
                .load::<ArticleTranslation>(&mut conn)
                .await?
                .into_iter()
                .map(|t| (t.article_id, t))
                .collect()
        }
        None => HashMap::new(),
    };

    let articles = rows
        .iter()
        .map(|a| ArticleSummary::from_article(a, translations.get(&a.id)))
        .collect();

    Ok(Json(ListResponse {
        success: true,
        articles,
        pagina,
        por_pagina,
    }))
}
