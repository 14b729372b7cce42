use std::path::Path;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    articles::string_list,
    models::article::{Article, status},
    schema::articles,
};

// Field order is part of the artifact: re-exporting unchanged data must
// produce byte-identical output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportedArticle {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Vec<String>,
    pub category: String,
    pub region: String,
    pub country: Option<String>,
    pub tags: Vec<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub published_at: Option<chrono::NaiveDateTime>,
}

impl From<Article> for ExportedArticle {
    fn from(article: Article) -> Self {
        let tips = string_list(&article.tips);
        let tags = string_list(&article.tags);

        ExportedArticle {
            id: article.id,
            slug: article.slug,
            title: article.title,
            body: article.body,
            opinion: article.opinion,
            tips,
            category: article.category,
            region: article.region,
            country: article.country,
            tags,
            source_url: article.source_url,
            source_name: article.source_name,
            published_at: article.published_at,
        }
    }
}

/// Deterministic serialization: slug order regardless of input order.
pub fn render(mut articles: Vec<ExportedArticle>) -> Result<String, serde_json::Error> {
    articles.sort_by(|a, b| a.slug.cmp(&b.slug).then(a.id.cmp(&b.id)));
    serde_json::to_string_pretty(&articles)
}

/// Write `articulos.json` with every published article.
pub async fn export_articles(ctx: &App, path: &Path) -> Result<usize, eyre::Error> {
    let mut conn = ctx.diesel.get().await?;

    let rows: Vec<Article> = articles::table
        .filter(articles::status.eq(status::PUBLISHED))
        .order(articles::slug.asc())
        .select(Article::as_select())
        .load(&mut conn)
        .await?;

    let exported: Vec<ExportedArticle> = rows.into_iter().map(Into::into).collect();
    let count = exported.len();

    let json = render(exported).wrap_err("couldn't serialize export")?;
    tokio::fs::write(path, json)
        .await
        .wrap_err_with(|| format!("couldn't write export to {}", path.display()))?;

    Ok(count)
}

#[cfg(test)]
mod test {
    use super::*;

    fn exported(id: i32, slug: &str) -> ExportedArticle {
        ExportedArticle {
            id,
            slug: slug.into(),
            title: format!("Artículo {id}"),
            body: "## Sección\nTexto.".into(),
            opinion: None,
            tips: vec!["consejo".into()],
            category: "viajes".into(),
            region: "espana".into(),
            country: Some("España".into()),
            tags: vec!["tag".into()],
            source_url: Some(format!("https://example.com/{slug}")),
            source_name: Some("example.com".into()),
            published_at: chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0),
        }
    }

    #[test]
    fn test_render_is_byte_stable_across_runs() {
        let articles = vec![exported(1, "alfa"), exported(2, "beta")];
        let first = render(articles.clone()).unwrap();
        let second = render(articles).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_ignores_input_order() {
        let sorted = render(vec![exported(1, "alfa"), exported(2, "beta")]).unwrap();
        let shuffled = render(vec![exported(2, "beta"), exported(1, "alfa")]).unwrap();
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn test_slug_to_id_mapping_round_trips() {
        let articles = vec![exported(7, "alfa"), exported(3, "beta"), exported(9, "gamma")];
        let json = render(articles.clone()).unwrap();

        let reloaded: Vec<ExportedArticle> = serde_json::from_str(&json).unwrap();
        for article in &articles {
            let found = reloaded.iter().find(|r| r.slug == article.slug).unwrap();
            assert_eq!(found.id, article.id);
        }
    }
}
