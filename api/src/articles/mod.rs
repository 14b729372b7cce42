pub mod counters;
pub mod get;
pub mod list;
pub mod moderate;
pub mod routes;

use serde::Serialize;

use crate::models::article::{Article, ArticleTranslation};
use crate::utils::excerpt;

// The model that will be returned in listings
#[derive(Debug, Serialize, Clone)]
pub struct ArticleSummary {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub region: String,
    pub country: Option<String>,
    pub tags: Vec<String>,
    pub views: i64,
    pub reactions: i64,
    pub shares: i64,
    pub published_at: Option<chrono::NaiveDateTime>,
}

// The full article view, with the translation overlay already applied
#[derive(Debug, Serialize, Clone)]
pub struct ArticleView {
    pub id: i32,
    pub slug: String,
    pub lang: String,
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
    pub views: i64,
    pub reactions: i64,
    pub shares: i64,
    pub published_at: Option<chrono::NaiveDateTime>,
    /// Languages a stored translation exists for, besides the original.
    pub available_langs: Vec<String>,
}

/// Original language of every generated article.
pub const ORIGINAL_LANG: &str = "es";

pub fn string_list(value: &Option<serde_json::Value>) -> Vec<String> {
    value
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

impl ArticleSummary {
    pub fn from_article(article: &Article, translation: Option<&ArticleTranslation>) -> Self {
        let (title, body) = match translation {
            Some(t) => (t.title.clone(), t.body.as_str()),
            None => (article.title.clone(), article.body.as_str()),
        };

        ArticleSummary {
            id: article.id,
            slug: article.slug.clone(),
            title,
            excerpt: excerpt(body, 240),
            category: article.category.clone(),
            region: article.region.clone(),
            country: article.country.clone(),
            tags: string_list(&article.tags),
            views: article.views,
            reactions: article.reactions,
            shares: article.shares,
            published_at: article.published_at,
        }
    }
}

impl ArticleView {
    pub fn from_article(
        article: Article,
        translation: Option<ArticleTranslation>,
        available_langs: Vec<String>,
    ) -> Self {
        let tags = string_list(&article.tags);

        match translation {
            Some(t) => ArticleView {
                id: article.id,
                slug: article.slug,
                lang: t.lang,
                title: t.title,
                body: t.body,
                opinion: t.opinion,
                tips: string_list(&t.tips),
                category: article.category,
                region: article.region,
                country: article.country,
                tags,
                source_url: article.source_url,
                source_name: article.source_name,
                views: article.views,
                reactions: article.reactions,
                shares: article.shares,
                published_at: article.published_at,
                available_langs,
            },
            None => ArticleView {
                id: article.id,
                slug: article.slug,
                lang: ORIGINAL_LANG.into(),
                title: article.title,
                body: article.body,
                opinion: article.opinion,
                tips: string_list(&article.tips),
                category: article.category,
                region: article.region,
                country: article.country,
                tags,
                source_url: article.source_url,
                source_name: article.source_name,
                views: article.views,
                reactions: article.reactions,
                shares: article.shares,
                published_at: article.published_at,
                available_langs,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_string_list_skips_non_strings() {
        let value = Some(serde_json::json!(["uno", 2, "tres"]));
        assert_eq!(string_list(&value), vec!["uno", "tres"]);
        assert!(string_list(&None).is_empty());
        assert!(string_list(&Some(serde_json::json!("no array"))).is_empty());
    }
}
