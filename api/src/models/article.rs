use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

pub mod status {
    pub const DRAFT: &str = "draft";
    pub const PUBLISHED: &str = "published";
    pub const REJECTED: &str = "rejected";
    pub const SCHEDULED: &str = "scheduled";

    pub const ALL: &[&str] = &[DRAFT, PUBLISHED, REJECTED, SCHEDULED];
}

/// The closed category set. Anything else coming out of the generation
/// model is coerced to the first entry.
pub const CATEGORIES: &[&str] = &[
    "naturaleza",
    "tecnologia",
    "cultura",
    "viajes",
    "estilo-de-vida",
];

/// Moderation transitions we accept on the estado endpoint.
pub fn valid_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        (status::DRAFT, status::PUBLISHED)
            | (status::DRAFT, status::SCHEDULED)
            | (status::DRAFT, status::REJECTED)
            | (status::SCHEDULED, status::PUBLISHED)
            | (status::SCHEDULED, status::REJECTED)
            | (status::PUBLISHED, status::REJECTED)
    )
}

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Article {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Option<serde_json::Value>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub region: String,
    pub country: Option<String>,
    pub category: String,
    pub tags: Option<serde_json::Value>,
    pub status: String,
    pub views: i64,
    pub reactions: i64,
    pub shares: i64,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::articles)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Option<serde_json::Value>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub region: String,
    pub country: Option<String>,
    pub category: String,
    pub tags: Option<serde_json::Value>,
    pub status: String,
}

#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::article_translations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArticleTranslation {
    pub id: i32,
    pub article_id: i32,
    pub lang: String,
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::article_translations)]
pub struct NewArticleTranslation {
    pub article_id: i32,
    pub lang: String,
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Option<serde_json::Value>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_draft_can_publish_but_not_back() {
        assert!(valid_transition(status::DRAFT, status::PUBLISHED));
        assert!(!valid_transition(status::PUBLISHED, status::DRAFT));
    }

    #[test]
    fn test_rejected_is_terminal() {
        for to in status::ALL {
            assert!(!valid_transition(status::REJECTED, to));
        }
    }
}
