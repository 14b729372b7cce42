use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

// The vector is stored as a plain JSON float array and ranked with an
// in-process linear scan, so no vector extension is involved.
#[derive(Queryable, Selectable, Debug, Serialize, Clone)]
#[diesel(table_name = crate::schema::article_embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArticleEmbedding {
    pub id: i32,
    pub article_id: i32,
    pub embedding: serde_json::Value,
    pub content_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::article_embeddings)]
pub struct NewArticleEmbedding {
    pub article_id: i32,
    pub embedding: serde_json::Value,
    pub content_hash: String,
}

impl ArticleEmbedding {
    /// Decode the stored JSON array; rows that fail to decode are skipped by
    /// callers rather than failing the whole scan.
    pub fn vector(&self) -> Option<Vec<f32>> {
        serde_json::from_value(self.embedding.clone()).ok()
    }
}
