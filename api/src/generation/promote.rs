use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use eyre::eyre;
use futures::stream::StreamExt;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::{
    App,
    articles::ORIGINAL_LANG,
    models::{
        article::{CATEGORIES, NewArticle, NewArticleTranslation, status},
        candidate::PendingCandidate,
        embedding::NewArticleEmbedding,
    },
    openai,
    schema::{article_embeddings, article_translations, articles, pending_candidates},
    tavily,
    utils::slugify,
};

use super::balance;

const MAX_CONCURRENT_GENERATIONS: usize = 2;
/// Page text beyond this many characters doesn't reach the model.
const MAX_SOURCE_CHARS: usize = 12_000;

const DRAFT_SYSTEM_PROMPT: &str = "Eres parte del equipo editorial de TERRApp, una revista \
digital en español. A partir de la fuente que te pasa el usuario escribes un artículo original \
en español, sin copiar frases de la fuente. Responde únicamente con un objeto JSON con las \
claves: titulo, cuerpo (markdown, con secciones marcadas con '##'), opinion (valoración \
editorial breve), consejos (lista de consejos prácticos), categoria (una de: naturaleza, \
tecnologia, cultura, viajes, estilo-de-vida), pais (país principal del tema, si lo hay) y \
etiquetas (lista de etiquetas cortas).";

#[derive(Debug, Clone, Serialize)]
pub struct DraftArticle {
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Vec<String>,
    pub category: String,
    pub country: Option<String>,
    pub tags: Vec<String>,
    pub region: String,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranslatedDraft {
    pub lang: String,
    pub title: String,
    pub body: String,
    pub opinion: Option<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct PromotionReport {
    pub attempted: usize,
    pub promoted: usize,
    pub failed: usize,
    /// Populated in preview mode only.
    pub drafts: Vec<DraftArticle>,
}

/// Convert up to `limit` unused candidates into articles, oldest first.
/// Failures are per-candidate; a failed candidate is marked used anyway so
/// a poisoned URL can't wedge every following batch.
pub async fn run_promotion(
    ctx: &App,
    limit: usize,
    preview: bool,
) -> Result<PromotionReport, eyre::Error> {
    let mut conn = ctx.diesel.get().await?;

    let candidates: Vec<PendingCandidate> = pending_candidates::table
        .filter(pending_candidates::used.eq(false))
        .order(pending_candidates::created_at.asc())
        .limit(limit as i64)
        .select(PendingCandidate::as_select())
        .load(&mut conn)
        .await?;
    // Release the connection before the vendor calls
    drop(conn);

    let outcomes = futures::stream::iter(candidates)
        .map(|candidate| {
            let ctx = ctx.clone();
            async move {
                let result = promote_candidate(&ctx, &candidate, preview).await;
                (candidate, result)
            }
        })
        .buffer_unordered(MAX_CONCURRENT_GENERATIONS)
        .collect::<Vec<_>>()
        .await;

    let mut report = PromotionReport {
        attempted: outcomes.len(),
        ..Default::default()
    };

    let mut conn = ctx.diesel.get().await?;
    for (candidate, result) in outcomes {
        match result {
            Ok(draft) => {
                report.promoted += 1;
                if preview {
                    report.drafts.push(draft);
                } else {
                    mark_used(&mut conn, candidate.id).await?;
                }
            }
            Err(err) => {
                tracing::warn!(?err, url = %candidate.url, "Failed to promote candidate");
                report.failed += 1;
                if !preview {
                    mark_used(&mut conn, candidate.id).await?;
                }
            }
        }
    }

    Ok(report)
}

async fn promote_candidate(
    ctx: &App,
    candidate: &PendingCandidate,
    preview: bool,
) -> Result<DraftArticle, eyre::Error> {
    let page_text = match tavily::extract(ctx, &candidate.url).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                url = %candidate.url,
                ?err,
                "Failed to extract page text, falling back to the stored snippet"
            );
            candidate
                .snippet
                .clone()
                .unwrap_or_else(|| candidate.title.clone())
        }
    };

    let source: String = page_text.chars().take(MAX_SOURCE_CHARS).collect();
    let user_prompt = format!(
        "Título de la fuente: {}\nURL: {}\n\nContenido de la fuente:\n{}",
        candidate.title, candidate.url, source
    );

    let draft_json = openai::chat_json(ctx, DRAFT_SYSTEM_PROMPT, &user_prompt).await?;
    let mut draft = draft_from_json(&draft_json)?;
    draft.source_url = Some(candidate.url.clone());
    draft.source_name = candidate.source_name.clone();

    let region = match draft.country.as_deref().and_then(balance::region_for_country) {
        Some(region) => region,
        None => {
            let mut conn = ctx.diesel.get().await?;
            balance::suggest_region(&mut conn).await?
        }
    };
    draft.region = region.into();

    if preview {
        return Ok(draft);
    }

    let mut translations = Vec::new();
    for lang in &ctx.config.translation_langs {
        if lang == ORIGINAL_LANG {
            continue;
        }
        match translate_draft(ctx, &draft, lang).await {
            Ok(t) => translations.push(t),
            Err(err) => {
                tracing::warn!(?err, lang = %lang, title = %draft.title, "Translation failed")
            }
        }
    }

    let embed_input = format!("{}\n\n{}", draft.title, draft.body);
    let embedding = openai::embed(ctx, &embed_input).await?;
    let content_hash = format!("{:x}", Sha256::digest(embed_input.as_bytes()));

    let mut conn = ctx.diesel.get().await?;
    let slug = unique_slug(&mut conn, &draft.title).await?;
    insert_article(&mut conn, &draft, &slug, translations, &embedding, content_hash).await?;
    balance::increment_region(&mut conn, region).await?;

    Ok(draft)
}

fn draft_from_json(value: &Value) -> Result<DraftArticle, eyre::Error> {
    let title = value
        .get("titulo")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| eyre!("draft is missing a title"))?;

    let body = value
        .get("cuerpo")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| eyre!("draft is missing a body"))?;

    let category = match value.get("categoria").and_then(Value::as_str) {
        Some(c) if CATEGORIES.contains(&c) => c,
        other => {
            tracing::debug!(?other, "Model picked an unknown category, coercing");
            CATEGORIES[0]
        }
    };

    Ok(DraftArticle {
        title: title.to_string(),
        body: body.to_string(),
        opinion: value
            .get("opinion")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string),
        tips: json_string_list(value.get("consejos")),
        category: category.to_string(),
        country: value
            .get("pais")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
        tags: json_string_list(value.get("etiquetas")),
        region: String::new(),
        source_url: None,
        source_name: None,
    })
}

fn json_string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(str::trim).map(str::to_string))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

async fn translate_draft(
    ctx: &App,
    draft: &DraftArticle,
    lang: &str,
) -> Result<TranslatedDraft, eyre::Error> {
    let system = format!(
        "Traduce el siguiente artículo al idioma con código ISO '{lang}'. Mantén el formato \
         markdown del cuerpo y responde únicamente con un objeto JSON con las claves: titulo, \
         cuerpo, opinion y consejos."
    );
    let user = serde_json::json!({
        "titulo": draft.title,
        "cuerpo": draft.body,
        "opinion": draft.opinion,
        "consejos": draft.tips,
    })
    .to_string();

    let value = openai::chat_json(ctx, &system, &user).await?;

    Ok(TranslatedDraft {
        lang: lang.to_string(),
        title: value
            .get("titulo")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| eyre!("translation is missing a title"))?
            .to_string(),
        body: value
            .get("cuerpo")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| eyre!("translation is missing a body"))?
            .to_string(),
        opinion: value
            .get("opinion")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string),
        tips: json_string_list(value.get("consejos")),
    })
}

async fn unique_slug(conn: &mut AsyncPgConnection, title: &str) -> Result<String, eyre::Error> {
    let base = {
        let slug = slugify(title);
        if slug.is_empty() { "articulo".into() } else { slug }
    };

    let mut candidate = base.clone();
    let mut n = 2;
    loop {
        let taken: Option<i32> = articles::table
            .filter(articles::slug.eq(&candidate))
            .select(articles::id)
            .first(conn)
            .await
            .optional()?;

        if taken.is_none() {
            return Ok(candidate);
        }

        candidate = format!("{base}-{n}");
        n += 1;
    }
}

#[tracing::instrument(skip_all, fields(slug = %slug))]
async fn insert_article(
    conn: &mut AsyncPgConnection,
    draft: &DraftArticle,
    slug: &str,
    translations: Vec<TranslatedDraft>,
    embedding: &[f32],
    content_hash: String,
) -> Result<i32, eyre::Error> {
    use diesel_async::AsyncConnection;

    let embedding_json = serde_json::to_value(embedding)?;
    let new_article = NewArticle {
        slug: slug.to_string(),
        title: draft.title.clone(),
        body: draft.body.clone(),
        opinion: draft.opinion.clone(),
        tips: Some(serde_json::json!(draft.tips)),
        source_url: draft.source_url.clone(),
        source_name: draft.source_name.clone(),
        region: draft.region.clone(),
        country: draft.country.clone(),
        category: draft.category.clone(),
        tags: Some(serde_json::json!(draft.tags)),
        status: status::DRAFT.into(),
    };

    Ok(conn
        .transaction(|conn| {
            Box::pin(async move {
                let article_id = diesel::insert_into(articles::table)
                    .values(&new_article)
                    .returning(articles::id)
                    .get_result::<i32>(conn)
                    .await?;

                let translation_rows: Vec<NewArticleTranslation> = translations
                    .into_iter()
                    .map(|t| NewArticleTranslation {
                        article_id,
                        lang: t.lang,
                        title: t.title,
                        body: t.body,
                        opinion: t.opinion,
                        tips: Some(serde_json::json!(t.tips)),
                    })
                    .collect();

                if !translation_rows.is_empty() {
                    diesel::insert_into(article_translations::table)
                        .values(&translation_rows)
                        .execute(conn)
                        .await?;
                }

                diesel::insert_into(article_embeddings::table)
                    .values(NewArticleEmbedding {
                        article_id,
                        embedding: embedding_json,
                        content_hash,
                    })
                    .execute(conn)
                    .await?;

                Ok::<_, diesel::result::Error>(article_id)
            })
        })
        .await?)
}

async fn mark_used(conn: &mut AsyncPgConnection, candidate_id: i32) -> Result<(), eyre::Error> {
    diesel::update(pending_candidates::table)
        .filter(pending_candidates::id.eq(candidate_id))
        .set(pending_candidates::used.eq(true))
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_draft_from_json_reads_all_fields() {
        let value = serde_json::json!({
            "titulo": " Rutas verdes por Galicia ",
            "cuerpo": "## Introducción\nTexto.",
            "opinion": "Una tendencia que va a más.",
            "consejos": ["Lleva agua", "Madruga", ""],
            "categoria": "viajes",
            "pais": "España",
            "etiquetas": ["galicia", "senderismo"],
        });

        let draft = draft_from_json(&value).unwrap();
        assert_eq!(draft.title, "Rutas verdes por Galicia");
        assert_eq!(draft.category, "viajes");
        assert_eq!(draft.country.as_deref(), Some("España"));
        assert_eq!(draft.tips, vec!["Lleva agua", "Madruga"]);
        assert_eq!(draft.tags.len(), 2);
    }

    #[test]
    fn test_draft_without_title_is_an_error() {
        let value = serde_json::json!({ "cuerpo": "## Algo" });
        assert!(draft_from_json(&value).is_err());
    }

    #[test]
    fn test_unknown_category_is_coerced_into_the_closed_set() {
        let value = serde_json::json!({
            "titulo": "Título",
            "cuerpo": "Cuerpo del artículo",
            "categoria": "deportes",
        });

        let draft = draft_from_json(&value).unwrap();
        assert_eq!(draft.category, CATEGORIES[0]);
    }
}
