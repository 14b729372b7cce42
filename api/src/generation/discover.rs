use std::collections::HashSet;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use eyre::eyre;
use serde::Serialize;

use crate::{
    App,
    models::{article::CATEGORIES, candidate::NewPendingCandidate, site::PreferredSite},
    schema::{articles, pending_candidates, preferred_sites},
    tavily,
    utils::excerpt,
};

use super::dedup::{self, RejectReason};

const MAX_RESULTS_PER_QUERY: u8 = 8;
/// Only titles from this many recent articles participate in the
/// similarity check; older coverage is fair game again.
const RECENT_TITLE_WINDOW: i64 = 200;

#[derive(Debug, Default, Serialize)]
pub struct DiscoveryReport {
    pub fetched: usize,
    pub rejected_url: usize,
    pub rejected_title: usize,
    pub inserted: usize,
}

/// Tavily sweep over the category queries plus one site-scoped query per
/// active preferred site. Each query failing is logged and skipped.
pub async fn run_discovery(ctx: &App) -> Result<DiscoveryReport, eyre::Error> {
    let mut conn = ctx.diesel.get().await?;

    let sites: Vec<PreferredSite> = preferred_sites::table
        .filter(preferred_sites::active.eq(true))
        .select(PreferredSite::as_select())
        .load(&mut conn)
        .await?;

    let mut queries: Vec<String> = CATEGORIES
        .iter()
        .map(|category| {
            format!("últimas noticias y tendencias de {category} en España y Latinoamérica")
        })
        .collect();
    for site in &sites {
        queries.push(format!("site:{} novedades", site.domain));
    }
    drop(conn);

    let mut results = Vec::new();
    for query in &queries {
        match tavily::search(ctx, query, MAX_RESULTS_PER_QUERY).await {
            Ok(batch) => results.extend(batch),
            Err(err) => tracing::error!(?err, query = %query, "Tavily search failed"),
        }
    }

    let mut report = DiscoveryReport {
        fetched: results.len(),
        ..Default::default()
    };

    let mut conn = ctx.diesel.get().await?;

    // The processed-URL log: everything we already wrote about plus every
    // candidate we ever queued, used or not.
    let mut known_urls: HashSet<String> = articles::table
        .filter(articles::source_url.is_not_null())
        .select(articles::source_url.assume_not_null())
        .load::<String>(&mut conn)
        .await?
        .into_iter()
        .collect();
    known_urls.extend(
        pending_candidates::table
            .select(pending_candidates::url)
            .load::<String>(&mut conn)
            .await?,
    );

    let mut known_titles: Vec<String> = articles::table
        .order(articles::created_at.desc())
        .limit(RECENT_TITLE_WINDOW)
        .select(articles::title)
        .load(&mut conn)
        .await?;
    known_titles.extend(
        pending_candidates::table
            .filter(pending_candidates::used.eq(false))
            .select(pending_candidates::title)
            .load::<String>(&mut conn)
            .await?,
    );

    for result in results {
        let url = match canonicalize_url(&result.url) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(url = %result.url, ?err, "Failed to parse discovered URL");
                continue;
            }
        };

        match dedup::should_reject(url.as_str(), &result.title, &known_urls, &known_titles) {
            Some(RejectReason::UrlAlreadyProcessed) => report.rejected_url += 1,
            Some(RejectReason::TitleTooSimilar) => report.rejected_title += 1,
            None => {
                let source_name = url.host_str().map(str::to_string);
                diesel::insert_into(pending_candidates::table)
                    .values(NewPendingCandidate {
                        url: url.to_string(),
                        title: result.title.clone(),
                        snippet: Some(excerpt(&result.content, 280)).filter(|s| !s.is_empty()),
                        source_name,
                        region: None,
                    })
                    .on_conflict(pending_candidates::url)
                    .do_nothing()
                    .execute(&mut conn)
                    .await?;

                // also guards against duplicates within this batch
                known_urls.insert(url.to_string());
                known_titles.push(result.title);
                report.inserted += 1;
            }
        }
    }

    Ok(report)
}

pub fn canonicalize_url(raw: &str) -> Result<url::Url, eyre::Error> {
    let mut url = url::Url::parse(raw)?;

    if !url.scheme().starts_with("http") {
        return Err(eyre!("unsupported scheme: {}", url.scheme()));
    }

    url.set_fragment(None);
    if url.path().ends_with('/') && url.path() != "/" {
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_canonicalize_strips_fragment_and_trailing_slash() {
        let url = canonicalize_url("https://example.com/nota/#seccion").unwrap();
        assert_eq!(url.as_str(), "https://example.com/nota");
    }

    #[test]
    fn test_canonicalize_keeps_root_path() {
        let url = canonicalize_url("https://example.com/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_rejects_non_http() {
        assert!(canonicalize_url("ftp://example.com/file").is_err());
        assert!(canonicalize_url("not a url").is_err());
    }
}
