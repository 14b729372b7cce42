use eyre::eyre;
use serde::Deserialize;
use serde_json::json;

use crate::App;

#[derive(Debug, Clone, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
}

fn api_key(ctx: &App) -> Result<&str, eyre::Error> {
    ctx.config
        .tavily_api_key
        .as_deref()
        .ok_or_else(|| eyre!("Tavily API key not configured"))
}

pub async fn search(
    ctx: &App,
    query: &str,
    max_results: u8,
) -> Result<Vec<TavilyResult>, eyre::Error> {
    #[derive(Deserialize)]
    struct SearchResponse {
        results: Vec<TavilyResult>,
    }

    let resp = ctx
        .http
        .post("https://api.tavily.com/search")
        .bearer_auth(api_key(ctx)?)
        .json(&json!({
            "query": query,
            "max_results": max_results,
            "search_depth": "basic",
        }))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(eyre!("Tavily search request failed ({status}): {body}"));
    }

    let parsed: SearchResponse = resp.json().await?;
    Ok(parsed.results)
}

/// Page text for a single URL via the extract endpoint.
pub async fn extract(ctx: &App, url: &str) -> Result<String, eyre::Error> {
    #[derive(Deserialize)]
    struct ExtractResult {
        raw_content: String,
    }

    #[derive(Deserialize)]
    struct ExtractResponse {
        results: Vec<ExtractResult>,
    }

    let resp = ctx
        .http
        .post("https://api.tavily.com/extract")
        .bearer_auth(api_key(ctx)?)
        .json(&json!({ "urls": [url] }))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(eyre!("Tavily extract request failed ({status}): {body}"));
    }

    let parsed: ExtractResponse = resp.json().await?;
    parsed
        .results
        .into_iter()
        .next()
        .map(|r| r.raw_content)
        .ok_or_else(|| eyre!("Tavily could not extract content for {url}"))
}
