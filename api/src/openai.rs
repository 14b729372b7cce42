use eyre::eyre;
use serde::Deserialize;
use serde_json::json;

use crate::App;

const EMBEDDING_MODEL: &str = "text-embedding-3-small";
const CHAT_MODEL: &str = "gpt-4o-mini";

fn api_key(ctx: &App) -> Result<&str, eyre::Error> {
    ctx.config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| eyre!("OpenAI API key not configured"))
}

/// Embedding vector for a single input text.
pub async fn embed(ctx: &App, input: &str) -> Result<Vec<f32>, eyre::Error> {
    #[derive(Deserialize)]
    struct EmbeddingData {
        embedding: Vec<f32>,
    }

    #[derive(Deserialize)]
    struct EmbeddingResponse {
        data: Vec<EmbeddingData>,
    }

    let resp = ctx
        .http
        .post("https://api.openai.com/v1/embeddings")
        .bearer_auth(api_key(ctx)?)
        .json(&json!({
            "model": EMBEDDING_MODEL,
            "input": input,
        }))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(eyre!("OpenAI embeddings request failed ({status}): {body}"));
    }

    let parsed: EmbeddingResponse = resp.json().await?;
    parsed
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| eyre!("OpenAI returned no embedding"))
}

/// Single-turn chat completion, plain text out.
pub async fn chat(ctx: &App, system: &str, user: &str) -> Result<String, eyre::Error> {
    complete(ctx, system, user, false).await
}

/// Single-turn chat completion constrained to a JSON object response.
pub async fn chat_json(
    ctx: &App,
    system: &str,
    user: &str,
) -> Result<serde_json::Value, eyre::Error> {
    let text = complete(ctx, system, user, true).await?;
    serde_json::from_str(&text)
        .map_err(|err| eyre!("OpenAI returned malformed JSON content: {err}"))
}

async fn complete(
    ctx: &App,
    system: &str,
    user: &str,
    json_mode: bool,
) -> Result<String, eyre::Error> {
    #[derive(Deserialize)]
    struct Message {
        content: String,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: Message,
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        choices: Vec<Choice>,
    }

    let mut body = json!({
        "model": CHAT_MODEL,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
    });
    if json_mode {
        body["response_format"] = json!({ "type": "json_object" });
    }

    let resp = ctx
        .http
        .post("https://api.openai.com/v1/chat/completions")
        .bearer_auth(api_key(ctx)?)
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(eyre!("OpenAI chat request failed ({status}): {body}"));
    }

    let parsed: ChatResponse = resp.json().await?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| eyre!("OpenAI returned no completion choices"))
}
