use eyre::eyre;
use serde_json::json;

use crate::App;

/// Transactional plain-text mail. One unconditional POST, the caller decides
/// whether a failure is fatal.
pub async fn send(ctx: &App, to: &str, subject: &str, body: &str) -> Result<(), eyre::Error> {
    let sendgrid = ctx
        .config
        .sendgrid
        .as_ref()
        .ok_or_else(|| eyre!("SendGrid not configured"))?;

    let resp = ctx
        .http
        .post("https://api.sendgrid.com/v3/mail/send")
        .bearer_auth(&sendgrid.api_key)
        .json(&json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": sendgrid.sender },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        }))
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(eyre!("SendGrid send failed ({status}): {body}"));
    }

    Ok(())
}
