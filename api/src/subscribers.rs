use std::sync::LazyLock;

use axum::{
    Json, debug_handler,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use rand::RngExt;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::{
        article::Article,
        subscriber::{NewSubscriber, Subscriber},
    },
    schema::subscribers,
    sendgrid,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Added on top of the real subscriber count per row, for the public counter.
const BOOST_RANGE: std::ops::RangeInclusive<i32> = 3..=10;

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/suscribir", post(subscribe))
        .route("/suscriptores/contador", get(subscriber_counter))
}

pub fn validate_email(email: &str) -> Result<String, &'static str> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err("No email provided");
    }
    if email.len() > 100 {
        return Err("Email too long");
    }
    if !EMAIL_RE.is_match(&email) {
        return Err("Invalid email");
    }

    Ok(email)
}

#[derive(Deserialize)]
pub struct SubscriptionSubmission {
    email: String,
    locale: Option<String>,
    consent: Option<bool>,
}

#[derive(Serialize)]
pub struct SubscriberCounter {
    real: i64,
    display: i64,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    success: bool,
    created: bool,
    counter: SubscriberCounter,
}

#[debug_handler]
pub async fn subscribe(
    State(ctx): State<App>,
    crate::json::Json(submission): crate::json::Json<SubscriptionSubmission>,
) -> Result<Json<SubscribeResponse>, AppError> {
    let email = validate_email(&submission.email).map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    let display_boost = rand::rng().random_range(BOOST_RANGE);

    // Subscribing twice is fine and changes nothing
    let created = diesel::insert_into(subscribers::table)
        .values(NewSubscriber {
            email: email.clone(),
            locale: submission.locale.unwrap_or_else(|| "es".into()),
            consent: submission.consent.unwrap_or(false),
            confirmed: true,
            display_boost,
        })
        .on_conflict(subscribers::email)
        .do_nothing()
        .execute(&mut conn)
        .await?;

    let counter = counter_pair(&ctx).await?;

    if created > 0 && ctx.config.sendgrid.is_some() {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let body = format!(
                "¡Gracias por suscribirte a TERRApp!\n\nTe avisaremos cuando \
                 publiquemos nuevos artículos: {}/blog",
                ctx.config.base_url
            );
            if let Err(err) = sendgrid::send(&ctx, &email, "Bienvenida a TERRApp", &body).await {
                tracing::warn!(?err, "Failed to send welcome mail");
            }
        });
    }

    Ok(Json(SubscribeResponse {
        success: true,
        created: created > 0,
        counter,
    }))
}

#[derive(Serialize)]
pub struct CounterResponse {
    success: bool,
    counter: SubscriberCounter,
}

#[debug_handler]
pub async fn subscriber_counter(
    State(ctx): State<App>,
) -> Result<Json<CounterResponse>, AppError> {
    Ok(Json(CounterResponse {
        success: true,
        counter: counter_pair(&ctx).await?,
    }))
}

// display = real + the per-row boosts; always ahead of real once anyone
// has subscribed
async fn counter_pair(ctx: &App) -> Result<SubscriberCounter, AppError> {
    use diesel::dsl::sum;

    let mut conn = ctx.diesel.get().await?;

    let real: i64 = subscribers::table.count().get_result(&mut conn).await?;
    let boost: Option<i64> = subscribers::table
        .select(sum(subscribers::display_boost))
        .first(&mut conn)
        .await?;

    Ok(SubscriberCounter {
        real,
        display: real + boost.unwrap_or(0),
    })
}

/// Best-effort fan-out to every consenting subscriber when an article goes
/// live. Failures are logged per recipient and skipped.
pub async fn notify_article_published(ctx: &App, article: &Article) {
    if ctx.config.sendgrid.is_none() {
        return;
    }

    let mut conn = match ctx.diesel.get().await {
        Ok(conn) => conn,
        Err(err) => {
            tracing::error!(?err, "Couldn't get connection for publish notification");
            return;
        }
    };

    let recipients: Vec<Subscriber> = match subscribers::table
        .filter(subscribers::confirmed.eq(true))
        .filter(subscribers::consent.eq(true))
        .select(Subscriber::as_select())
        .load(&mut conn)
        .await
    {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!(?err, "Couldn't load subscribers for publish notification");
            return;
        }
    };
    drop(conn);

    let subject = format!("Nuevo artículo: {}", article.title);
    let body = format!(
        "Acabamos de publicar «{}».\n\nLéelo aquí: {}/blog/{}",
        article.title, ctx.config.base_url, article.slug
    );

    let mut sent = 0usize;
    for recipient in &recipients {
        match sendgrid::send(ctx, &recipient.email, &subject, &body).await {
            Ok(()) => sent += 1,
            Err(err) => {
                tracing::warn!(?err, email = %recipient.email, "Failed to send publish notification")
            }
        }
    }

    tracing::info!(sent, total = recipients.len(), slug = %article.slug, "Publish notifications done");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_emails_are_rejected() {
        for email in ["", "no-arroba", "a@b", "dos @espacios.es", "a@@b.es"] {
            assert!(validate_email(email).is_err(), "accepted: {email:?}");
        }
    }

    #[test]
    fn test_valid_email_is_normalized() {
        assert_eq!(
            validate_email("  Ana.Perez@Example.COM "),
            Ok("ana.perez@example.com".into())
        );
    }

    #[test]
    fn test_display_boost_stays_in_range() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let boost = rng.random_range(BOOST_RANGE);
            assert!((3..=10).contains(&boost));
        }
    }
}
