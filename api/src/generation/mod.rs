pub mod balance;
pub mod dedup;
pub mod discover;
pub mod promote;

use serde::Serialize;

use crate::App;

#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub discovery: discover::DiscoveryReport,
    pub promotion: promote::PromotionReport,
}

/// The full daily run: discover new candidates, then promote a batch into
/// articles. Discovery failing outright (e.g. search API down) doesn't stop
/// promotion of the backlog.
#[tracing::instrument(skip(ctx))]
pub async fn run(ctx: &App, limit: usize, preview: bool) -> Result<PipelineReport, eyre::Error> {
    let discovery = discover::run_discovery(ctx)
        .await
        .inspect_err(|err| {
            tracing::error!(?err, "Candidate discovery failed");
        })
        .unwrap_or_default();

    tracing::info!(
        fetched = discovery.fetched,
        inserted = discovery.inserted,
        rejected_url = discovery.rejected_url,
        rejected_title = discovery.rejected_title,
        "Discovery done"
    );

    let promotion = promote::run_promotion(ctx, limit, preview).await?;

    tracing::info!(
        attempted = promotion.attempted,
        promoted = promotion.promoted,
        failed = promotion.failed,
        "Promotion done"
    );

    Ok(PipelineReport {
        discovery,
        promotion,
    })
}
