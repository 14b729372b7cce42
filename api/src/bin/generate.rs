use dotenv::dotenv;
use terra_api::{App, generation, init_tracing};

// Cron entry point: `generate [--preview] [limit]`. Preview prints the
// drafts to stdout and persists nothing.
#[tokio::main]
async fn main() {
    dotenv().ok();

    let mut preview = false;
    let mut limit = 3usize;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--preview" => preview = true,
            other => match other.parse() {
                Ok(n) => limit = n,
                Err(_) => {
                    eprintln!("usage: generate [--preview] [limit]");
                    std::process::exit(2);
                }
            },
        }
    }

    let app = App::bootstrap().expect("couldn't bootstrap application state");
    init_tracing(&app.config.env);

    match generation::run(&app, limit, preview).await {
        Ok(report) => {
            if preview {
                match serde_json::to_string_pretty(&report.promotion.drafts) {
                    Ok(json) => println!("{json}"),
                    Err(err) => tracing::error!(?err, "couldn't serialize preview drafts"),
                }
            }
            tracing::info!(
                inserted_candidates = report.discovery.inserted,
                promoted = report.promotion.promoted,
                failed = report.promotion.failed,
                "Generation run finished"
            );
        }
        Err(err) => {
            tracing::error!(?err, "Generation run failed");
            std::process::exit(1);
        }
    }
}
