use std::path::PathBuf;

use dotenv::dotenv;
use terra_api::{App, export, init_tracing};

// Cron entry point: `export [path]`, defaults to ./articulos.json
#[tokio::main]
async fn main() {
    dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("articulos.json"));

    let app = App::bootstrap().expect("couldn't bootstrap application state");
    init_tracing(&app.config.env);

    match export::export_articles(&app, &path).await {
        Ok(count) => tracing::info!(count, path = %path.display(), "Export finished"),
        Err(err) => {
            tracing::error!(?err, "Export failed");
            std::process::exit(1);
        }
    }
}
