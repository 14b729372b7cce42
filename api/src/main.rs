use axum::Router;
use dotenv::dotenv;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use terra_api::{App, articles, comments, init_tracing, quiz, search, subscribers};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let app = App::bootstrap().expect("couldn't bootstrap application state");
    init_tracing(&app.config.env);

    let api = Router::new()
        .nest("/articulos", articles::routes::route())
        .nest("/comentarios", comments::routes::route())
        .merge(subscribers::route())
        .merge(search::route())
        .merge(quiz::route());

    let router = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("couldn't bind listener");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
