use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::App;

use super::{
    counters::{react_article, share_article},
    get::get_article,
    list::list_articles,
    moderate::{delete_article, set_status},
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/", get(list_articles))
        .route("/{slug}", get(get_article))
        .route("/{slug}", delete(delete_article))
        .route("/{slug}/reaccion", post(react_article))
        .route("/{slug}/compartir", post(share_article))
        .route("/{slug}/estado", post(set_status))
}
