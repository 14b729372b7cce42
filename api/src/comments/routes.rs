use axum::{
    Router,
    routing::{get, post},
};

use crate::App;

use super::{
    create::create_comment, get::get_comments, like::like_comment, moderate::moderate_comment,
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/", get(get_comments))
        .route("/", post(create_comment))
        .route("/{id}/like", post(like_comment))
        .route("/{id}/moderar", post(moderate_comment))
}
