/*
 * Responsibility
 * - URL layout under /api
 * - everything below /user sits behind the access gate
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::users::{create_user, get_user};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let users = Router::new()
        .route("/create", post(create_user))
        .route("/me/{id}", get(get_user));

    Router::new().nest("/user", access::apply(users, state))
}
