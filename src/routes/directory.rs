//! Directory CRUD routes. Paths keep their trailing slash.

use crate::handlers::directory::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn directory_routes(state: AppState) -> Router {
    Router::new()
        .route("/directories/", get(list).post(create))
        .route("/directories/:id/", get(read).patch(update).delete(delete_handler))
        .with_state(state)
}
