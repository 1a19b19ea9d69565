//! Response envelope helpers.

use crate::pagination::PageParams;
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Paginated list envelope: total count, neighbour links and the page rows.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(results: Vec<T>, count: i64, params: &PageParams, base_path: &str) -> Self {
        let next = params
            .has_next(count)
            .then(|| params.link(base_path, params.page + 1));
        let previous = params
            .has_previous()
            .then(|| params.link(base_path, params.page - 1));
        ListResponse {
            count,
            next,
            previous,
            results,
        }
    }
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn success_created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
