//! Dialogue search endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use subseek_index::SearchHit;

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total: usize,
}

/// GET /search?q=&limit=
pub async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    if params.q.trim().is_empty() {
        return Ok(Json(SearchResponse {
            query: params.q,
            results: Vec::new(),
            total: 0,
        }));
    }

    let limit = params.limit.unwrap_or(ctx.config.index.default_limit);
    let db = ctx.db.clone();
    let query = params.q.clone();
    let results = tokio::task::spawn_blocking(move || {
        let conn = subseek_db::pool::get_conn(&db)?;
        subseek_index::search(&conn, &query, limit)
    })
    .await??;

    tracing::debug!(query = %params.q, limit, hits = results.len(), "Search served");

    Ok(Json(SearchResponse {
        query: params.q,
        total: results.len(),
        results,
    }))
}
