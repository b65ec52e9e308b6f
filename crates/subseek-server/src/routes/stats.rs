use axum::extract::State;
use axum::Json;
use subseek_core::Error;
use subseek_index::IndexStats;

use crate::context::AppContext;
use crate::error::AppError;

/// GET /stats
///
/// Any failure to read the store is reported as 503.
pub async fn stats(State(ctx): State<AppContext>) -> Result<Json<IndexStats>, AppError> {
    let db = ctx.db.clone();
    let stats = tokio::task::spawn_blocking(move || {
        let conn = subseek_db::pool::get_conn(&db)?;
        subseek_index::get_statistics(&conn)
    })
    .await?
    .map_err(|e| Error::Unavailable(format!("Unable to read statistics: {e}")))?;

    Ok(Json(stats))
}
