//! Axum router construction.
//!
//! Builds the application router with the API routes, the static clip
//! directories, CORS, request IDs and request tracing.

use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use subseek_core::config::ClipSourceConfig;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete application router.
pub fn build_router(ctx: AppContext) -> Router {
    let config = ctx.config.clone();

    let mut app: Router<AppContext> = Router::new()
        .route("/", get(routes::root::index))
        .route("/health", get(routes::root::health_check))
        .route("/search", get(routes::search::search))
        .route("/stats", get(routes::stats::stats))
        .route("/generate_audio", post(routes::clips::generate_audio))
        .route("/generate_video", post(routes::clips::generate_video));

    let mut mounted = Vec::new();
    for source in [&config.clips.audio, &config.clips.video] {
        let Some(mount) = clip_mount(source) else {
            continue;
        };
        if mounted.contains(&mount) {
            tracing::warn!(%mount, "Clip directories share a url prefix; serving only the first");
            continue;
        }
        app = app.nest_service(&mount, ServeDir::new(&source.temp_dir));
        mounted.push(mount);
    }

    let mut app = app
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&config.server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Static file serving for a UI build.
    if let Some(dir) = &config.server.static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

/// `/temp_audio` for a url prefix of `temp_audio`. Clips cannot be served
/// from the root, so an empty prefix mounts nothing.
fn clip_mount(source: &ClipSourceConfig) -> Option<String> {
    let prefix = source.url_prefix.trim_matches('/');
    (!prefix.is_empty()).then(|| format!("/{prefix}"))
}

/// CORS for the configured origins. `"*"` opens it to any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}
