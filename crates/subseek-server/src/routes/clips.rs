//! On-demand audio and video clip endpoints.
//!
//! A missing source file or a failed ffmpeg run is not an HTTP error: the
//! client gets `success: false` and a message. Malformed timestamps are
//! rejected with 400.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use subseek_core::{ClipKind, SeasonEpisode};

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClipRequest {
    pub season: u32,
    pub episode: u32,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AudioClipResponse {
    pub success: bool,
    pub audio_url: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoClipResponse {
    pub success: bool,
    pub video_url: Option<String>,
    pub message: Option<String>,
}

/// POST /generate_audio
pub async fn generate_audio(
    State(ctx): State<AppContext>,
    Json(req): Json<ClipRequest>,
) -> Result<Json<AudioClipResponse>, AppError> {
    let url = cut(&ctx, ClipKind::Audio, &req).await?;
    Ok(Json(AudioClipResponse {
        success: url.is_some(),
        message: failure_message(ClipKind::Audio, url.is_some()),
        audio_url: url,
    }))
}

/// POST /generate_video
pub async fn generate_video(
    State(ctx): State<AppContext>,
    Json(req): Json<ClipRequest>,
) -> Result<Json<VideoClipResponse>, AppError> {
    let url = cut(&ctx, ClipKind::Video, &req).await?;
    Ok(Json(VideoClipResponse {
        success: url.is_some(),
        message: failure_message(ClipKind::Video, url.is_some()),
        video_url: url,
    }))
}

async fn cut(ctx: &AppContext, kind: ClipKind, req: &ClipRequest) -> Result<Option<String>, AppError> {
    let clips = ctx.clips.clone();
    tokio::task::spawn_blocking(move || clips.cleanup_expired(kind)).await?;

    let tag = SeasonEpisode::new(req.season, req.episode);
    let output = ctx
        .clips
        .extract(kind, tag, &req.start_time, &req.end_time)
        .await?;
    Ok(output.map(|clip| clip.url))
}

fn failure_message(kind: ClipKind, success: bool) -> Option<String> {
    (!success).then(|| format!("Unable to find the {kind} file or cut the clip"))
}
