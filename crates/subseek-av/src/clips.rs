//! Audio and video clip extraction around a dialogue line.
//!
//! [`ClipExtractor`] finds the episode's source media from the configured
//! filename templates, pads the dialogue window, and asks ffmpeg to cut it
//! into the kind's temp directory. A missing source or a failed ffmpeg run
//! is an expected outcome and yields `Ok(None)`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use subseek_core::config::{ClipSourceConfig, ClipsConfig};
use subseek_core::{timecode, ClipKind, Result, SeasonEpisode};

use crate::cleanup;
use crate::command::ToolCommand;
use crate::template::EpisodeTemplate;
use crate::tools::ToolRegistry;

/// A padded window into the source media, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub start: f64,
    pub duration: f64,
}

impl ClipWindow {
    /// Window from `start - padding` (clamped at zero) to `end + padding`.
    pub fn around(start: &str, end: &str, padding: f64) -> Result<Self> {
        let start = timecode::to_seconds(start)?;
        let end = timecode::to_seconds(end)?;
        let padded_start = (start - padding).max(0.0);
        Ok(Self {
            start: padded_start,
            duration: (end + padding - padded_start).max(0.0),
        })
    }
}

/// A clip written to disk and the URL it is served under.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOutput {
    pub path: PathBuf,
    pub url: String,
}

pub struct ClipExtractor {
    config: ClipsConfig,
    tools: Arc<ToolRegistry>,
}

impl ClipExtractor {
    pub fn new(config: ClipsConfig, tools: Arc<ToolRegistry>) -> Self {
        Self { config, tools }
    }

    pub fn config(&self) -> &ClipsConfig {
        &self.config
    }

    /// First candidate path under the kind's media directory that exists.
    pub fn find_source(&self, kind: ClipKind, tag: SeasonEpisode) -> Option<PathBuf> {
        let source = self.config.source(kind);
        let template = EpisodeTemplate::new(tag);
        template
            .substitute_all(&source.candidates)
            .into_iter()
            .map(|relative| source.media_dir.join(relative))
            .find(|candidate| candidate.is_file())
    }

    /// `s01e05_20240131_154502.mp3`
    pub fn output_name(&self, kind: ClipKind, tag: SeasonEpisode) -> String {
        format!(
            "s{:02}e{:02}_{}.{}",
            tag.season,
            tag.episode,
            Local::now().format("%Y%m%d_%H%M%S"),
            self.config.source(kind).extension
        )
    }

    /// Public URL for a clip file name, e.g. `/temp_audio/s01e05_....mp3`.
    pub fn url_for(&self, kind: ClipKind, file_name: &str) -> String {
        let prefix = self.config.source(kind).url_prefix.trim_matches('/');
        format!("/{prefix}/{file_name}")
    }

    /// Remove clips of `kind` older than the configured age.
    pub fn cleanup_expired(&self, kind: ClipKind) -> usize {
        let source = self.config.source(kind);
        let max_age = Duration::from_secs(self.config.cleanup_after_hours.saturating_mul(3600));
        let removed = cleanup::cleanup_older_than(&source.temp_dir, &source.extension, max_age);
        if removed > 0 {
            tracing::info!(%kind, removed, "Removed expired clips");
        }
        removed
    }

    /// Cut a clip of `kind` for the dialogue spanning `start`..`end`.
    ///
    /// Fails only on malformed timestamps or when the output directory
    /// cannot be created.
    pub async fn extract(
        &self,
        kind: ClipKind,
        tag: SeasonEpisode,
        start: &str,
        end: &str,
    ) -> Result<Option<ClipOutput>> {
        let window = ClipWindow::around(start, end, self.config.padding_secs)?;
        let source_cfg = self.config.source(kind);

        let Some(source) = self.find_source(kind, tag) else {
            tracing::info!(%kind, %tag, dir = %source_cfg.media_dir.display(), "No source media for episode");
            return Ok(None);
        };

        let ffmpeg = match self.tools.require("ffmpeg") {
            Ok(path) => path.to_path_buf(),
            Err(e) => {
                tracing::warn!(%kind, error = %e, "Cannot extract clip");
                return Ok(None);
            }
        };

        tokio::fs::create_dir_all(&source_cfg.temp_dir).await?;
        let file_name = self.output_name(kind, tag);
        let output = source_cfg.temp_dir.join(&file_name);

        let result = ToolCommand::new(ffmpeg)
            .args(ffmpeg_args(kind, &source, &output, window))
            .timeout(Duration::from_secs(source_cfg.timeout_secs))
            .execute()
            .await;

        if let Err(e) = result {
            tracing::warn!(%kind, %tag, error = %e, "ffmpeg failed to cut clip");
            return Ok(None);
        }
        if !output.is_file() {
            tracing::warn!(%kind, file = %output.display(), "ffmpeg reported success but wrote no clip");
            return Ok(None);
        }

        let pruned = prune(source_cfg, self.config.max_files);
        tracing::info!(
            %kind,
            %tag,
            start = %timecode::format_hms(window.start),
            duration_secs = window.duration,
            file = %file_name,
            pruned,
            "Clip extracted"
        );

        Ok(Some(ClipOutput {
            url: self.url_for(kind, &file_name),
            path: output,
        }))
    }
}

fn prune(source: &ClipSourceConfig, max_files: usize) -> usize {
    cleanup::limit_file_count(&source.temp_dir, &source.extension, max_files)
}

/// ffmpeg arguments for cutting `window` out of `source` into `output`.
///
/// Audio is stream-copied. Video is re-encoded to baseline H.264 with AAC
/// stereo so that browsers can play it inline.
pub fn ffmpeg_args(kind: ClipKind, source: &Path, output: &Path, window: ClipWindow) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-i".into(),
        source.to_string_lossy().into_owned(),
        "-ss".into(),
        format!("{:.3}", window.start),
        "-t".into(),
        format!("{:.3}", window.duration),
    ];

    let codec: &[&str] = match kind {
        ClipKind::Audio => &["-acodec", "copy"],
        ClipKind::Video => &[
            "-c:v", "libx264", "-profile:v", "baseline", "-level", "3.0", "-preset", "fast",
            "-c:a", "aac", "-ar", "48000", "-b:a", "192k", "-ac", "2",
            "-movflags", "+faststart",
        ],
    };
    args.extend(codec.iter().map(|s| s.to_string()));

    args.push("-y".into());
    args.push(output.to_string_lossy().into_owned());
    args
}
