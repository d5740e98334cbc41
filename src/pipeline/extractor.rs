use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::process::Command;

use crate::config::Config;

static WATCH_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[?&]v=([A-Za-z0-9_-]{11})").expect("watch id pattern is valid")
});
static SHORT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtu\.be/|embed/)([A-Za-z0-9_-]{11})").expect("short id pattern is valid")
});

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported media source: {0}")]
    UnsupportedSource(String),

    #[error("network failure fetching media after {attempts} attempts: {reason}")]
    Network { attempts: u32, reason: String },

    #[error("media extraction failed: {0}")]
    Extraction(String),
}

/// Extract the 11-character video id from the common YouTube URL forms
/// (`watch?v=`, `youtu.be/`, `embed/`). Playlists, channels and every other
/// source are rejected.
pub fn extract_video_id(url: &str) -> Result<String, ExtractError> {
    if url.is_empty() || (!url.contains("youtube") && !url.contains("youtu.be")) {
        return Err(ExtractError::UnsupportedSource(url.to_string()));
    }

    if url.contains("list=") || url.contains("/playlist") || url.contains("/channel/") {
        return Err(ExtractError::UnsupportedSource(
            "playlists and channels are not supported".to_string(),
        ));
    }

    if let Some(caps) = WATCH_ID_RE.captures(url) {
        return Ok(caps[1].to_string());
    }
    if let Some(caps) = SHORT_ID_RE.captures(url) {
        return Ok(caps[1].to_string());
    }

    Err(ExtractError::UnsupportedSource(
        "could not extract a video id".to_string(),
    ))
}

pub fn canonical_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Temporary audio file downloaded for one pipeline run. The file is removed
/// when the artifact is dropped, on every exit path including cancellation.
#[derive(Debug)]
pub struct AudioArtifact {
    path: PathBuf,
    pub duration_secs: u64,
}

impl AudioArtifact {
    pub fn new(path: PathBuf, duration_secs: u64) -> Self {
        Self {
            path,
            duration_secs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove audio artifact {:?}: {}", self.path, e);
            }
        }
    }
}

#[async_trait]
pub trait MediaExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<AudioArtifact, ExtractError>;
}

/// Fetches the audio track of a single video with the `yt-dlp` binary.
pub struct YtDlpExtractor {
    tmp_dir: PathBuf,
    max_attempts: u32,
    backoff_base: Duration,
}

impl YtDlpExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            tmp_dir: config.media_tmp_dir.clone(),
            max_attempts: config.upstream_retry_attempts.max(1),
            backoff_base: Duration::from_secs(1),
        }
    }

    fn is_transient(stderr: &str) -> bool {
        let stderr = stderr.to_lowercase();
        ["timed out", "timeout", "connection", "temporary failure", "network", "http error 5"]
            .iter()
            .any(|needle| stderr.contains(needle))
    }

    fn is_unavailable(stderr: &str) -> bool {
        let stderr = stderr.to_lowercase();
        ["private video", "video unavailable", "removed", "blocked", "not a valid url", "age-restricted"]
            .iter()
            .any(|needle| stderr.contains(needle))
    }

    async fn run_yt_dlp(args: &[&str]) -> Result<std::process::Output, ExtractError> {
        Command::new("yt-dlp")
            .args(args)
            .output()
            .await
            .map_err(|e| ExtractError::Extraction(format!("failed to run yt-dlp: {}", e)))
    }

    /// Query the video duration without downloading; also serves as the
    /// availability check.
    async fn probe_duration(&self, url: &str) -> Result<u64, ExtractError> {
        let output = Self::run_yt_dlp(&[
            "--no-playlist",
            "--skip-download",
            "--print",
            "duration",
            url,
        ])
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ExtractError::Extraction(format!(
                "video unavailable or invalid: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<f64>()
            .map(|secs| secs.round() as u64)
            .map_err(|_| {
                ExtractError::Extraction("could not determine media duration".to_string())
            })
    }

    async fn download_once(&self, url: &str, video_id: &str) -> Result<PathBuf, (bool, String)> {
        let output_template = self.tmp_dir.join(format!("{}.%(ext)s", video_id));

        let output = Command::new("yt-dlp")
            .arg(url)
            .arg("--no-playlist")
            .arg("-f")
            .arg("bestaudio/best")
            .arg("--print")
            .arg("after_move:filepath")
            .arg("-o")
            .arg(&output_template)
            .output()
            .await
            .map_err(|e| (false, format!("failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let transient = Self::is_transient(&stderr) && !Self::is_unavailable(&stderr);
            return Err((transient, stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let filepath = stdout.trim();
        if filepath.is_empty() {
            return Err((false, "yt-dlp produced no output file".to_string()));
        }

        Ok(PathBuf::from(filepath))
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str) -> Result<AudioArtifact, ExtractError> {
        let video_id = extract_video_id(url)?;
        let canonical = canonical_watch_url(&video_id);

        let duration_secs = self.probe_duration(&canonical).await?;

        let mut last_reason = String::new();
        for attempt in 1..=self.max_attempts {
            match self.download_once(&canonical, &video_id).await {
                Ok(path) => {
                    log::info!("Downloaded audio for {} to {:?}", video_id, path);
                    return Ok(AudioArtifact::new(path, duration_secs));
                }
                Err((transient, reason)) => {
                    if !transient {
                        return Err(ExtractError::Extraction(reason));
                    }
                    log::warn!(
                        "Transient media fetch failure for {} (attempt {}/{}): {}",
                        video_id,
                        attempt,
                        self.max_attempts,
                        reason
                    );
                    last_reason = reason;
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.backoff_base * 2u32.pow(attempt - 1)).await;
                    }
                }
            }
        }

        Err(ExtractError::Network {
            attempts: self.max_attempts,
            reason: last_reason,
        })
    }
}
