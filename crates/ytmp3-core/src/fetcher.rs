//! Audio fetch and MP3 conversion via yt-dlp
//!
//! Download and transcoding are owned entirely by the external yt-dlp and
//! ffmpeg binaries; this module only builds the invocation, classifies
//! failures, and moves the finished MP3 into place.

use crate::error::DownloadError;
use crate::naming::sanitize_filename;
use crate::url::is_youtube_url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Fetcher {
    yt_dlp_path: PathBuf,
    ffmpeg_path: PathBuf,
    bitrate_kbps: u32,
}

#[derive(Debug)]
pub struct FetchedAudio {
    pub path: PathBuf,
    pub metadata: VideoMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub upload_date: Option<String>,
}

impl Fetcher {
    pub fn new(yt_dlp_path: PathBuf, ffmpeg_path: PathBuf, bitrate_kbps: u32) -> Self {
        Self {
            yt_dlp_path,
            ffmpeg_path,
            bitrate_kbps,
        }
    }

    /// Get video metadata without downloading
    pub async fn probe(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        if !is_youtube_url(url) {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        let output = Command::new(&self.yt_dlp_path)
            .args(["-J", "--skip-download", "--no-playlist", "--no-warnings", url])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_stderr(&stderr, url, output.status.code()));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::MetadataParse(e.to_string()))
    }

    /// Download audio from a YouTube URL and convert it to MP3 under
    /// `dest_dir`. The file is named from the video title unless
    /// `filename` overrides it. Pre-existing files are overwritten.
    pub async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        filename: Option<&str>,
    ) -> Result<FetchedAudio, DownloadError> {
        if !is_youtube_url(url) {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        info!("Downloading audio from: {}", url);

        // Stage into a temp directory, move into place once complete
        let staging = tempfile::tempdir()?;
        let output_template = staging.path().join("%(id)s.%(ext)s");
        let quality = format!("{}K", self.bitrate_kbps);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                // Best available audio stream
                "-f",
                "bestaudio/best",
                // Hand conversion to ffmpeg's MP3 encoder
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                quality.as_str(),
            ])
            .arg("--ffmpeg-location")
            .arg(&self.ffmpeg_path)
            .args([
                "--no-playlist",
                "--no-warnings",
                // Keep stdout parseable: JSON only, no progress lines
                "--no-progress",
                "--print-json",
                "-o",
            ])
            .arg(&output_template)
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_stderr(&stderr, url, output.status.code()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // --print-json emits the metadata document as the last stdout line
        let json_line = stdout
            .lines()
            .rev()
            .find(|l| l.trim_start().starts_with('{'))
            .ok_or_else(|| DownloadError::MetadataParse("no JSON in yt-dlp output".to_string()))?;
        let metadata: VideoMetadata = serde_json::from_str(json_line)
            .map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

        debug!("Downloaded: {} ({})", metadata.title, metadata.id);

        let staged_mp3 = staging.path().join(format!("{}.mp3", metadata.id));
        if !staged_mp3.exists() {
            return Err(DownloadError::NoAudioFile(url.to_string()));
        }

        let final_name = match filename {
            Some(name) => {
                let base = name.strip_suffix(".mp3").unwrap_or(name);
                format!("{}.mp3", sanitize_filename(base))
            }
            None => format!("{}.mp3", sanitize_filename(&metadata.title)),
        };

        tokio::fs::create_dir_all(dest_dir).await?;
        let final_path = dest_dir.join(&final_name);
        // copy instead of rename: staging may sit on a different filesystem
        tokio::fs::copy(&staged_mp3, &final_path).await?;

        info!("Saved: {}", final_path.display());

        Ok(FetchedAudio {
            path: final_path,
            metadata,
        })
    }
}

/// Map yt-dlp stderr output to a typed failure reason
fn classify_stderr(stderr: &str, url: &str, exit_code: Option<i32>) -> DownloadError {
    let lowered = stderr.to_lowercase();
    let last_line = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("yt-dlp failed")
        .trim()
        .to_string();

    if lowered.contains("video unavailable")
        || lowered.contains("private video")
        || lowered.contains("this video is not available")
        || lowered.contains("members-only")
    {
        return DownloadError::VideoUnavailable(url.to_string());
    }
    if lowered.contains("is not a valid url") || lowered.contains("unsupported url") {
        return DownloadError::InvalidUrl(url.to_string());
    }
    if lowered.contains("urlopen error")
        || lowered.contains("unable to download")
        || lowered.contains("timed out")
        || lowered.contains("getaddrinfo")
        || lowered.contains("connection re")
        || lowered.contains("temporary failure in name resolution")
    {
        return DownloadError::Network(last_line);
    }
    if lowered.contains("postprocessing") || lowered.contains("ffmpeg") {
        return DownloadError::Conversion(last_line);
    }

    DownloadError::YtDlpFailed(exit_code)
}
