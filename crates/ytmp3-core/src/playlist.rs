//! Playlist enumeration via yt-dlp's flat-playlist mode

use crate::error::PlaylistError;
use crate::url::is_playlist_url;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// One downloadable entry of a playlist, immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct PlaylistItem {
    pub url: String,
    pub id: String,
    pub title: String,
    /// 1-based position within the playlist
    pub ordinal: usize,
}

#[derive(Debug, Clone)]
pub struct PlaylistInfo {
    pub title: String,
    pub uploader: Option<String>,
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug)]
pub struct PlaylistResolver {
    yt_dlp_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl PlaylistResolver {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self { yt_dlp_path }
    }

    /// Enumerate a playlist's items without downloading anything
    pub async fn resolve(&self, url: &str) -> Result<PlaylistInfo, PlaylistError> {
        if !is_playlist_url(url) {
            return Err(PlaylistError::NotAPlaylist(url.to_string()));
        }

        info!("Resolving playlist: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["-J", "--flat-playlist", "--skip-download", "--no-warnings", url])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("yt-dlp failed")
                .trim()
                .to_string();
            return Err(PlaylistError::Unavailable(reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = parse_playlist_json(&stdout)?;

        info!("Playlist: {} ({} items)", info.title, info.items.len());
        Ok(info)
    }
}

/// Parse yt-dlp's `-J --flat-playlist` document. Entries without an ID
/// (private or deleted videos) are skipped; ordinals count only the items
/// that remain.
fn parse_playlist_json(json: &str) -> Result<PlaylistInfo, PlaylistError> {
    let raw: RawPlaylist =
        serde_json::from_str(json).map_err(|e| PlaylistError::MetadataParse(e.to_string()))?;

    let items: Vec<PlaylistItem> = raw
        .entries
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id?;
            if id.is_empty() {
                return None;
            }
            Some((id, entry.title))
        })
        .enumerate()
        .map(|(idx, (id, title))| PlaylistItem {
            url: format!("https://www.youtube.com/watch?v={}", id),
            title: title.unwrap_or_else(|| "Unknown Title".to_string()),
            id,
            ordinal: idx + 1,
        })
        .collect();

    if items.is_empty() {
        return Err(PlaylistError::Empty);
    }

    Ok(PlaylistInfo {
        title: raw.title.unwrap_or_else(|| "Unknown Playlist".to_string()),
        uploader: raw.uploader,
        items,
    })
}
