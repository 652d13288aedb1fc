//! Error types for ytmp3-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, YtMp3Error>;

#[derive(Error, Debug)]
pub enum YtMp3Error {
    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Playlist failed: {0}")]
    Playlist(#[from] PlaylistError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-item fetch failures. Inside a batch run these are recorded in the
/// summary and never abort the loop.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp not found. Install with: brew install yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Audio conversion failed: {0}")]
    Conversion(String),

    #[error("No MP3 produced for {0}")]
    NoAudioFile(String),

    #[error("Failed to parse metadata: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Playlist-level failures. These abort the batch run before any item is
/// attempted.
#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("yt-dlp not found. Install with: brew install yt-dlp")]
    YtDlpNotFound,

    #[error("Playlist unavailable: {0}")]
    Unavailable(String),

    #[error("Not a playlist URL: {0}")]
    NotAPlaylist(String),

    #[error("Playlist contains no downloadable entries")]
    Empty,

    #[error("Failed to parse playlist metadata: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
