use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytmp3")]
#[command(author, version, about = "Download audio from YouTube videos or playlists as MP3")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube video or playlist URL to download audio from
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Output filename (single videos only, default: video title)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Output directory (default: downloads)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Download the entire playlist (auto-detected if the URL has a playlist marker)
    #[arg(long)]
    pub playlist: bool,

    /// Maximum number of videos to download from a playlist
    #[arg(long, value_name = "N")]
    pub max_videos: Option<usize>,

    /// Delay between playlist downloads in seconds (default: 1.0)
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check external dependencies (yt-dlp, ffmpeg)
    Doctor,

    /// Show effective configuration
    Config,
}
