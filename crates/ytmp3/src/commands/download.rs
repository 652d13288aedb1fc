use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;
use ytmp3_core::{config::Config, fetcher::Fetcher};

use crate::args::Cli;

pub async fn run(url: &str, cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if cli.max_videos.is_some() {
        eprintln!("Warning: --max-videos is ignored for single videos");
    }
    if cli.delay.is_some() {
        eprintln!("Warning: --delay is ignored for single videos");
    }

    let output_dir = cli
        .directory
        .clone()
        .unwrap_or_else(|| config.output.directory.clone());
    debug!("Output directory: {}", output_dir.display());

    let fetcher = Fetcher::new(
        config.yt_dlp_path()?,
        config.ffmpeg_path()?,
        config.output.bitrate_kbps,
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")?
            .tick_chars("=>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Fetching video info...");

    let info = fetcher.probe(url).await?;
    pb.set_message(format!("Downloading: {}", truncate(&info.title, 50)));
    if let Some(ref uploader) = info.uploader {
        pb.println(format!("Uploader: {}", uploader));
    }

    let result = fetcher.fetch(url, &output_dir, cli.output.as_deref()).await;
    match result {
        Ok(fetched) => {
            pb.finish_and_clear();
            println!("Download completed successfully!");
            println!("File saved to: {}", fetched.path.display());
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message(format!("Failed: {}", e));
            Err(e.into())
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
