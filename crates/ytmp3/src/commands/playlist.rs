use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;
use ytmp3_core::{
    batch::{BatchDownloader, BatchEvent, BatchOptions, DownloadStatus, YtDlpSource},
    config::Config,
    fetcher::Fetcher,
    playlist::PlaylistResolver,
};

use crate::args::Cli;

pub async fn run(url: &str, cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if cli.output.is_some() {
        eprintln!("Warning: --output is ignored for playlists");
    }

    let max_items = cli.max_videos.or(config.playlist.max_items);
    if max_items == Some(0) {
        bail!("--max-videos must be at least 1");
    }

    let delay_secs = cli.delay.unwrap_or(config.playlist.delay_secs);
    if delay_secs < 0.0 {
        bail!("--delay must be non-negative");
    }

    debug!("Batch delay: {:.1}s, max items: {:?}", delay_secs, max_items);

    let options = BatchOptions {
        output_dir: cli
            .directory
            .clone()
            .unwrap_or_else(|| config.output.directory.clone()),
        max_items,
        delay: Duration::from_secs_f64(delay_secs),
    };

    let yt_dlp_path = config.yt_dlp_path()?;
    let source = YtDlpSource::new(
        Fetcher::new(
            yt_dlp_path.clone(),
            config.ffmpeg_path()?,
            config.output.bitrate_kbps,
        ),
        PlaylistResolver::new(yt_dlp_path),
    );

    // Render batch progress events while the run is in flight
    let (tx, mut rx) = mpsc::channel(32);
    let progress_handle = tokio::spawn(async move {
        let mut pb: Option<ProgressBar> = None;
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::Resolved {
                    title,
                    total,
                    attempting,
                } => {
                    println!("Playlist: {}", title);
                    if attempting < total {
                        println!("Limiting download to first {} of {} videos", attempting, total);
                    } else {
                        println!("Total videos: {}", total);
                    }
                    let bar = ProgressBar::new(attempting as u64);
                    bar.set_style(
                        ProgressStyle::with_template(
                            "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                        )
                        .unwrap()
                        .progress_chars("=>-"),
                    );
                    bar.enable_steady_tick(Duration::from_millis(100));
                    pb = Some(bar);
                }
                BatchEvent::ItemStarted {
                    index,
                    attempting,
                    title,
                    ..
                } => {
                    if let Some(pb) = &pb {
                        pb.set_message(format!(
                            "[{}/{}] {}",
                            index,
                            attempting,
                            truncate(&title, 40)
                        ));
                    }
                }
                BatchEvent::ItemSucceeded { path, .. } => {
                    if let Some(pb) = &pb {
                        pb.println(format!(
                            "Done: {}",
                            path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                        pb.inc(1);
                    }
                }
                BatchEvent::ItemFailed { reason, .. } => {
                    if let Some(pb) = &pb {
                        pb.println(format!("Failed: {}", reason));
                        pb.inc(1);
                    }
                }
                BatchEvent::Throttling { delay } => {
                    if let Some(pb) = &pb {
                        pb.set_message(format!("Waiting {:.1}s...", delay.as_secs_f64()));
                    }
                }
            }
        }
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
    });

    let downloader = BatchDownloader::new(source, options, tx);
    let result = downloader.run(url).await;

    // The downloader holds the last sender; drop it so the renderer exits
    drop(downloader);
    progress_handle.await?;

    // Item failures are part of the summary; only playlist-level and
    // filesystem-setup errors exit non-zero.
    let summary = result?;

    println!("\nPlaylist download completed!");
    println!(
        "Successfully downloaded: {}/{} videos",
        summary.succeeded(),
        summary.attempted()
    );
    if summary.failed() > 0 {
        println!("Failed downloads: {}", summary.failed());
        for outcome in &summary.outcomes {
            if let DownloadStatus::Failed { reason } = &outcome.status {
                println!("  {} - {}", outcome.item.title, reason);
            }
        }
    }
    println!("Files saved to: {}", summary.output_dir.display());

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
