//! Sequential playlist batch downloads
//!
//! One batch run enumerates a playlist once, fetches each item in order, and
//! records a per-item outcome. Item failures are captured in the summary and
//! never abort the loop; only playlist resolution and output-directory setup
//! are fatal.

use crate::error::{DownloadError, PlaylistError, YtMp3Error};
use crate::fetcher::Fetcher;
use crate::naming::sanitize_filename;
use crate::playlist::{PlaylistInfo, PlaylistItem, PlaylistResolver};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The external fetch-and-convert collaborator, abstracted so batch control
/// flow can be exercised without network access.
#[allow(async_fn_in_trait)]
pub trait AudioSource {
    async fn resolve_playlist(&self, url: &str) -> Result<PlaylistInfo, PlaylistError>;

    async fn fetch_item(
        &self,
        item: &PlaylistItem,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError>;
}

/// yt-dlp backed implementation of [`AudioSource`]
#[derive(Debug)]
pub struct YtDlpSource {
    fetcher: Fetcher,
    resolver: PlaylistResolver,
}

impl YtDlpSource {
    pub fn new(fetcher: Fetcher, resolver: PlaylistResolver) -> Self {
        Self { fetcher, resolver }
    }
}

impl AudioSource for YtDlpSource {
    async fn resolve_playlist(&self, url: &str) -> Result<PlaylistInfo, PlaylistError> {
        self.resolver.resolve(url).await
    }

    async fn fetch_item(
        &self,
        item: &PlaylistItem,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let fetched = self.fetcher.fetch(&item.url, dest_dir, None).await?;
        Ok(fetched.path)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory the playlist subdirectory is created under
    pub output_dir: PathBuf,
    /// Process at most this many items, in playlist order
    pub max_items: Option<usize>,
    /// Pause between successive items, never applied after the last
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub enum DownloadStatus {
    Succeeded { path: PathBuf },
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub item: PlaylistItem,
    pub status: DownloadStatus,
}

impl DownloadOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, DownloadStatus::Succeeded { .. })
    }
}

/// Final accounting for one batch run. Counts are derived from the outcome
/// sequence, so `succeeded() + failed() == attempted()` always holds.
#[derive(Debug)]
pub struct PlaylistRunSummary {
    pub playlist_title: String,
    pub output_dir: PathBuf,
    pub outcomes: Vec<DownloadOutcome>,
}

impl PlaylistRunSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}

/// Batch progress events, rendered by the caller
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Resolved {
        title: String,
        total: usize,
        attempting: usize,
    },
    ItemStarted {
        index: usize,
        attempting: usize,
        title: String,
        url: String,
    },
    ItemSucceeded {
        index: usize,
        path: PathBuf,
    },
    ItemFailed {
        index: usize,
        reason: String,
    },
    Throttling {
        delay: Duration,
    },
}

pub struct BatchDownloader<S> {
    source: S,
    options: BatchOptions,
    progress_tx: mpsc::Sender<BatchEvent>,
}

impl<S: AudioSource> BatchDownloader<S> {
    pub fn new(source: S, options: BatchOptions, progress_tx: mpsc::Sender<BatchEvent>) -> Self {
        Self {
            source,
            options,
            progress_tx,
        }
    }

    /// Run one batch over the playlist behind `playlist_url`.
    ///
    /// Fails fast (before any directory is created) when the playlist itself
    /// cannot be enumerated; per-item failures only show up in the summary.
    pub async fn run(&self, playlist_url: &str) -> Result<PlaylistRunSummary, YtMp3Error> {
        let playlist = self.source.resolve_playlist(playlist_url).await?;

        let total = playlist.items.len();
        let mut items = playlist.items;
        if let Some(max) = self.options.max_items {
            items.truncate(max);
        }
        let attempting = items.len();

        let _ = self
            .progress_tx
            .send(BatchEvent::Resolved {
                title: playlist.title.clone(),
                total,
                attempting,
            })
            .await;

        let playlist_dir = self
            .options
            .output_dir
            .join(sanitize_filename(&playlist.title));
        tokio::fs::create_dir_all(&playlist_dir).await?;

        info!(
            "Downloading {}/{} items of '{}' to {}",
            attempting,
            total,
            playlist.title,
            playlist_dir.display()
        );

        let mut outcomes = Vec::with_capacity(attempting);

        for (idx, item) in items.into_iter().enumerate() {
            let index = idx + 1;

            let _ = self
                .progress_tx
                .send(BatchEvent::ItemStarted {
                    index,
                    attempting,
                    title: item.title.clone(),
                    url: item.url.clone(),
                })
                .await;

            let status = match self.source.fetch_item(&item, &playlist_dir).await {
                Ok(path) => {
                    info!("[{}/{}] done: {}", index, attempting, path.display());
                    let _ = self
                        .progress_tx
                        .send(BatchEvent::ItemSucceeded {
                            index,
                            path: path.clone(),
                        })
                        .await;
                    DownloadStatus::Succeeded { path }
                }
                Err(e) => {
                    // A single bad item must never abort the batch
                    warn!("[{}/{}] failed: {}: {}", index, attempting, item.title, e);
                    let reason = e.to_string();
                    let _ = self
                        .progress_tx
                        .send(BatchEvent::ItemFailed {
                            index,
                            reason: reason.clone(),
                        })
                        .await;
                    DownloadStatus::Failed { reason }
                }
            };

            outcomes.push(DownloadOutcome { item, status });

            if index < attempting && !self.options.delay.is_zero() {
                let _ = self
                    .progress_tx
                    .send(BatchEvent::Throttling {
                        delay: self.options.delay,
                    })
                    .await;
                tokio::time::sleep(self.options.delay).await;
            }
        }

        Ok(PlaylistRunSummary {
            playlist_title: playlist.title,
            output_dir: playlist_dir,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct MockSource {
        title: String,
        item_count: usize,
        /// ordinals whose fetch should fail
        failing: Vec<usize>,
        unavailable: bool,
        fetched: Mutex<Vec<usize>>,
    }

    impl MockSource {
        fn new(item_count: usize) -> Self {
            Self {
                title: "Test Playlist".to_string(),
                item_count,
                failing: Vec::new(),
                unavailable: false,
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, ordinals: &[usize]) -> Self {
            self.failing = ordinals.to_vec();
            self
        }

        fn unavailable(mut self) -> Self {
            self.unavailable = true;
            self
        }
    }

    impl AudioSource for MockSource {
        async fn resolve_playlist(&self, url: &str) -> Result<PlaylistInfo, PlaylistError> {
            if self.unavailable {
                return Err(PlaylistError::Unavailable(url.to_string()));
            }
            let items = (1..=self.item_count)
                .map(|n| PlaylistItem {
                    url: format!("https://www.youtube.com/watch?v=video{:07}", n),
                    id: format!("video{:07}", n),
                    title: format!("Track {}", n),
                    ordinal: n,
                })
                .collect();
            Ok(PlaylistInfo {
                title: self.title.clone(),
                uploader: None,
                items,
            })
        }

        async fn fetch_item(
            &self,
            item: &PlaylistItem,
            dest_dir: &Path,
        ) -> Result<PathBuf, DownloadError> {
            self.fetched.lock().unwrap().push(item.ordinal);
            if self.failing.contains(&item.ordinal) {
                return Err(DownloadError::VideoUnavailable(item.url.clone()));
            }
            let path = dest_dir.join(format!("{}.mp3", sanitize_filename(&item.title)));
            std::fs::write(&path, b"mp3")?;
            Ok(path)
        }
    }

    fn options(output_dir: PathBuf) -> BatchOptions {
        BatchOptions {
            output_dir,
            max_items: None,
            delay: Duration::ZERO,
        }
    }

    fn drained_channel() -> mpsc::Sender<BatchEvent> {
        let (tx, mut rx) = mpsc::channel(64);
        tokio::spawn(async move { while rx.recv().await.is_some() {} });
        tx
    }

    #[tokio::test]
    async fn test_attempts_all_items_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = BatchDownloader::new(
            MockSource::new(4),
            options(dir.path().to_path_buf()),
            drained_channel(),
        );

        let summary = downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();

        assert_eq!(summary.attempted(), 4);
        assert_eq!(summary.succeeded(), 4);
        assert_eq!(summary.failed(), 0);
        let ordinals: Vec<_> = summary.outcomes.iter().map(|o| o.item.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_max_items_truncates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path().to_path_buf());
        opts.max_items = Some(3);
        let downloader = BatchDownloader::new(MockSource::new(5), opts, drained_channel());

        let summary = downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();

        assert_eq!(summary.attempted(), 3);
        let ordinals: Vec<_> = summary.outcomes.iter().map(|o| o.item.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_max_items_above_playlist_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path().to_path_buf());
        opts.max_items = Some(10);
        let downloader = BatchDownloader::new(MockSource::new(2), opts, drained_channel());

        let summary = downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();
        assert_eq!(summary.attempted(), 2);
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = MockSource::new(5).failing(&[2]);
        let downloader =
            BatchDownloader::new(source, options(dir.path().to_path_buf()), drained_channel());

        let summary = downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();

        assert_eq!(summary.attempted(), 5);
        assert_eq!(summary.succeeded(), 4);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.succeeded() + summary.failed(), summary.attempted());

        assert!(!summary.outcomes[1].succeeded());
        match &summary.outcomes[1].status {
            DownloadStatus::Failed { reason } => {
                assert!(reason.contains("unavailable"), "reason: {}", reason)
            }
            other => panic!("expected failure, got {:?}", other),
        }
        // Items after the failure were still attempted
        assert!(summary.outcomes[2..].iter().all(|o| o.succeeded()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applied_between_items_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path().to_path_buf());
        opts.delay = Duration::from_secs(2);
        let downloader = BatchDownloader::new(MockSource::new(3), opts, drained_channel());

        let start = tokio::time::Instant::now();
        let summary = downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(summary.attempted(), 3);
        // Two inter-item gaps, no delay after the last item
        assert!(elapsed >= Duration::from_secs(4), "elapsed: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(6), "elapsed: {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_unavailable_playlist_creates_no_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("out");
        let source = MockSource::new(3).unavailable();
        let downloader = BatchDownloader::new(source, options(output_dir.clone()), drained_channel());

        let err = downloader
            .run("https://www.youtube.com/playlist?list=PLbad")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            YtMp3Error::Playlist(PlaylistError::Unavailable(_))
        ));
        assert!(!output_dir.exists());
    }

    #[tokio::test]
    async fn test_rerun_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().to_path_buf());

        for _ in 0..2 {
            let downloader =
                BatchDownloader::new(MockSource::new(3), opts.clone(), drained_channel());
            let summary = downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();
            assert_eq!(summary.succeeded(), 3);
        }

        let playlist_dir = dir.path().join("Test Playlist");
        assert!(playlist_dir.is_dir());
        assert_eq!(std::fs::read_dir(&playlist_dir).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_events_report_progress() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::channel(64);
        let source = MockSource::new(2).failing(&[2]);
        let downloader = BatchDownloader::new(source, options(dir.path().to_path_buf()), tx);

        downloader.run("https://www.youtube.com/playlist?list=PL1").await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert!(matches!(
            events[0],
            BatchEvent::Resolved {
                total: 2,
                attempting: 2,
                ..
            }
        ));
        assert!(events
            .iter()
            .any(|e| matches!(e, BatchEvent::ItemSucceeded { index: 1, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, BatchEvent::ItemFailed { index: 2, .. })));
    }
}
