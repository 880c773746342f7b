//! The periodic directory poller.
//!
//! A [`FileSource`] owns a watched directory, a filter chain, a fixed poll
//! period and an output channel. Once per period it re-lists the whole
//! directory (scan-each-poll: a full fresh listing every time, not a delta),
//! runs each regular file through the chain, and publishes one message per
//! accepted entry.
//!
//! Scans are serialized per source by construction: one task owns the timer
//! and awaits each scan to completion, and the interval's delay behavior
//! pushes the next tick out rather than bursting, so a scan that outlives
//! the period can never overlap the next one.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use weft_core::{Channel, Message};

use crate::entry::FileEntry;
use crate::error::{SourceError, SourceResult};
use crate::filter::{AcceptOnceFilter, FilterChain, PatternFilter};

const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(5);

/// A polling message source over a filesystem directory.
///
/// # Example
///
/// ```rust,ignore
/// let source = FileSource::builder()
///     .directory("data")
///     .pattern("*.txt")
///     .period(Duration::from_secs(5))
///     .output(Arc::clone(&file_channel))
///     .build()?;
///
/// tokio::spawn(source.run(shutdown.child_token()));
/// ```
pub struct FileSource {
    directory: PathBuf,
    chain: FilterChain,
    period: Duration,
    output: Arc<Channel<FileEntry>>,
}

impl FileSource {
    /// Creates a builder.
    pub fn builder() -> FileSourceBuilder {
        FileSourceBuilder::new()
    }

    /// The watched directory.
    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    /// The poll period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs the poll loop until `shutdown` is cancelled.
    ///
    /// Scan failures (missing or unreadable directory) are logged and
    /// retried on the next period.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            directory = %self.directory.display(),
            period = ?self.period,
            channel = self.output.name(),
            "file source started"
        );

        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(directory = %self.directory.display(), "file source stopped");
                    break;
                }
                _ = ticker.tick() => {
                    match self.scan_once().await {
                        Ok(0) => {}
                        Ok(published) => {
                            debug!(
                                directory = %self.directory.display(),
                                published,
                                "scan published new files"
                            );
                        }
                        Err(e) => {
                            warn!(
                                directory = %self.directory.display(),
                                error = %e,
                                "scan failed, retrying next period"
                            );
                        }
                    }
                }
            }
        }
    }

    /// Performs one full scan of the directory.
    ///
    /// Every regular file goes through the filter chain; each accepted entry
    /// is published as one message (empty headers) on the output channel, in
    /// listing order. A handler failure for one entry is logged and does not
    /// abort delivery of the scan's remaining entries, and it does not
    /// un-record the entry's accept-once identity, so the failed file is not
    /// reprocessed later.
    ///
    /// Returns the number of messages delivered without error.
    ///
    /// # Errors
    ///
    /// [`SourceError::Unavailable`] if the directory cannot be listed.
    pub async fn scan_once(&self) -> SourceResult<usize> {
        let unavailable = |e: std::io::Error| SourceError::Unavailable {
            directory: self.directory.display().to_string(),
            reason: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(unavailable)?;

        let mut delivered = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            let candidate = FileEntry::new(entry.path());
            if !self.chain.accept(&candidate) {
                trace!(file = %candidate.file_name(), "entry rejected by filter chain");
                continue;
            }

            let file = candidate.file_name().into_owned();
            if let Err(e) = self.output.publish(Message::new(candidate)).await {
                error!(
                    channel = self.output.name(),
                    file = %file,
                    error = %e,
                    "handler failed for polled file, continuing scan"
                );
                continue;
            }
            delivered += 1;
        }

        Ok(delivered)
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("directory", &self.directory)
            .field("period", &self.period)
            .field("channel", &self.output.name())
            .finish()
    }
}

// =============================================================================
// FileSourceBuilder
// =============================================================================

/// Builder for a [`FileSource`].
///
/// The assembled filter chain is: pattern filter (when a pattern is set),
/// then the accept-once filter (on by default), then any custom filters in
/// the order they were added.
pub struct FileSourceBuilder {
    directory: Option<PathBuf>,
    pattern: Option<String>,
    accept_once: bool,
    extra_filters: FilterChain,
    period: Duration,
    output: Option<Arc<Channel<FileEntry>>>,
}

impl FileSourceBuilder {
    fn new() -> Self {
        Self {
            directory: None,
            pattern: None,
            accept_once: true,
            extra_filters: FilterChain::new(),
            period: DEFAULT_POLL_PERIOD,
            output: None,
        }
    }

    /// Sets the directory to watch. Required.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets a glob pattern the file name must match (e.g. `*.txt`).
    ///
    /// The pattern is validated by [`build`](Self::build).
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Enables or disables process-lifetime dedup (enabled by default).
    pub fn accept_once(mut self, enabled: bool) -> Self {
        self.accept_once = enabled;
        self
    }

    /// Appends a custom filter after the built-in ones.
    pub fn filter(mut self, filter: impl crate::filter::EntryFilter + 'static) -> Self {
        self.extra_filters.push(filter);
        self
    }

    /// Sets the poll period (default 5 seconds).
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Sets the channel accepted entries are published on. Required.
    pub fn output(mut self, channel: Arc<Channel<FileEntry>>) -> Self {
        self.output = Some(channel);
        self
    }

    /// Builds the source.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidConfig`] if the directory or output channel
    ///   is missing.
    /// - [`SourceError::Pattern`] if the pattern does not compile.
    pub fn build(self) -> SourceResult<FileSource> {
        let directory = self
            .directory
            .ok_or_else(|| SourceError::InvalidConfig("directory is required".to_string()))?;
        let output = self
            .output
            .ok_or_else(|| SourceError::InvalidConfig("output channel is required".to_string()))?;

        let mut chain = FilterChain::new();
        if let Some(pattern) = &self.pattern {
            chain.push(PatternFilter::new(pattern)?);
        }
        if self.accept_once {
            chain.push(AcceptOnceFilter::new());
        }
        let mut extra = self.extra_filters;
        chain.append(&mut extra);

        Ok(FileSource {
            directory,
            chain,
            period: self.period,
            output,
        })
    }
}
