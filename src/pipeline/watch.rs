//! Watch loop state machine.
//!
//! Owns the previous snapshot across cycles and drives the
//! fetch -> parse -> diff -> notify -> store sequence. Every cycle
//! failure is converted into a logged outcome; the loop itself cannot
//! terminate from one bad cycle. The first populated cycle only
//! captures a baseline and sends nothing.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::watch;

use crate::config::WatchConfig;
use crate::models::Snapshot;
use crate::services::{Notifier, NotifyOutcome, PageFetcher, RecordParser};

use super::diff::new_records;

/// Cross-cycle state of the watcher.
#[derive(Debug)]
pub enum WatchState {
    /// No baseline observed yet; notification is suppressed
    Initial,
    /// Baseline held; new ids against it are notified
    Steady(Snapshot),
}

impl WatchState {
    pub fn is_steady(&self) -> bool {
        matches!(self, WatchState::Steady(_))
    }

    /// The held snapshot, if any.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            WatchState::Initial => None,
            WatchState::Steady(snapshot) => Some(snapshot),
        }
    }
}

/// Result of one watch cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Listing fetch failed; state untouched, cycle skipped
    ListingUnavailable,
    /// First populated cycle; baseline stored, nothing notified
    BaselineCaptured {
        observed: usize,
        parse_failures: usize,
    },
    /// Steady cycle: diffed, notified, snapshot replaced
    Completed {
        observed: usize,
        new: usize,
        sent: usize,
        parse_failures: usize,
        notify_failures: usize,
    },
}

/// The observe-diff-notify loop.
pub struct WatchLoop {
    fetcher: Arc<dyn PageFetcher>,
    parser: RecordParser,
    notifier: Notifier,
    listing_url: String,
    delay: Duration,
    state: WatchState,
}

impl WatchLoop {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: RecordParser,
        notifier: Notifier,
        config: &WatchConfig,
    ) -> Self {
        Self {
            fetcher,
            parser,
            notifier,
            listing_url: config.site.listing_url.clone(),
            delay: Duration::from_secs(config.delay_secs),
            state: WatchState::Initial,
        }
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Run exactly one cycle.
    ///
    /// Never returns an error: the listing being unavailable skips the
    /// cycle with state untouched, and per-record parse/notify failures
    /// are absorbed by the parser and notifier.
    pub async fn run_once(&mut self) -> CycleOutcome {
        let listing_html = match self.fetcher.fetch_text(&self.listing_url).await {
            Ok(html) => html,
            Err(error) => {
                warn!("Listing page unavailable, skipping cycle: {error}");
                return CycleOutcome::ListingUnavailable;
            }
        };

        let parsed = self.parser.build_snapshot(&listing_html).await;
        if parsed.failures > 0 {
            warn!(
                "{} of {} detail pages failed this cycle",
                parsed.failures, parsed.attempted
            );
        }

        let observed = parsed.snapshot.len();
        match std::mem::replace(&mut self.state, WatchState::Initial) {
            WatchState::Initial => {
                info!("Baseline captured with {observed} records");
                self.state = WatchState::Steady(parsed.snapshot);
                CycleOutcome::BaselineCaptured {
                    observed,
                    parse_failures: parsed.failures,
                }
            }
            WatchState::Steady(previous) => {
                let fresh = new_records(&previous, &parsed.snapshot);
                let notified = if fresh.is_empty() {
                    NotifyOutcome::default()
                } else {
                    info!("Found {} new records", fresh.len());
                    self.notifier.notify_all(&fresh).await
                };

                // Snapshot replacement is unconditional, even when some
                // notifications failed: a failed alert is not retried
                // because its id is no longer novel next cycle.
                self.state = WatchState::Steady(parsed.snapshot);

                CycleOutcome::Completed {
                    observed,
                    new: fresh.len(),
                    sent: notified.sent,
                    parse_failures: parsed.failures,
                    notify_failures: notified.failures,
                }
            }
        }
    }

    /// Run cycles forever, sleeping the configured delay between them,
    /// until the shutdown channel fires.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Watching {} every {}s",
            self.listing_url,
            self.delay.as_secs()
        );

        loop {
            let outcome = self.run_once().await;
            info!("Cycle finished: {outcome:?}");

            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = shutdown.changed() => {
                    info!("Shutdown requested, stopping watch loop");
                    return;
                }
            }
        }
    }
}
