// src/poller.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::PollerConfig;
use crate::dom::{Document, SharedContainer};
use crate::errors::PollError;
use crate::render::{RenderKind, reconcile};
use crate::source::ResultsSource;
use crate::view::{Endpoints, build_view};

/// Result of one fetch-and-render cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    Rendered(RenderKind),
    /// Another cycle was still in flight, so no request was made.
    Skipped,
    /// The fetch failed; the container was left as it was.
    Failed(PollError),
}

/// Bookkeeping about recent cycles, exposed on the live page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollerStatus {
    pub cycles: u64,
    pub failures: u64,
    pub last_render: Option<RenderKind>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
}

/// Keeps the results container in sync with the challenge server.
///
/// The poller owns its repeating timer. Dropping the poller, or calling
/// [`ResultsPoller::stop`], ends polling.
pub struct ResultsPoller {
    inner: Arc<PollerInner>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct PollerInner {
    source: Arc<dyn ResultsSource>,
    container: SharedContainer,
    endpoints: Endpoints,
    interval: Duration,
    in_flight: AtomicBool,
    status: RwLock<PollerStatus>,
}

/// Holds the in-flight flag for the duration of a cycle and releases it on
/// drop, even if the cycle's task is aborted mid-request.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ResultsPoller {
    pub fn new(
        container: SharedContainer,
        source: Arc<dyn ResultsSource>,
        endpoints: Endpoints,
        interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                source,
                container,
                endpoints,
                interval,
                in_flight: AtomicBool::new(false),
                status: RwLock::new(PollerStatus::default()),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Attach to the document's results container, render once right away
    /// and start the repeating timer.
    ///
    /// Returns `None` when the document has no results container; in that
    /// case nothing is fetched.
    pub async fn initialize(
        document: &Document,
        config: &PollerConfig,
        source: Arc<dyn ResultsSource>,
    ) -> Option<Self> {
        let Some(container) = document.get_element_by_id(&config.container_id) else {
            log::debug!(
                "No '#{}' container on the page, results polling disabled",
                config.container_id
            );
            return None;
        };

        let poller = Self::new(
            container,
            source,
            Endpoints::new(config.tasks_url()),
            config.interval(),
        );
        poller.fetch_and_render().await;
        poller.start();
        Some(poller)
    }

    /// Arm the repeating timer. The first tick fires one interval from now.
    /// Returns false if the timer was already running.
    pub fn start(&self) -> bool {
        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let period = inner.interval;
        log::info!("Polling for grading results every {}ms", period.as_millis());

        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                inner.fetch_and_render().await;
            }
        }));
        true
    }

    /// Disarm the timer. Safe to call repeatedly.
    pub fn stop(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = timer.take() {
            handle.abort();
            log::info!("Stopped polling for grading results");
        }
    }

    pub fn is_running(&self) -> bool {
        let timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        timer.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Run one fetch-and-render cycle now.
    pub async fn fetch_and_render(&self) -> CycleOutcome {
        self.inner.fetch_and_render().await
    }

    pub fn container(&self) -> SharedContainer {
        Arc::clone(&self.inner.container)
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    pub async fn status(&self) -> PollerStatus {
        self.inner.status.read().await.clone()
    }
}

impl Drop for ResultsPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PollerInner {
    async fn fetch_and_render(&self) -> CycleOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::debug!("Previous results request still in flight, skipping tick");
            return CycleOutcome::Skipped;
        };

        let fetched = self.source.fetch().await;
        let mut status = self.status.write().await;
        status.cycles += 1;

        match fetched {
            Ok(res) => {
                let view = build_view(&res, &self.endpoints);
                let kind = {
                    let mut container = self.container.write().await;
                    reconcile(&mut container, &view)
                };
                log::debug!("Rendered grading results: {:?}", kind);
                status.last_render = Some(kind);
                status.last_success_at = Some(Utc::now());
                CycleOutcome::Rendered(kind)
            }
            Err(e) => {
                log::warn!("Failed to fetch grading results: {}", e);
                status.failures += 1;
                status.last_error = Some(e.to_string());
                status.last_error_at = Some(Utc::now());
                CycleOutcome::Failed(e)
            }
        }
    }
}
