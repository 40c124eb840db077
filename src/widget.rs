//! The ticker widget: owns the mounted elements of a [`Page`] and the two
//! periodic tasks (clock and price refresh) that keep them current.

use std::{sync::Arc, time::Duration};

use log::{info, warn};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::{
    asset::Asset,
    content::{build_ticker_content, Placeholder},
    datasources::{PriceSnapshot, PriceSource},
    page::{Element, Page, STATUS_BAR_ID, TICKER_CONTENT_ID, TICKER_ID},
    status::{current_status_bar_html, DEFAULT_LABEL},
};

/// Bounded retry applied inside a single refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total fetch attempts per cycle, including the first. At least 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl RetryPolicy {
    pub fn none() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        }
    }

    /// Delay after the failed attempt number `attempt` (zero based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.multiplier
            .checked_pow(attempt)
            .and_then(|factor| self.initial_backoff.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 2,
            initial_backoff: Duration::from_secs(5),
            multiplier: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub refresh_interval: Duration,
    pub clock_interval: Duration,
    /// How many times rendered items are repeated for the scroll loop.
    pub copies: usize,
    pub retry: RetryPolicy,
    pub label: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            refresh_interval: Duration::from_secs(30),
            clock_interval: Duration::from_secs(1),
            copies: 3,
            retry: RetryPolicy::default(),
            label: DEFAULT_LABEL.to_owned(),
        }
    }
}

struct Inner {
    page: Arc<Mutex<Page>>,
    source: Arc<dyn PriceSource>,
    assets: Vec<Asset>,
    asset_ids: Vec<String>,
    config: WidgetConfig,
}

impl Inner {
    async fn mount(&self) -> bool {
        let mut page = self.page.lock().await;
        if page.contains(STATUS_BAR_ID) || page.contains(TICKER_ID) {
            info!("Ticker already initialized, skipping...");
            return false;
        }
        page.insert_first(Element::new(STATUS_BAR_ID));
        page.set_inner_html(STATUS_BAR_ID, current_status_bar_html(&self.config.label));
        page.append(Element::new(TICKER_ID).with_child(Element::new(TICKER_CONTENT_ID)));
        page.set_inner_html(TICKER_CONTENT_ID, Placeholder::Loading.html().to_owned());
        info!("Ticker mounted");
        true
    }

    async fn update_clock(&self) {
        let html = current_status_bar_html(&self.config.label);
        self.page.lock().await.set_inner_html(STATUS_BAR_ID, html);
    }

    async fn fetch_with_retry(&self) -> Option<PriceSnapshot> {
        let retry = &self.config.retry;
        for attempt in 0..retry.max_attempts.max(1) {
            if let Some(snapshot) = self.source.fetch_prices(&self.asset_ids).await {
                return Some(snapshot);
            }
            if attempt + 1 < retry.max_attempts {
                let delay = retry.backoff(attempt);
                warn!(
                    "Price fetch attempt {}/{} failed, retrying in {:?}",
                    attempt + 1,
                    retry.max_attempts,
                    delay
                );
                time::sleep(delay).await;
            }
        }
        None
    }

    async fn refresh(&self) -> usize {
        info!("Fetching crypto prices...");
        let snapshot = self.fetch_with_retry().await;
        let content = build_ticker_content(snapshot.as_ref(), &self.assets);
        let html = content.to_html(self.config.copies);
        if !self.page.lock().await.set_inner_html(TICKER_CONTENT_ID, html) {
            warn!("Ticker container is not mounted, dropping update");
        }
        content.rendered_count()
    }
}

pub struct TickerWidget {
    inner: Arc<Inner>,
    tasks: Vec<JoinHandle<()>>,
}

impl TickerWidget {
    pub fn new(
        page: Arc<Mutex<Page>>,
        source: Arc<dyn PriceSource>,
        assets: Vec<Asset>,
        config: WidgetConfig,
    ) -> TickerWidget {
        let asset_ids = assets.iter().map(|a| a.id.clone()).collect();
        TickerWidget {
            inner: Arc::new(Inner {
                page,
                source,
                assets,
                asset_ids,
                config,
            }),
            tasks: vec![],
        }
    }

    pub fn page(&self) -> Arc<Mutex<Page>> {
        self.inner.page.clone()
    }

    /// Creates the status bar (first in the body) and the ticker container
    /// (last). Returns `false` and leaves the page untouched if they exist.
    pub async fn mount(&self) -> bool {
        self.inner.mount().await
    }

    pub async fn update_clock(&self) {
        self.inner.update_clock().await
    }

    /// Runs one fetch, build, replace cycle and returns how many assets were
    /// rendered. A failed fetch replaces the content with a placeholder.
    pub async fn refresh_once(&self) -> usize {
        self.inner.refresh().await
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Mounts the widget and spawns the clock and refresh tasks. Both tick
    /// immediately, then once per configured interval.
    pub async fn start(&mut self) {
        if self.is_running() {
            warn!("Ticker already running");
            return;
        }
        self.inner.mount().await;
        info!(
            "Starting ticker for {} assets, refresh every {:?}",
            self.inner.assets.len(),
            self.inner.config.refresh_interval
        );

        let inner = self.inner.clone();
        self.tasks.push(tokio::spawn(async move {
            let mut interval = time::interval(inner.config.clock_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                inner.update_clock().await;
            }
        }));

        let inner = self.inner.clone();
        self.tasks.push(tokio::spawn(async move {
            let mut interval = time::interval(inner.config.refresh_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                inner.refresh().await;
            }
        }));
    }

    pub fn stop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!("Ticker stopped");
    }
}

impl Drop for TickerWidget {
    fn drop(&mut self) {
        self.stop();
    }
}
