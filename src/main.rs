use std::sync::Arc;

use anyhow::{Context, Result};
use ireina_ticker::{CoinGeckoPriceSource, Config, Page, TickerWidget};
use log::{error, info};
use reqwest::Client;
use tokio::{
    sync::Mutex,
    time::{self, MissedTickBehavior},
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let client = Client::builder()
        .user_agent("Ireina Ticker 0.1.0")
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let source = CoinGeckoPriceSource::new(Arc::new(client), config.api_url.clone());

    let page = Arc::new(Mutex::new(Page::new("Crypto Ticker")));
    let mut widget = TickerWidget::new(
        page.clone(),
        Arc::new(source),
        config.assets.clone(),
        config.widget.clone(),
    );
    widget.start().await;
    info!("Writing ticker page to {}", config.output.display());

    let mut interval = time::interval(config.widget.clock_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut written_revision = None;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
        let (revision, html) = {
            let page = page.lock().await;
            if written_revision == Some(page.revision()) {
                continue;
            }
            (page.revision(), page.render())
        };
        match tokio::fs::write(&config.output, html).await {
            Ok(()) => written_revision = Some(revision),
            Err(e) => error!("Failed to write {}: {}", config.output.display(), e),
        }
    }

    info!("Shutting down");
    widget.stop();
    Ok(())
}
