use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use serde_json::Value as JsonValue;

use super::datasource::{PriceSnapshot, PriceSource};

pub const DEFAULT_ENDPOINT: &str = "https://api.coingecko.com/api/v3";

/// Builds the `simple/price` query for `asset_ids`, quoted in USD with the
/// 24h change included.
pub fn price_url(endpoint: &str, asset_ids: &[String]) -> String {
    format!(
        "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
        endpoint.trim_end_matches('/'),
        asset_ids.join(",")
    )
}

pub struct CoinGeckoPriceSource {
    client: Arc<Client>,
    endpoint: String,
}

impl CoinGeckoPriceSource {
    pub fn new(client: Arc<Client>, endpoint: String) -> CoinGeckoPriceSource {
        CoinGeckoPriceSource { client, endpoint }
    }

    async fn run_query(&self, asset_ids: &[String]) -> Result<PriceSnapshot> {
        let url = price_url(&self.endpoint, asset_ids);
        debug!("Fetching from: {}", url);
        let resp_payload = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;
        let status = resp_payload.status();
        info!("CoinGecko response code: {}", status);
        if !status.is_success() {
            return Err(anyhow!("CoinGecko: API error {}", status));
        }
        let response: JsonValue = resp_payload.json().await?;
        debug!("CoinGecko: {}", response);
        match response {
            JsonValue::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(anyhow!("CoinGecko: result is not an object")),
        }
    }
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn fetch_prices(&self, asset_ids: &[String]) -> Option<PriceSnapshot> {
        match self.run_query(asset_ids).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!("Crypto ticker fetch error: {:#}", e);
                None
            }
        }
    }
}
