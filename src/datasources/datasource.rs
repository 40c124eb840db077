use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Raw `simple/price` payload: asset id to its (unvalidated) quote record.
pub type PriceSnapshot = BTreeMap<String, JsonValue>;

#[async_trait]
pub trait PriceSource: Sync + Send {
    /// Fetches a fresh snapshot for `asset_ids`, or `None` when the upstream
    /// could not be reached or answered with something unusable.
    async fn fetch_prices(&self, asset_ids: &[String]) -> Option<PriceSnapshot>;
}
