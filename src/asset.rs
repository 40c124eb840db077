use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// CoinGecko coin id, e.g. `bitcoin`.
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl Asset {
    pub fn new(id: &str, symbol: &str, name: &str) -> Asset {
        Asset {
            id: id.to_owned(),
            symbol: symbol.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

/// Parses `id:SYMBOL` or `id:SYMBOL:Name`.
impl FromStr for Asset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Asset> {
        let mut parts = s.trim().splitn(3, ':').map(str::trim);
        let id = parts.next().filter(|p| !p.is_empty());
        let symbol = parts.next().filter(|p| !p.is_empty());
        match (id, symbol) {
            (Some(id), Some(symbol)) => {
                let name = parts.next().filter(|p| !p.is_empty()).unwrap_or(symbol);
                Ok(Asset::new(id, symbol, name))
            }
            _ => Err(anyhow!("Invalid asset entry '{}', expected id:SYMBOL[:Name]", s)),
        }
    }
}

pub fn default_assets() -> Vec<Asset> {
    vec![
        Asset::new("bitcoin", "BTC", "Bitcoin"),
        Asset::new("ethereum", "ETH", "Ethereum"),
        Asset::new("solana", "SOL", "Solana"),
        Asset::new("cardano", "ADA", "Cardano"),
        Asset::new("venetian", "VVV", "Venice"),
        Asset::new("diem", "DIEM", "Diem"),
    ]
}

/// Parses a comma separated list of asset entries. Empty entries are ignored.
pub fn parse_assets(s: &str) -> Result<Vec<Asset>> {
    let assets = s
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(Asset::from_str)
        .collect::<Result<Vec<_>>>()?;
    if assets.is_empty() {
        return Err(anyhow!("Asset list is empty"));
    }
    Ok(assets)
}

#[derive(Deserialize)]
struct RawQuote {
    usd: f64,
    usd_24h_change: f64,
}

/// A validated snapshot record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetQuote {
    pub price: f64,
    pub change_24h: f64,
}

impl AssetQuote {
    pub fn from_json(value: &JsonValue) -> Result<AssetQuote> {
        let raw: RawQuote = serde_json::from_value(value.clone())?;
        Ok(AssetQuote {
            price: raw.usd,
            change_24h: raw.usd_24h_change,
        })
    }
}
