mod coingecko;
mod datasource;

pub use coingecko::{price_url, CoinGeckoPriceSource, DEFAULT_ENDPOINT};
pub use datasource::{PriceSnapshot, PriceSource};
