//! A scrolling crypto price ticker: polls CoinGecko for a fixed list of
//! assets and keeps an HTML page (status bar plus ticker strip) up to date.

pub mod asset;
pub mod config;
pub mod content;
pub mod datasources;
pub mod format;
pub mod page;
pub mod status;
pub mod widget;

pub use asset::{Asset, AssetQuote};
pub use config::Config;
pub use content::{build_ticker_content, Placeholder, TickerContent};
pub use datasources::{CoinGeckoPriceSource, PriceSnapshot, PriceSource};
pub use format::{format_price, render_item};
pub use page::Page;
pub use widget::{RetryPolicy, TickerWidget, WidgetConfig};
