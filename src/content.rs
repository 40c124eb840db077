use log::{debug, error, info, warn};

use crate::{
    asset::{Asset, AssetQuote},
    datasources::PriceSnapshot,
    format::render_item,
};

/// Fragment shown in place of ticker items when nothing can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// The upstream answered with an empty object, or nothing was fetched yet.
    Loading,
    /// The snapshot had entries, but none for a configured asset in usable shape.
    NoData,
    /// The fetch itself failed.
    Unavailable,
}

impl Placeholder {
    pub fn html(self) -> &'static str {
        match self {
            Placeholder::Loading => {
                r#"<div class="ticker-item"><span style="font-size: 13px;">● LOADING...</span></div>"#
            }
            Placeholder::NoData => {
                r#"<div class="ticker-item"><span style="font-size: 13px;">● NO DATA</span></div>"#
            }
            Placeholder::Unavailable => {
                r#"<div class="ticker-item"><span style="color: #FF6666; font-size: 13px;">● API UNAVAILABLE - RETRYING...</span></div>"#
            }
        }
    }
}

/// Markup for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerContent {
    Items { html: String, count: usize },
    Placeholder(Placeholder),
}

impl TickerContent {
    pub fn rendered_count(&self) -> usize {
        match self {
            TickerContent::Items { count, .. } => *count,
            TickerContent::Placeholder(_) => 0,
        }
    }

    /// Item markup is repeated `copies` times so the scrolling strip wraps
    /// without a gap. Every placeholder, whatever its cause, is a single
    /// static message and is never repeated.
    pub fn to_html(&self, copies: usize) -> String {
        match self {
            TickerContent::Items { html, .. } => html.repeat(copies.max(1)),
            TickerContent::Placeholder(placeholder) => placeholder.html().to_owned(),
        }
    }
}

/// Renders one item per asset, in asset-list order, for every asset with a
/// complete record in `snapshot`. Assets without one are skipped.
pub fn build_ticker_content(snapshot: Option<&PriceSnapshot>, assets: &[Asset]) -> TickerContent {
    let snapshot = match snapshot {
        Some(snapshot) => snapshot,
        None => {
            warn!("No prices available: fetch failed");
            return TickerContent::Placeholder(Placeholder::Unavailable);
        }
    };
    if snapshot.is_empty() {
        warn!("No prices available: empty snapshot");
        return TickerContent::Placeholder(Placeholder::Loading);
    }

    let mut html = String::new();
    let mut count = 0;
    for asset in assets {
        let record = match snapshot.get(&asset.id) {
            Some(record) => record,
            None => {
                warn!("Missing data for {}", asset);
                continue;
            }
        };
        match AssetQuote::from_json(record) {
            Ok(quote) => {
                debug!("{}: ${} ({}%)", asset, quote.price, quote.change_24h);
                html.push_str(&render_item(&asset.symbol, quote.price, quote.change_24h));
                count += 1;
            }
            Err(e) => warn!("Malformed data for {}: {} ({})", asset, record, e),
        }
    }

    if count == 0 {
        error!("No valid crypto data found in response");
        return TickerContent::Placeholder(Placeholder::NoData);
    }
    info!("Successfully loaded {} cryptos", count);
    TickerContent::Items { html, count }
}
