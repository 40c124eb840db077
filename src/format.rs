//! Number formatting and per-asset markup.

use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};

/// Magnitudes at or above this are formatted straight from the float; the
/// decimal path has no room left for the fractional digits.
const DECIMAL_LIMIT: f64 = 1e20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Zero counts as up.
    pub fn of(change_pct: f64) -> Direction {
        if change_pct >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Direction::Up => "positive",
            Direction::Down => "negative",
        }
    }

    fn led_color(self) -> &'static str {
        match self {
            Direction::Up => "#00ff00",
            Direction::Down => "#ff0000",
        }
    }

    fn glow_rgb(self) -> &'static str {
        match self {
            Direction::Up => "0, 255, 0",
            Direction::Down => "255, 0, 0",
        }
    }
}

/// Rounds half away from zero on the shortest decimal form of `value` and
/// always prints exactly `dp` decimals, so `1.005` becomes `1.01`.
pub fn to_fixed(value: f64, dp: u32) -> String {
    let decimal = if value.abs() < DECIMAL_LIMIT {
        Decimal::from_f64(value)
    } else {
        None
    };
    match decimal {
        Some(decimal) => {
            let mut rounded =
                decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(dp);
            rounded.to_string()
        }
        None => format!("{:.*}", dp as usize, value),
    }
}

/// Sub-dollar prices get 4 decimals, prices under 1000 get 2, anything larger
/// is shown in thousands with a `K` suffix.
pub fn format_price(price: f64) -> String {
    if price < 1.0 {
        to_fixed(price, 4)
    } else if price < 1000.0 {
        to_fixed(price, 2)
    } else {
        format!("{}K", to_fixed(price / 1000.0, 1))
    }
}

pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn render_item(symbol: &str, price: f64, change_pct: f64) -> String {
    let direction = Direction::of(change_pct);
    let led = direction.led_color();
    format!(
        r#"
<div class="ticker-item">
    <div class="led-indicator" style="background-color: {led}; box-shadow: 0 0 12px {led}, 0 0 20px rgba({rgb}, 0.6);"></div>
    <div class="ticker-symbol">{symbol}</div>
    <div class="ticker-price">${price}</div>
    <div class="ticker-change {class}">{glyph} {change}%</div>
</div>
"#,
        led = led,
        rgb = direction.glow_rgb(),
        symbol = escape_html(symbol),
        price = format_price(price),
        class = direction.class(),
        glyph = direction.glyph(),
        change = to_fixed(change_pct.abs(), 2),
    )
}
