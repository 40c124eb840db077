use chrono::{DateTime, Local, TimeZone};

use crate::format::escape_html;

pub const DEFAULT_LABEL: &str = "matty.lol [ Terminal 24/7 Live Ticker ]";

pub fn status_bar_html<Tz: TimeZone>(label: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "<span>{}</span><span>{} | {}</span>",
        escape_html(label),
        now.format("%H:%M:%S"),
        now.format("%m/%d/%Y"),
    )
}

pub fn current_status_bar_html(label: &str) -> String {
    status_bar_html(label, &Local::now())
}
