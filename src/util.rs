use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Wire format for `currentAsOf`, `dailyStart` and `dailyEnd`.
const WIRE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%SZ";

pub(crate) fn retriable_status(code: u16) -> bool {
    matches!(code, 429 | 500 | 502 | 503 | 504)
}

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(WIRE_TIMESTAMP).to_string()
}

/// Parses an ISO-8601 timestamp as sent by WeatherKit.
///
/// Values without an offset are read as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
