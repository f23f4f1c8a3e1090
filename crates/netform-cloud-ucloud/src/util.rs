//! Small helpers shared by the resource handlers

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicU32, Ordering};

static ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate a unique name such as `tf-vpc-201901010000000000000001`.
///
/// The suffix is a UTC timestamp with four fractional digits followed by an
/// 8-digit hex counter, so names sort by creation time within a process.
pub fn prefixed_unique_id(prefix: &str) -> String {
    let now = Utc::now();
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
    format!(
        "{}{}{:04}{:08x}",
        prefix,
        now.format("%Y%m%d%H%M%S"),
        now.timestamp_subsec_micros() / 100,
        counter
    )
}

/// Format unix seconds as RFC 3339 (UTC)
pub fn timestamp_to_string(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
