//! Dispatch and notification counters
//!
//! Recorded through the `metrics` facade when the `metrics` feature is
//! enabled; otherwise every function is a no-op.

use crate::application::RequestKind;

pub const DISPATCH_TOTAL: &str = "herald_dispatch_total";
pub const NOTIFICATIONS_DELIVERED_TOTAL: &str = "herald_notifications_delivered_total";
pub const NOTIFICATIONS_FAILED_TOTAL: &str = "herald_notifications_failed_total";
pub const NOTIFICATIONS_DROPPED_TOTAL: &str = "herald_notifications_dropped_total";

/// Count one finished dispatch; `outcome` is `ok` or an error label
#[cfg(feature = "metrics")]
pub fn record_dispatch(kind: RequestKind, outcome: &'static str) {
    metrics::counter!(DISPATCH_TOTAL, "kind" => kind.as_str(), "outcome" => outcome).increment(1);
}

#[cfg(not(feature = "metrics"))]
pub fn record_dispatch(_kind: RequestKind, _outcome: &'static str) {}

/// Count one notification attempt outcome: `delivered`, `failed` or
/// `dropped`
#[cfg(feature = "metrics")]
pub fn record_notification(channel: &'static str, outcome: &'static str) {
    let name = match outcome {
        "delivered" => NOTIFICATIONS_DELIVERED_TOTAL,
        "dropped" => NOTIFICATIONS_DROPPED_TOTAL,
        _ => NOTIFICATIONS_FAILED_TOTAL,
    };
    metrics::counter!(name, "channel" => channel).increment(1);
}

#[cfg(not(feature = "metrics"))]
pub fn record_notification(_channel: &'static str, _outcome: &'static str) {}
