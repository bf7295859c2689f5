//! Schedule projection
//!
//! Pure arithmetic over [`RecipientInfo`] snapshots: projected injection
//! dates for one recipient and aggregate distribution totals across the
//! watch list. Nothing here touches the network.

use alloy_primitives::{U256, utils::format_units};

use crate::reader::RecipientInfo;

/// Default injection cadence. The deployed injectors run weekly; the period
/// length is a parameter everywhere so a different cadence only needs a new
/// call-site value.
pub const DEFAULT_PERIOD_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Projected schedule dates for one recipient, unix seconds. `None` means
/// "not available" (never injected and no fallback, or schedule not running).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleProjection {
    pub last_injection: Option<u64>,
    pub next_injection: Option<u64>,
    pub program_end: Option<u64>,
}

/// Aggregate totals across a recipient set, in human token units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistributionTotals {
    pub total_scheduled: f64,
    pub total_distributed: f64,
    pub total_remaining: f64,
    pub additional_tokens_needed: f64,
}

/// Projects last/next/end injection dates for one recipient.
///
/// When the recipient has never been injected, `fallback_period_finish` (the
/// gauge's current reward period end, 0 when unknown) anchors the schedule
/// instead. Next and end dates only exist while the schedule is running:
/// active and with periods left.
pub fn project(
    info: &RecipientInfo,
    fallback_period_finish: u64,
    period_seconds: u64,
) -> ScheduleProjection {
    let last_injection = if info.last_injection_timestamp > 0 {
        Some(info.last_injection_timestamp)
    } else if fallback_period_finish > 0 {
        Some(fallback_period_finish)
    } else {
        None
    };

    let running = info.is_active && info.period_number < info.max_periods;
    let (next_injection, program_end) = match (last_injection, running) {
        (Some(last), true) => {
            // Counts come straight off uint256 contract fields, so the span
            // arithmetic can exceed u64; an overflowing date is "not
            // available" rather than a wrapped timestamp.
            let next = last.checked_add(period_seconds);
            let end = (info.max_periods - info.period_number)
                .checked_add(1)
                .and_then(|periods_left| period_seconds.checked_mul(periods_left))
                .and_then(|span| last.checked_add(span));
            (next, end)
        }
        _ => (None, None),
    };

    ScheduleProjection {
        last_injection,
        next_injection,
        program_end,
    }
}

/// Aggregates scheduled/distributed/remaining totals over the recipient set
/// and the extra tokens the injector still needs beyond its balance.
pub fn totals<'a, I>(infos: I, decimals: u8, current_balance: f64) -> DistributionTotals
where
    I: IntoIterator<Item = &'a RecipientInfo>,
{
    let mut total_scheduled = 0.0;
    let mut total_distributed = 0.0;

    for info in infos {
        let amount = human_amount(info.amount_per_period, decimals);
        total_scheduled += amount * info.max_periods as f64;
        total_distributed += amount * info.period_number as f64;
    }

    let total_remaining = total_scheduled - total_distributed;
    DistributionTotals {
        total_scheduled,
        total_distributed,
        total_remaining,
        additional_tokens_needed: (total_remaining - current_balance).max(0.0),
    }
}

/// Smallest-unit amount as a human-unit float. Display math only; exact
/// conversions for payloads go through `parse_units` instead.
pub fn human_amount(raw: U256, decimals: u8) -> f64 {
    format_units(raw, decimals)
        .ok()
        .and_then(|formatted| formatted.parse().ok())
        .unwrap_or(0.0)
}
