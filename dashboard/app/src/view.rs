//! Dashboard view assembly
//!
//! Turns the session state into the serializable shape both presentation
//! surfaces (CLI table, REST response) render: one row per watched recipient
//! in on-chain order, projected dates as UTC strings, and the summary totals.

use chrono::DateTime;
use injector::schedule::{self, DistributionTotals};
use serde::Serialize;

use crate::state::{RecipientStatus, SessionState};

/// Rendered in place of dates that do not exist for a recipient.
pub const NOT_AVAILABLE: &str = "N/A";

/// Rendered for rows whose read has not resolved (or failed this cycle).
pub const PENDING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub address: String,
    pub pool_name: String,
    pub amount_per_period: String,
    pub is_active: String,
    pub max_periods: String,
    pub period_number: String,
    pub last_injection_timestamp: String,
    pub last_injection_date: String,
    pub next_injection_date: String,
    pub program_end_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub total_scheduled: f64,
    pub total_distributed: f64,
    pub total_remaining: f64,
    pub additional_tokens_needed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub network: String,
    pub chain_id: u64,
    pub contract: String,
    pub rows: Vec<DashboardRow>,
    pub totals: TotalsView,
    pub remaining_balance: String,
}

/// Builds the view for the current selection; `None` when nothing is
/// selected yet.
pub fn build_view(state: &SessionState) -> Option<DashboardView> {
    let selection = state.selection()?;

    let decimals = state
        .balance()
        .map(|balance| balance.decimals)
        .unwrap_or(injector::networks::DEFAULT_TOKEN_DECIMALS);

    let rows = state
        .recipients()
        .iter()
        .map(|recipient| {
            let pool_name = state
                .pool_name(recipient)
                .unwrap_or(PENDING)
                .to_string();

            match state.status(recipient) {
                Some(RecipientStatus::Loaded(info)) => {
                    let projection = schedule::project(
                        info,
                        state.period_finish(recipient),
                        schedule::DEFAULT_PERIOD_SECONDS,
                    );
                    DashboardRow {
                        address: format!("{recipient:#x}"),
                        pool_name,
                        amount_per_period: format!(
                            "{}",
                            schedule::human_amount(info.amount_per_period, decimals)
                        ),
                        is_active: info.is_active.to_string(),
                        max_periods: info.max_periods.to_string(),
                        period_number: info.period_number.to_string(),
                        last_injection_timestamp: info.last_injection_timestamp.to_string(),
                        last_injection_date: format_date(projection.last_injection),
                        next_injection_date: format_date(projection.next_injection),
                        program_end_date: format_date(projection.program_end),
                    }
                }
                _ => pending_row(format!("{recipient:#x}"), pool_name),
            }
        })
        .collect();

    let balance = state
        .balance()
        .and_then(|balance| balance.formatted.parse::<f64>().ok())
        .unwrap_or(0.0);
    let totals = schedule::totals(state.loaded_infos(), decimals, balance);

    Some(DashboardView {
        network: selection.network.name.to_string(),
        chain_id: selection.network.chain_id,
        contract: format!("{:#x}", selection.contract),
        rows,
        totals: totals_view(totals),
        remaining_balance: state
            .balance()
            .map(|balance| balance.formatted.clone())
            .unwrap_or_else(|| PENDING.to_string()),
    })
}

fn pending_row(address: String, pool_name: String) -> DashboardRow {
    DashboardRow {
        address,
        pool_name,
        amount_per_period: PENDING.to_string(),
        is_active: PENDING.to_string(),
        max_periods: PENDING.to_string(),
        period_number: PENDING.to_string(),
        last_injection_timestamp: PENDING.to_string(),
        last_injection_date: PENDING.to_string(),
        next_injection_date: PENDING.to_string(),
        program_end_date: PENDING.to_string(),
    }
}

fn totals_view(totals: DistributionTotals) -> TotalsView {
    TotalsView {
        total_scheduled: totals.total_scheduled,
        total_distributed: totals.total_distributed,
        total_remaining: totals.total_remaining,
        additional_tokens_needed: totals.additional_tokens_needed,
    }
}

/// Unix seconds as a UTC string, `N/A` when the date does not exist.
fn format_date(timestamp: Option<u64>) -> String {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
        .map(|date| date.format("%a, %d %b %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use injector::RecipientInfo;
    use pretty_assertions::assert_eq;

    const INJECTOR: &str = "0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb";

    fn loaded_state() -> SessionState {
        let mut state = SessionState::new();
        let selection = state.select("polygon", INJECTOR).unwrap();
        state.merge_watch_list(
            selection.id,
            vec![Address::repeat_byte(1), Address::repeat_byte(2)],
        );
        state.merge_account_info(
            selection.id,
            RecipientInfo {
                address: Address::repeat_byte(1),
                amount_per_period: U256::from(100_000u64),
                is_active: true,
                max_periods: 10,
                period_number: 3,
                last_injection_timestamp: 1_700_000_000,
            },
        );
        state.merge_pool_name(selection.id, Address::repeat_byte(1), "80BAL-20WETH".to_string());
        state
    }

    #[test]
    fn test_no_selection_no_view() {
        assert_eq!(build_view(&SessionState::new()), None);
    }

    #[test]
    fn test_view_mixes_loaded_and_pending_rows() {
        let view = build_view(&loaded_state()).unwrap();
        assert_eq!(view.network, "polygon");
        assert_eq!(view.chain_id, 137);
        assert_eq!(view.rows.len(), 2);

        let loaded = &view.rows[0];
        assert_eq!(loaded.pool_name, "80BAL-20WETH");
        assert_eq!(loaded.is_active, "true");
        assert_eq!(loaded.last_injection_date, "Tue, 14 Nov 2023 22:13:20 UTC");
        assert_eq!(loaded.next_injection_date, "Tue, 21 Nov 2023 22:13:20 UTC");

        let pending = &view.rows[1];
        assert_eq!(pending.amount_per_period, PENDING);
        assert_eq!(pending.pool_name, PENDING);
    }

    #[test]
    fn test_view_dates_not_available_when_schedule_done() {
        let mut state = SessionState::new();
        let selection = state.select("polygon", INJECTOR).unwrap();
        state.merge_watch_list(selection.id, vec![Address::repeat_byte(1)]);
        state.merge_account_info(
            selection.id,
            RecipientInfo {
                address: Address::repeat_byte(1),
                amount_per_period: U256::from(100_000u64),
                is_active: false,
                max_periods: 4,
                period_number: 4,
                last_injection_timestamp: 1_700_000_000,
            },
        );

        let view = build_view(&state).unwrap();
        assert_eq!(view.rows[0].next_injection_date, NOT_AVAILABLE);
        assert_eq!(view.rows[0].program_end_date, NOT_AVAILABLE);
    }

    #[test]
    fn test_view_totals_without_balance_fall_back_to_18_decimals() {
        // no balance merged: decimals fall back to 18, balance renders pending
        let view = build_view(&loaded_state()).unwrap();
        assert_eq!(view.remaining_balance, PENDING);
        assert_eq!(view.totals.total_remaining, view.totals.total_scheduled - view.totals.total_distributed);
    }
}
