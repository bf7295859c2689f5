//! Batch payload builder
//!
//! Assembles the import document understood by the multisig batch-transaction
//! tool: one `setRecipientList` call with three parallel arrays, each rendered
//! as a literal bracket-delimited list inside a string field. Building is an
//! explicit action; callers decide when a document is produced.

use alloy_primitives::{
    Address, U256,
    utils::{UnitsError, parse_units},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::networks::NetworkDescriptor;

/// Schema marker the batch tool expects.
pub const PAYLOAD_VERSION: &str = "1.0";

/// Conventional export file name for the generated document.
pub const DEFAULT_EXPORT_FILE: &str = "data.json";

/// One recipient row heading into the payload. The amount is a human-unit
/// decimal string; `max_periods` a non-negative integer string. Both are
/// validated by the edit layer before they reach the builder, but the builder
/// still refuses values it cannot convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEntry {
    pub address: Address,
    pub amount_per_period: String,
    pub max_periods: String,
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid amount {value:?} for {address}: {source}")]
    InvalidAmount {
        address: Address,
        value: String,
        source: UnitsError,
    },

    #[error("invalid max periods {value:?} for {address}")]
    InvalidMaxPeriods { address: Address, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayload {
    pub version: String,
    pub chain_id: String,
    pub meta: PayloadMeta,
    pub transactions: Vec<PayloadTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMeta {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadTransaction {
    pub to: String,
    pub value: String,
    pub data: Option<String>,
    pub contract_method: ContractMethod,
    pub contract_inputs_values: ContractInputsValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractMethod {
    pub inputs: Vec<MethodInput>,
    pub name: String,
    pub payable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub internal_type: String,
}

/// The three parallel arrays, rendered as bracketed string lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInputsValues {
    pub gauge_addresses: String,
    pub amounts_per_period: String,
    pub max_periods: String,
}

/// Builds the batch document updating the injector's recipient list.
///
/// Amounts are converted from human units to smallest-unit integers with
/// `token_decimals`; entry order is preserved across all three arrays.
pub fn build_batch_payload(
    network: &NetworkDescriptor,
    injector: Address,
    token_decimals: u8,
    entries: &[PayloadEntry],
) -> Result<BatchPayload, PayloadError> {
    let mut addresses = Vec::with_capacity(entries.len());
    let mut amounts = Vec::with_capacity(entries.len());
    let mut periods = Vec::with_capacity(entries.len());

    for entry in entries {
        let amount: U256 = parse_units(entry.amount_per_period.trim(), token_decimals)
            .map_err(|source| PayloadError::InvalidAmount {
                address: entry.address,
                value: entry.amount_per_period.clone(),
                source,
            })?
            .get_absolute();

        let max_periods: u8 = entry.max_periods.trim().parse().map_err(|_| {
            PayloadError::InvalidMaxPeriods {
                address: entry.address,
                value: entry.max_periods.clone(),
            }
        })?;

        addresses.push(entry.address.to_string());
        amounts.push(amount.to_string());
        periods.push(max_periods.to_string());
    }

    Ok(BatchPayload {
        version: PAYLOAD_VERSION.to_string(),
        chain_id: network.chain_id.to_string(),
        meta: PayloadMeta {
            name: "Rewards Injector Schedule".to_string(),
            description: format!(
                "Update the recipient list of injector {injector} on {}",
                network.name
            ),
        },
        transactions: vec![PayloadTransaction {
            to: injector.to_string(),
            value: "0".to_string(),
            data: None,
            contract_method: set_recipient_list_method(),
            contract_inputs_values: ContractInputsValues {
                gauge_addresses: bracket_list(&addresses),
                amounts_per_period: bracket_list(&amounts),
                max_periods: bracket_list(&periods),
            },
        }],
    })
}

fn set_recipient_list_method() -> ContractMethod {
    ContractMethod {
        inputs: vec![
            MethodInput {
                name: "gaugeAddresses".to_string(),
                kind: "address[]".to_string(),
                internal_type: "address[]".to_string(),
            },
            MethodInput {
                name: "amountsPerPeriod".to_string(),
                kind: "uint256[]".to_string(),
                internal_type: "uint256[]".to_string(),
            },
            MethodInput {
                name: "maxPeriods".to_string(),
                kind: "uint8[]".to_string(),
                internal_type: "uint8[]".to_string(),
            },
        ],
        name: "setRecipientList".to_string(),
        payable: false,
    }
}

fn bracket_list(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::utils::format_units;
    use pretty_assertions::assert_eq;

    fn network() -> NetworkDescriptor {
        crate::networks::descriptor("polygon").unwrap()
    }

    fn injector() -> Address {
        "0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb"
            .parse()
            .unwrap()
    }

    fn entry(address: &str, amount: &str, max_periods: &str) -> PayloadEntry {
        PayloadEntry {
            address: address.parse().unwrap(),
            amount_per_period: amount.to_string(),
            max_periods: max_periods.to_string(),
        }
    }

    #[test]
    fn test_payload_arrays_match_entry_order() {
        let entries = vec![
            entry("0x1111111111111111111111111111111111111111", "1.5", "4"),
            entry("0x2222222222222222222222222222222222222222", "0.25", "8"),
        ];

        let payload = build_batch_payload(&network(), injector(), 6, &entries).unwrap();
        assert_eq!(payload.transactions.len(), 1);

        let values = &payload.transactions[0].contract_inputs_values;
        assert_eq!(
            values.gauge_addresses,
            "[0x1111111111111111111111111111111111111111,0x2222222222222222222222222222222222222222]"
        );
        assert_eq!(values.amounts_per_period, "[1500000,250000]");
        assert_eq!(values.max_periods, "[4,8]");

        // the three arrays stay parallel
        for field in [
            &values.gauge_addresses,
            &values.amounts_per_period,
            &values.max_periods,
        ] {
            assert_eq!(field.matches(',').count(), entries.len() - 1);
        }
    }

    #[test]
    fn test_payload_carries_chain_id_and_version() {
        let entries = vec![entry(
            "0x1111111111111111111111111111111111111111",
            "1",
            "1",
        )];
        let payload = build_batch_payload(&network(), injector(), 18, &entries).unwrap();

        assert_eq!(payload.version, PAYLOAD_VERSION);
        assert_eq!(payload.chain_id, "137");
        assert_eq!(payload.transactions[0].value, "0");
        assert_eq!(
            payload.transactions[0].contract_method.name,
            "setRecipientList"
        );
        assert_eq!(payload.transactions[0].contract_method.inputs.len(), 3);
    }

    #[test]
    fn test_payload_serializes_with_wire_field_names() {
        let entries = vec![entry(
            "0x1111111111111111111111111111111111111111",
            "2",
            "3",
        )];
        let payload = build_batch_payload(&network(), injector(), 18, &entries).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["chainId"], "137");
        assert_eq!(
            json["transactions"][0]["contractMethod"]["inputs"][0]["internalType"],
            "address[]"
        );
        assert_eq!(
            json["transactions"][0]["contractInputsValues"]["amountsPerPeriod"],
            "[2000000000000000000]"
        );
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        let entries = vec![entry(
            "0x1111111111111111111111111111111111111111",
            "lots",
            "4",
        )];
        let result = build_batch_payload(&network(), injector(), 6, &entries);
        assert!(matches!(
            result,
            Err(PayloadError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_max_periods() {
        for bad in ["", "-1", "4.5", "300"] {
            let entries = vec![entry(
                "0x1111111111111111111111111111111111111111",
                "1",
                bad,
            )];
            let result = build_batch_payload(&network(), injector(), 6, &entries);
            assert!(
                matches!(result, Err(PayloadError::InvalidMaxPeriods { .. })),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_decimal_conversion_round_trips() {
        let raw = parse_units("1.5", 6).unwrap().get_absolute();
        assert_eq!(raw, U256::from(1_500_000u64));
        assert_eq!(format_units(raw, 6).unwrap(), "1.500000");
    }

    #[test]
    fn test_empty_entry_set_builds_empty_arrays() {
        let payload = build_batch_payload(&network(), injector(), 6, &[]).unwrap();
        let values = &payload.transactions[0].contract_inputs_values;
        assert_eq!(values.gauge_addresses, "[]");
        assert_eq!(values.amounts_per_period, "[]");
        assert_eq!(values.max_periods, "[]");
    }
}
