//! Staged edit overlay
//!
//! A purely in-memory working copy of the recipient list. Rows are keyed by
//! the recipient address they came from, or a generated `new-N` key for rows
//! added during the session. Nothing here is persisted; a selection change
//! clears the whole session.

use alloy_primitives::{Address, utils::format_units};
use injector::RecipientInfo;
use injector::payload::PayloadEntry;
use thiserror::Error;

/// One editable row: address, human-unit amount, max periods. All fields are
/// strings until validation so the edit surface can hold partial input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEdit {
    pub key: String,
    pub address: String,
    pub amount_per_period: String,
    pub max_periods: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no staged row with key {0:?}")]
    UnknownKey(String),

    #[error("row {key}: {value:?} is not a valid address")]
    InvalidAddress { key: String, value: String },

    #[error("row {key}: amount {value:?} is not a non-negative decimal number")]
    InvalidAmount { key: String, value: String },

    #[error("row {key}: max periods {value:?} is not an integer in 0..=255")]
    InvalidMaxPeriods { key: String, value: String },
}

#[derive(Debug, Default)]
pub struct EditSession {
    rows: Vec<StagedEdit>,
    next_key: u64,
}

impl EditSession {
    /// Replaces the staged rows with the fetched recipient set, amounts
    /// rendered in human units for editing.
    pub fn seed<'a, I>(&mut self, infos: I, decimals: u8)
    where
        I: IntoIterator<Item = &'a RecipientInfo>,
    {
        self.rows = infos
            .into_iter()
            .map(|info| {
                let address = format!("{:#x}", info.address);
                StagedEdit {
                    key: address.clone(),
                    address,
                    amount_per_period: format_units(info.amount_per_period, decimals)
                        .unwrap_or_else(|_| "0".to_string()),
                    max_periods: info.max_periods.to_string(),
                }
            })
            .collect();
    }

    /// Adds a blank row with a generated key and returns it.
    pub fn add_row(&mut self) -> &StagedEdit {
        self.next_key += 1;
        self.rows.push(StagedEdit {
            key: format!("new-{}", self.next_key),
            address: String::new(),
            amount_per_period: String::new(),
            max_periods: String::new(),
        });
        self.rows.last().expect("row just pushed")
    }

    pub fn set_address(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditError> {
        self.row_mut(key)?.address = value.into();
        Ok(())
    }

    pub fn set_amount(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditError> {
        self.row_mut(key)?.amount_per_period = value.into();
        Ok(())
    }

    pub fn set_max_periods(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditError> {
        self.row_mut(key)?.max_periods = value.into();
        Ok(())
    }

    pub fn remove_row(&mut self, key: &str) -> Result<(), EditError> {
        let position = self
            .rows
            .iter()
            .position(|row| row.key == key)
            .ok_or_else(|| EditError::UnknownKey(key.to_string()))?;
        self.rows.remove(position);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[StagedEdit] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validates every staged row and converts the set into payload entries,
    /// preserving row order. Validation happens here, before any payload is
    /// built, so malformed input never reaches the builder.
    pub fn validated_entries(&self) -> Result<Vec<PayloadEntry>, EditError> {
        self.rows
            .iter()
            .map(|row| {
                let address: Address =
                    row.address
                        .trim()
                        .parse()
                        .map_err(|_| EditError::InvalidAddress {
                            key: row.key.clone(),
                            value: row.address.clone(),
                        })?;

                let amount = row.amount_per_period.trim();
                let numeric = amount.parse::<f64>();
                if amount.is_empty() || numeric.map_or(true, |v| !v.is_finite() || v < 0.0) {
                    return Err(EditError::InvalidAmount {
                        key: row.key.clone(),
                        value: row.amount_per_period.clone(),
                    });
                }

                let periods = row.max_periods.trim();
                if periods.parse::<u8>().is_err() {
                    return Err(EditError::InvalidMaxPeriods {
                        key: row.key.clone(),
                        value: row.max_periods.clone(),
                    });
                }

                Ok(PayloadEntry {
                    address,
                    amount_per_period: amount.to_string(),
                    max_periods: periods.to_string(),
                })
            })
            .collect()
    }

    fn row_mut(&mut self, key: &str) -> Result<&mut StagedEdit, EditError> {
        self.rows
            .iter_mut()
            .find(|row| row.key == key)
            .ok_or_else(|| EditError::UnknownKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use pretty_assertions::assert_eq;

    fn info(address: Address, amount: u64) -> RecipientInfo {
        RecipientInfo {
            address,
            amount_per_period: U256::from(amount),
            is_active: true,
            max_periods: 4,
            period_number: 0,
            last_injection_timestamp: 0,
        }
    }

    #[test]
    fn test_seed_renders_human_amounts() {
        let mut session = EditSession::default();
        session.seed([&info(Address::repeat_byte(1), 1_500_000)], 6);

        let rows = session.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount_per_period, "1.500000");
        assert_eq!(rows[0].max_periods, "4");
        assert_eq!(rows[0].key, rows[0].address);
    }

    #[test]
    fn test_add_edit_remove_row() {
        let mut session = EditSession::default();
        let key = session.add_row().key.clone();
        assert_eq!(key, "new-1");

        session
            .set_address(&key, "0x1111111111111111111111111111111111111111")
            .unwrap();
        session.set_amount(&key, "2.5").unwrap();
        session.set_max_periods(&key, "8").unwrap();
        assert_eq!(session.rows()[0].amount_per_period, "2.5");

        session.remove_row(&key).unwrap();
        assert!(session.is_empty());
        assert_eq!(
            session.remove_row(&key),
            Err(EditError::UnknownKey(key))
        );
    }

    #[test]
    fn test_generated_keys_are_unique_across_removals() {
        let mut session = EditSession::default();
        let first = session.add_row().key.clone();
        session.remove_row(&first).unwrap();
        let second = session.add_row().key.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_validated_entries_preserve_order() {
        let mut session = EditSession::default();
        session.seed(
            [
                &info(Address::repeat_byte(2), 1_000_000),
                &info(Address::repeat_byte(1), 2_000_000),
            ],
            6,
        );

        let entries = session.validated_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].address, Address::repeat_byte(2));
        assert_eq!(entries[1].address, Address::repeat_byte(1));
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let mut session = EditSession::default();
        let key = session.add_row().key.clone();
        session.set_amount(&key, "1.0").unwrap();
        session.set_max_periods(&key, "4").unwrap();

        // blank address
        assert!(matches!(
            session.validated_entries(),
            Err(EditError::InvalidAddress { .. })
        ));

        session
            .set_address(&key, "0x1111111111111111111111111111111111111111")
            .unwrap();
        session.set_amount(&key, "a lot").unwrap();
        assert!(matches!(
            session.validated_entries(),
            Err(EditError::InvalidAmount { .. })
        ));

        session.set_amount(&key, "-3").unwrap();
        assert!(matches!(
            session.validated_entries(),
            Err(EditError::InvalidAmount { .. })
        ));

        session.set_amount(&key, "1.0").unwrap();
        session.set_max_periods(&key, "many").unwrap();
        assert!(matches!(
            session.validated_entries(),
            Err(EditError::InvalidMaxPeriods { .. })
        ));
    }

    #[test]
    fn test_valid_session_converts_to_entries() {
        let mut session = EditSession::default();
        let key = session.add_row().key.clone();
        session
            .set_address(&key, "0x1111111111111111111111111111111111111111")
            .unwrap();
        session.set_amount(&key, " 0.25 ").unwrap();
        session.set_max_periods(&key, "12").unwrap();

        let entries = session.validated_entries().unwrap();
        assert_eq!(entries[0].amount_per_period, "0.25");
        assert_eq!(entries[0].max_periods, "12");
    }
}
