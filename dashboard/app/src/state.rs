//! Session state
//!
//! Single owner of everything one page session displays. All merge methods
//! take the [`SelectionId`] the originating read was issued under and drop
//! the result when the session has since moved on. This guards against a
//! stale in-flight read landing in a newer selection's view.

use std::collections::HashMap;

use alloy_primitives::Address;
use injector::{RecipientInfo, TokenBalance};
use tracing::debug;

use crate::edits::EditSession;
use crate::selection::{self, Selection, SelectionError, SelectionId};

/// Per-recipient display status. A row stays `Pending` for the rest of the
/// cycle when its read fails; only the next full refresh re-attempts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientStatus {
    Pending,
    Loaded(RecipientInfo),
}

#[derive(Debug, Default)]
pub struct SessionState {
    next_id: u64,
    selection: Option<Selection>,
    recipients: Vec<Address>,
    status: HashMap<Address, RecipientStatus>,
    pool_names: HashMap<Address, String>,
    period_finish: HashMap<Address, u64>,
    balance: Option<TokenBalance>,
    edits: EditSession,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the session to a new (network, contract) pair. On failure the
    /// existing binding and all fetched state are left untouched. On success
    /// every previous row, auxiliary lookup and staged edit is dropped.
    pub fn select(&mut self, network: &str, address: &str) -> Result<Selection, SelectionError> {
        let (descriptor, contract) = selection::resolve(network, address)?;

        self.next_id += 1;
        let selection = Selection {
            id: SelectionId(self.next_id),
            network: descriptor,
            contract,
        };
        self.selection = Some(selection.clone());
        self.recipients.clear();
        self.status.clear();
        self.pool_names.clear();
        self.period_finish.clear();
        self.balance = None;
        self.edits.clear();
        Ok(selection)
    }

    /// Binds from a `<network>-<address>` composite value.
    pub fn select_target(&mut self, target: &str) -> Result<Selection, SelectionError> {
        let (network, address) = selection::split_target(target)?;
        self.select(network, address)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn recipients(&self) -> &[Address] {
        &self.recipients
    }

    pub fn status(&self, recipient: &Address) -> Option<&RecipientStatus> {
        self.status.get(recipient)
    }

    pub fn pool_name(&self, recipient: &Address) -> Option<&str> {
        self.pool_names.get(recipient).map(String::as_str)
    }

    pub fn period_finish(&self, recipient: &Address) -> u64 {
        self.period_finish.get(recipient).copied().unwrap_or(0)
    }

    pub fn balance(&self) -> Option<&TokenBalance> {
        self.balance.as_ref()
    }

    /// Loaded records in watch-list order, skipping pending rows.
    pub fn loaded_infos(&self) -> Vec<&RecipientInfo> {
        self.recipients
            .iter()
            .filter_map(|address| match self.status.get(address) {
                Some(RecipientStatus::Loaded(info)) => Some(info),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> &EditSession {
        &self.edits
    }

    pub fn edits_mut(&mut self) -> &mut EditSession {
        &mut self.edits
    }

    fn is_current(&self, id: SelectionId) -> bool {
        self.selection.as_ref().is_some_and(|s| s.id == id)
    }

    /// Installs the watch list, seeding every row as `Pending`. Returns false
    /// (and changes nothing) when `id` is stale.
    pub fn merge_watch_list(&mut self, id: SelectionId, list: Vec<Address>) -> bool {
        if !self.is_current(id) {
            debug!("discarding stale watch list for {id:?}");
            return false;
        }
        self.status = list
            .iter()
            .map(|address| (*address, RecipientStatus::Pending))
            .collect();
        self.recipients = list;
        true
    }

    pub fn merge_account_info(&mut self, id: SelectionId, info: RecipientInfo) -> bool {
        if !self.is_current(id) {
            debug!("discarding stale account info for {id:?}");
            return false;
        }
        self.status
            .insert(info.address, RecipientStatus::Loaded(info));
        true
    }

    pub fn merge_balance(&mut self, id: SelectionId, balance: TokenBalance) -> bool {
        if !self.is_current(id) {
            debug!("discarding stale balance for {id:?}");
            return false;
        }
        self.balance = Some(balance);
        true
    }

    pub fn merge_pool_name(&mut self, id: SelectionId, recipient: Address, name: String) -> bool {
        if !self.is_current(id) {
            debug!("discarding stale pool name for {id:?}");
            return false;
        }
        self.pool_names.insert(recipient, name);
        true
    }

    pub fn merge_period_finish(&mut self, id: SelectionId, recipient: Address, finish: u64) -> bool {
        if !self.is_current(id) {
            debug!("discarding stale period finish for {id:?}");
            return false;
        }
        self.period_finish.insert(recipient, finish);
        true
    }
}
