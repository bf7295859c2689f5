//! Selection handling
//!
//! A selection binds the session to one (network, injector contract) pair,
//! whether it came from the dropdown's `<network>-<address>` composite value
//! or from `/:network/:address` path segments. Unsupported networks fail
//! loudly; the caller's existing binding stays untouched.

use alloy_primitives::Address;
use injector::networks::{self, NetworkDescriptor, NetworkError};
use thiserror::Error;

/// Monotonic identifier for one selection epoch. Reads carry the id they
/// were issued under; results with a stale id are discarded on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionId(pub u64);

/// A resolved (network, injector contract) binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: SelectionId,
    pub network: NetworkDescriptor,
    pub contract: Address,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("malformed selection {0:?}, expected <network>-<address>")]
    Malformed(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("invalid contract address {0:?}")]
    InvalidAddress(String),
}

/// Splits a `<network>-<address>` composite into its parts.
pub fn split_target(value: &str) -> Result<(&str, &str), SelectionError> {
    match value.split_once('-') {
        Some((network, address)) if !network.is_empty() && !address.is_empty() => {
            Ok((network, address))
        }
        _ => Err(SelectionError::Malformed(value.to_string())),
    }
}

/// Resolves network name and contract address into a descriptor/address pair.
pub fn resolve(
    network: &str,
    address: &str,
) -> Result<(NetworkDescriptor, Address), SelectionError> {
    let descriptor = networks::descriptor(network)?;
    let contract = address
        .parse()
        .map_err(|_| SelectionError::InvalidAddress(address.to_string()))?;
    Ok((descriptor, contract))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_target() {
        let (network, address) =
            split_target("polygon-0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb").unwrap();
        assert_eq!(network, "polygon");
        assert_eq!(address, "0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb");
    }

    #[test]
    fn test_split_target_malformed() {
        for bad in ["", "polygon", "-0xabc", "polygon-"] {
            assert!(matches!(
                split_target(bad),
                Err(SelectionError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_resolve_unknown_network_is_explicit() {
        let result = resolve("fantom", "0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb");
        assert_eq!(
            result,
            Err(SelectionError::Network(NetworkError::Unsupported(
                "fantom".to_string()
            )))
        );
    }

    #[test]
    fn test_resolve_bad_address() {
        assert!(matches!(
            resolve("polygon", "0xnot-an-address"),
            Err(SelectionError::InvalidAddress(_))
        ));
    }
}
