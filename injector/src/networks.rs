//! Network descriptor tables
//!
//! One immutable, process-wide table per concern: read endpoint, chain id,
//! and token-decimal overrides. Lookups never fall through silently: an
//! unknown network name is an explicit [`NetworkError::Unsupported`].

use alloy_primitives::Address;
use phf::phf_map;
use thiserror::Error;

/// Type alias for chain ID to avoid depending on external chain types
pub type ChainId = u64;

/// Decimals assumed for reward tokens with no override entry.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// A network the injector pattern is deployed on, bound to the public read
/// endpoint the dashboard uses for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub chain_id: ChainId,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("unsupported network: {0:?}")]
    Unsupported(String),
}

// Public read endpoints per network, matching the operator runbook defaults
static RPC_ENDPOINTS: phf::Map<&'static str, &'static str> = phf_map! {
    "mainnet" => "https://ethereum.publicnode.com",
    "polygon" => "https://polygon.llamarpc.com",
    "arbitrum" => "https://arbitrum.llamarpc.com",
    "gnosis" => "https://rpc.gnosischain.com",
    "zkevm" => "https://zkevm-rpc.com",
    "avalanche" => "https://avalanche.public-rpc.com",
    "base" => "https://developer-access-mainnet.base.org",
};

static CHAIN_IDS: phf::Map<&'static str, ChainId> = phf_map! {
    "mainnet" => 1u64,
    "polygon" => 137u64,
    "arbitrum" => 42161u64,
    "gnosis" => 100u64,
    "zkevm" => 1101u64,
    "avalanche" => 43114u64,
    "base" => 8453u64,
};

// Reward tokens whose decimals differ from the 18 default, keyed by
// lowercase address. Sourced from chain explorers.
static TOKEN_DECIMALS: phf::Map<&'static str, u8> = phf_map! {
    // USDC
    "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48" => 6u8, // Ethereum Mainnet
    "0x2791bca1f2de4661ed88a30c99a7a9449aa84174" => 6u8, // Polygon (bridged)
    "0x3c499c542cef5e3811e1192ce70d8cc03d5c3359" => 6u8, // Polygon (native)
    "0xff970a61a04b1ca14834a43f5de4533ebddb5f86" => 6u8, // Arbitrum (bridged)
    "0xaf88d065e77c8cc2239327c5edb3a432268e5831" => 6u8, // Arbitrum (native)
    "0x833589fcd6edb6e08f4c7c32d4f71b1566469c3d" => 6u8, // Base
    "0xb97ef9ef8734c71904d8002f8b6bc66dd9c48a6e" => 6u8, // Avalanche
    // USDT
    "0xdac17f958d2ee523a2206206994597c13d831ec7" => 6u8, // Ethereum Mainnet
    "0xc2132d05d31c914a87c6611c10748aeb04b58e8f" => 6u8, // Polygon
};

/// Resolves a network name (case-insensitive) to its descriptor.
pub fn descriptor(name: &str) -> Result<NetworkDescriptor, NetworkError> {
    let key = name.to_ascii_lowercase();
    match (
        RPC_ENDPOINTS.get_entry(key.as_str()),
        CHAIN_IDS.get(key.as_str()),
    ) {
        (Some((canonical, rpc_url)), Some(chain_id)) => Ok(NetworkDescriptor {
            name: *canonical,
            rpc_url: *rpc_url,
            chain_id: *chain_id,
        }),
        _ => Err(NetworkError::Unsupported(name.to_string())),
    }
}

/// All network names with a configured read endpoint, for help text and the
/// health endpoint.
pub fn supported_networks() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = RPC_ENDPOINTS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Decimal places for a reward token, falling back to 18 when the token has
/// no override entry.
pub fn token_decimals(token: Address) -> u8 {
    let key = format!("{token:#x}");
    TOKEN_DECIMALS
        .get(key.as_str())
        .copied()
        .unwrap_or(DEFAULT_TOKEN_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_known_network() {
        let network = descriptor("polygon").unwrap();
        assert_eq!(network.name, "polygon");
        assert_eq!(network.chain_id, 137);
        assert_eq!(network.rpc_url, "https://polygon.llamarpc.com");
    }

    #[test]
    fn test_descriptor_is_case_insensitive() {
        let network = descriptor("Mainnet").unwrap();
        assert_eq!(network.chain_id, 1);
    }

    #[test]
    fn test_descriptor_unknown_network() {
        let result = descriptor("optimism");
        assert_eq!(
            result,
            Err(NetworkError::Unsupported("optimism".to_string()))
        );
    }

    #[test]
    fn test_every_endpoint_has_a_chain_id() {
        for name in RPC_ENDPOINTS.keys() {
            assert!(CHAIN_IDS.contains_key(name), "missing chain id for {name}");
        }
    }

    #[test]
    fn test_token_decimals_override() {
        let usdc: Address = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
            .parse()
            .unwrap();
        assert_eq!(token_decimals(usdc), 6);
    }

    #[test]
    fn test_token_decimals_fallback() {
        let bal: Address = "0xba100000625a3754423978a60c9317c58a424e3d"
            .parse()
            .unwrap();
        assert_eq!(token_decimals(bal), DEFAULT_TOKEN_DECIMALS);
    }

    #[test]
    fn test_supported_networks_sorted() {
        let names = supported_networks();
        assert_eq!(names.len(), 7);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
    }
}
