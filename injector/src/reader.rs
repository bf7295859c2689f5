//! On-chain reader for one injector deployment
//!
//! Every read is a single `eth_call`; nothing is retried. Auxiliary lookups
//! (pool name, reward period finish) are best-effort and degrade to
//! placeholder values instead of surfacing errors.

use alloy_primitives::{
    Address, U256,
    utils::{UnitsError, format_units},
};
use alloy_sol_types::SolCall;
use thiserror::Error;
use tracing::debug;

use crate::contracts::{IChildChainGauge, IERC20, IRewardsInjector};
use crate::networks;
use crate::rpc::{RpcClient, RpcError};

/// Placeholder returned when the pool behind a gauge cannot be resolved.
pub const UNKNOWN_POOL: &str = "Unknown Pool";

/// On-chain schedule state for one watched recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientInfo {
    pub address: Address,
    /// Per-period injection amount in the token's smallest unit.
    pub amount_per_period: U256,
    pub is_active: bool,
    pub max_periods: u64,
    pub period_number: u64,
    /// Unix seconds; 0 when no injection has happened yet.
    pub last_injection_timestamp: u64,
}

/// The injector's remaining reward-token holdings, decimal-adjusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    pub token: Address,
    pub raw: U256,
    pub decimals: u8,
    pub formatted: String,
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("failed to decode return data: {0}")]
    Decode(#[from] alloy_sol_types::Error),

    #[error("on-chain value out of range for {field}")]
    OutOfRange { field: &'static str },

    #[error("failed to format token amount: {0}")]
    Units(#[from] UnitsError),
}

/// Reader bound to one (endpoint, injector contract) pair.
#[derive(Debug, Clone)]
pub struct InjectorReader {
    rpc: RpcClient,
    contract: Address,
}

impl InjectorReader {
    pub fn new(rpc: RpcClient, contract: Address) -> Self {
        Self { rpc, contract }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// The watched recipient addresses, in on-chain order.
    pub async fn watch_list(&self) -> Result<Vec<Address>, ReadError> {
        let data = IRewardsInjector::getWatchListCall {}.abi_encode();
        let ret = self.rpc.call(self.contract, data).await?;
        Ok(IRewardsInjector::getWatchListCall::abi_decode_returns(
            &ret,
        )?)
    }

    /// Schedule slot for one recipient.
    pub async fn account_info(&self, recipient: Address) -> Result<RecipientInfo, ReadError> {
        let data = IRewardsInjector::getAccountInfoCall {
            targetAddress: recipient,
        }
        .abi_encode();
        let ret = self.rpc.call(self.contract, data).await?;
        let info = IRewardsInjector::getAccountInfoCall::abi_decode_returns(&ret)?;

        Ok(RecipientInfo {
            address: recipient,
            amount_per_period: info.amountPerPeriod,
            is_active: info.isActive,
            max_periods: narrow(info.maxPeriods, "maxPeriods")?,
            period_number: narrow(info.periodNumber, "periodNumber")?,
            last_injection_timestamp: narrow(info.lastInjectionTimeStamp, "lastInjectionTimeStamp")?,
        })
    }

    /// The reward token this injector distributes.
    pub async fn inject_token(&self) -> Result<Address, ReadError> {
        let data = IRewardsInjector::getInjectTokenAddressCall {}.abi_encode();
        let ret = self.rpc.call(self.contract, data).await?;
        Ok(IRewardsInjector::getInjectTokenAddressCall::abi_decode_returns(&ret)?)
    }

    /// Reward-token balance held by the injector itself, decimal-adjusted
    /// with the token's known decimal count (18 fallback).
    pub async fn token_balance(&self) -> Result<TokenBalance, ReadError> {
        let token = self.inject_token().await?;
        let data = IERC20::balanceOfCall {
            account: self.contract,
        }
        .abi_encode();
        let ret = self.rpc.call(token, data).await?;
        let raw = IERC20::balanceOfCall::abi_decode_returns(&ret)?;

        let decimals = networks::token_decimals(token);
        let formatted = format_units(raw, decimals)?;

        Ok(TokenBalance {
            token,
            raw,
            decimals,
            formatted,
        })
    }

    /// Pool name behind a gauge recipient. Best-effort: any failure yields
    /// [`UNKNOWN_POOL`].
    pub async fn pool_name(&self, gauge: Address) -> String {
        match self.try_pool_name(gauge).await {
            Ok(name) => name,
            Err(err) => {
                debug!("pool name lookup failed for {gauge:#x}: {err}");
                UNKNOWN_POOL.to_string()
            }
        }
    }

    async fn try_pool_name(&self, gauge: Address) -> Result<String, ReadError> {
        let data = IChildChainGauge::lp_tokenCall {}.abi_encode();
        let ret = self.rpc.call(gauge, data).await?;
        let pool = IChildChainGauge::lp_tokenCall::abi_decode_returns(&ret)?;

        let data = IERC20::nameCall {}.abi_encode();
        let ret = self.rpc.call(pool, data).await?;
        Ok(IERC20::nameCall::abi_decode_returns(&ret)?)
    }

    /// When the gauge's current reward period for `token` ends. Best-effort:
    /// any failure yields 0, which the projector treats as "no fallback".
    pub async fn period_finish(&self, gauge: Address, token: Address) -> u64 {
        match self.try_period_finish(gauge, token).await {
            Ok(finish) => finish,
            Err(err) => {
                debug!("reward data lookup failed for {gauge:#x}: {err}");
                0
            }
        }
    }

    async fn try_period_finish(&self, gauge: Address, token: Address) -> Result<u64, ReadError> {
        let data = IChildChainGauge::reward_dataCall { token }.abi_encode();
        let ret = self.rpc.call(gauge, data).await?;
        let reward = IChildChainGauge::reward_dataCall::abi_decode_returns(&ret)?;
        narrow(reward.period_finish, "period_finish")
    }
}

fn narrow(value: U256, field: &'static str) -> Result<u64, ReadError> {
    value
        .try_into()
        .map_err(|_| ReadError::OutOfRange { field })
}
