//! Contract read interfaces
//!
//! Declared with `sol!` so calldata encoding and return-data decoding come
//! straight from the generated `SolCall` impls. Only the read surface the
//! dashboard touches is declared here; the injector's keeper/admin functions
//! are out of scope.

use alloy_sol_types::sol;

sol! {
    /// Read surface of the gauge rewards injector keeper contract.
    ///
    /// `getAccountInfo` returns the per-recipient schedule slot. The narrow
    /// on-chain field types (uint8 periods, uint56 timestamp) are declared as
    /// uint256 here; the ABI encoding is identical and decoding stays lossless.
    interface IRewardsInjector {
        function getWatchList() external view returns (address[] memory);
        function getAccountInfo(address targetAddress) external view returns (
            uint256 amountPerPeriod,
            bool isActive,
            uint256 maxPeriods,
            uint256 periodNumber,
            uint256 lastInjectionTimeStamp
        );
        function getInjectTokenAddress() external view returns (address);
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function name() external view returns (string memory);
    }

    /// Child-chain gauge surface used for best-effort auxiliary lookups.
    /// Vyper-style snake_case selectors are part of the deployed ABI.
    interface IChildChainGauge {
        function lp_token() external view returns (address);
        function reward_data(address token) external view returns (
            address distributor,
            uint256 period_finish,
            uint256 rate,
            uint256 last_update,
            uint256 integral
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;

    // Selector stability: the deployed contracts pin these exact signatures.
    #[test]
    fn test_injector_signatures() {
        assert_eq!(IRewardsInjector::getWatchListCall::SIGNATURE, "getWatchList()");
        assert_eq!(
            IRewardsInjector::getAccountInfoCall::SIGNATURE,
            "getAccountInfo(address)"
        );
        assert_eq!(
            IRewardsInjector::getInjectTokenAddressCall::SIGNATURE,
            "getInjectTokenAddress()"
        );
    }

    #[test]
    fn test_gauge_signatures() {
        assert_eq!(IChildChainGauge::lp_tokenCall::SIGNATURE, "lp_token()");
        assert_eq!(
            IChildChainGauge::reward_dataCall::SIGNATURE,
            "reward_data(address)"
        );
    }

    #[test]
    fn test_erc20_signatures() {
        assert_eq!(IERC20::balanceOfCall::SIGNATURE, "balanceOf(address)");
        assert_eq!(IERC20::nameCall::SIGNATURE, "name()");
    }
}
