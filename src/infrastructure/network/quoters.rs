// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, B256, U256};
use alloy::sol;

sol! {
    /// Pool identity as the Infinity pool managers key it. `parameters`
    /// packs the variant-specific layout (tick spacing for CL pools, bin
    /// step for bin pools).
    #[derive(Debug, PartialEq, Eq)]
    struct PoolKey {
        address currency0;
        address currency1;
        address hooks;
        address poolManager;
        uint24 fee;
        bytes32 parameters;
    }

    /// One hop of an Infinity quote path, keyed from the preceding
    /// currency to `intermediateCurrency`.
    #[derive(Debug, PartialEq, Eq)]
    struct PathKey {
        address intermediateCurrency;
        uint24 fee;
        address hooks;
        address poolManager;
        bytes hookData;
        bytes32 parameters;
    }

    #[derive(Debug, PartialEq, Eq)]
    contract V3Quoter {
        function quoteExactInputSingle(address tokenIn, address tokenOut, uint24 fee, uint256 amountIn, uint160 sqrtPriceLimitX96) external returns (uint256 amountOut, uint160 sqrtPriceX96After, uint32 initializedTicksCrossed, uint256 gasEstimate);
        function quoteExactInput(bytes path, uint256 amountIn) external returns (uint256 amountOut, uint160[] sqrtPriceX96AfterList, uint32[] initializedTicksCrossedList, uint256 gasEstimate);
        function quoteExactOutput(bytes path, uint256 amountOut) external returns (uint256 amountIn, uint160[] sqrtPriceX96AfterList, uint32[] initializedTicksCrossedList, uint256 gasEstimate);
    }

    #[derive(Debug, PartialEq, Eq)]
    contract InfinityClQuoter {
        struct QuoteExactParams {
            address exactCurrency;
            PathKey[] path;
            uint128 exactAmount;
        }
        function quoteExactInput(QuoteExactParams params) external returns (uint256 amountOut, uint256 gasEstimate);
        function quoteExactOutput(QuoteExactParams params) external returns (uint256 amountIn, uint256 gasEstimate);
    }

    #[derive(Debug, PartialEq, Eq)]
    contract InfinityBinQuoter {
        struct QuoteExactParams {
            address exactCurrency;
            PathKey[] path;
            uint128 exactAmount;
        }
        function quoteExactInput(QuoteExactParams params) external returns (uint256 amountOut, uint256 gasEstimate);
        function quoteExactOutput(QuoteExactParams params) external returns (uint256 amountIn, uint256 gasEstimate);
    }

    /// Quoter for routes crossing protocol families. `paths` lists the
    /// currency path, `actions` carries one pool-kind byte per hop, and
    /// `params` one ABI blob per hop.
    #[derive(Debug, PartialEq, Eq)]
    contract MixedQuoter {
        function quoteMixedExactInput(address[] paths, bytes actions, bytes[] params, uint256 amountIn) external returns (uint256 amountOut, uint256 gasEstimate);
    }

    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract Multicall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }
        struct Call3Result {
            bool success;
            bytes returnData;
        }
        function aggregate3(Call3[] calldata calls) external payable returns (Call3Result[] memory returnData);
    }
}

/// Mixed-quoter action bytes, one per pool hop.
pub const ACTION_STABLE_2: u8 = 0x00;
pub const ACTION_STABLE_3: u8 = 0x01;
pub const ACTION_V2: u8 = 0x02;
pub const ACTION_V3: u8 = 0x03;
pub const ACTION_INFINITY_CL: u8 = 0x04;
pub const ACTION_INFINITY_BIN: u8 = 0x05;

/// CL pool `parameters` layout: tick spacing occupies bits 16..40.
pub fn cl_parameters(tick_spacing: i32) -> B256 {
    B256::from(U256::from(tick_spacing as u32 & 0x00ff_ffff) << 16)
}

/// Bin pool `parameters` layout: bin step occupies bits 16..32.
pub fn bin_parameters(bin_step: u16) -> B256 {
    B256::from(U256::from(bin_step) << 16)
}

/// Deployed contract addresses one routing context quotes against.
#[derive(Debug, Clone, Copy)]
pub struct QuoterAddresses {
    pub multicall: Address,
    pub v3_quoter: Address,
    pub cl_quoter: Address,
    pub bin_quoter: Address,
    pub mixed_quoter: Address,
}
