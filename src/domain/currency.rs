// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::error::RouterError;
use alloy::primitives::{Address, U256};
use std::hash::{Hash, Hasher};

/// Chain-scoped fungible asset identity. Native assets carry the address of
/// their wrapped-token representation; equality and hashing always compare
/// the wrapped form, so native and wrapped compare equal on the same chain.
#[derive(Debug, Clone, Eq)]
pub enum Currency {
    Native {
        chain_id: u64,
        decimals: u8,
        symbol: String,
        wrapped: Address,
    },
    Token {
        chain_id: u64,
        address: Address,
        decimals: u8,
        symbol: String,
    },
}

impl Currency {
    pub fn native(chain_id: u64, decimals: u8, symbol: impl Into<String>, wrapped: Address) -> Self {
        Currency::Native {
            chain_id,
            decimals,
            symbol: symbol.into(),
            wrapped,
        }
    }

    pub fn token(chain_id: u64, address: Address, decimals: u8, symbol: impl Into<String>) -> Self {
        Currency::Token {
            chain_id,
            address,
            decimals,
            symbol: symbol.into(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Currency::Native { chain_id, .. } | Currency::Token { chain_id, .. } => *chain_id,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Currency::Native { decimals, .. } | Currency::Token { decimals, .. } => *decimals,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Currency::Native { symbol, .. } | Currency::Token { symbol, .. } => symbol,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native { .. })
    }

    /// Address after wrapping the native asset to its wrapped-token form.
    pub fn wrapped(&self) -> Address {
        match self {
            Currency::Native { wrapped, .. } => *wrapped,
            Currency::Token { address, .. } => *address,
        }
    }

    /// Address as Infinity pool managers see it: the zero sentinel for the
    /// native asset, the token address otherwise.
    pub fn infinity_address(&self) -> Address {
        match self {
            Currency::Native { .. } => Address::ZERO,
            Currency::Token { address, .. } => *address,
        }
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id() == other.chain_id() && self.wrapped() == other.wrapped()
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id().hash(state);
        self.wrapped().hash(state);
    }
}

/// Exact on-chain amount of a specific currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyAmount {
    currency: Currency,
    quotient: U256,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, quotient: U256) -> Self {
        Self { currency, quotient }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            currency,
            quotient: U256::ZERO,
        }
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn quotient(&self) -> U256 {
        self.quotient
    }

    pub fn is_zero(&self) -> bool {
        self.quotient.is_zero()
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self, RouterError> {
        self.require_same_currency(other, "add")?;
        Ok(Self {
            currency: self.currency.clone(),
            quotient: self.quotient.saturating_add(other.quotient),
        })
    }

    /// Saturates at zero rather than underflowing.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, RouterError> {
        self.require_same_currency(other, "sub")?;
        Ok(Self {
            currency: self.currency.clone(),
            quotient: self.quotient.saturating_sub(other.quotient),
        })
    }

    /// Integer share of the amount: `quotient * percent / 100`.
    pub fn percent_of(&self, percent: u32) -> Self {
        Self {
            currency: self.currency.clone(),
            quotient: self.quotient.saturating_mul(U256::from(percent)) / U256::from(100u64),
        }
    }

    fn require_same_currency(&self, other: &Self, op: &str) -> Result<(), RouterError> {
        if self.currency != other.currency {
            return Err(RouterError::CurrencyMismatch(format!(
                "{} on {}/{}",
                op,
                self.currency.symbol(),
                other.currency.symbol()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weth() -> Address {
        Address::from([0xee; 20])
    }

    #[test]
    fn native_equals_wrapped_token_on_same_chain() {
        let eth = Currency::native(1, 18, "ETH", weth());
        let wrapped = Currency::token(1, weth(), 18, "WETH");
        assert_eq!(eth, wrapped);

        let other_chain = Currency::token(10, weth(), 18, "WETH");
        assert_ne!(eth, other_chain);
    }

    #[test]
    fn mixed_currency_arithmetic_fails() {
        let a = CurrencyAmount::new(Currency::token(1, Address::from([1; 20]), 6, "USDC"), U256::from(100u64));
        let b = CurrencyAmount::new(Currency::token(1, Address::from([2; 20]), 18, "DAI"), U256::from(100u64));
        assert!(matches!(a.checked_add(&b), Err(RouterError::CurrencyMismatch(_))));

        let c = CurrencyAmount::new(a.currency().clone(), U256::from(50u64));
        assert_eq!(a.checked_add(&c).unwrap().quotient(), U256::from(150u64));
        assert_eq!(c.checked_sub(&a).unwrap().quotient(), U256::ZERO);
    }

    #[test]
    fn percent_share_is_integer_division() {
        let a = CurrencyAmount::new(Currency::token(1, Address::from([1; 20]), 6, "USDC"), U256::from(1001u64));
        assert_eq!(a.percent_of(50).quotient(), U256::from(500u64));
        assert_eq!(a.percent_of(100).quotient(), U256::from(1001u64));
    }
}
