//! Order types for the RFQ swap settlement core.
//!
//! An [`Order`] only exists as signed data: nothing about it is stored on the
//! ledger except the invalidator bit that its fill or cancellation sets.

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::Constraints;

/// A maker-signed quote offering `making_amount` of `maker_asset` for
/// `taking_amount` of `taker_asset`.
///
/// The ratio `taking_amount / making_amount` is the fill exchange rate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The asset owner who signed the quote.
    pub maker: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: U256,
    pub taking_amount: U256,
    /// Packed nonce, expiry, allowed sender and flags.
    pub constraints: Constraints,
}

impl Order {
    /// Nonce used for invalidation.
    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.constraints.nonce()
    }
}

/// Result of a successful fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillOutcome {
    pub making_amount: U256,
    pub taking_amount: U256,
    pub order_hash: B256,
}

/// Log record emitted on every successful fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilled {
    pub order_hash: B256,
    pub making_amount: U256,
}

/// Taker-supplied interaction: the hook living at `target` is called between
/// the two asset legs with `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub target: Address,
    pub data: Bytes,
}

impl Interaction {
    #[must_use]
    pub fn new(target: Address, data: impl Into<Bytes>) -> Self {
        Self {
            target,
            data: data.into(),
        }
    }
}

/// Off-chain approval of the taker asset, consumed right before the fill.
///
/// The owner is the caller and the spender is the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitPayload {
    pub value: U256,
    pub deadline: u64,
    /// 65-byte `r || s || v` signature over the token's EIP-712 `Permit`.
    pub signature: Bytes,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// Public, non-expiring, all-or-nothing quote with a random nonce.
    pub fn dummy(
        maker: Address,
        maker_asset: Address,
        taker_asset: Address,
        making_amount: u64,
        taking_amount: u64,
    ) -> Self {
        let nonce = rand::random::<u64>() >> 24;
        Self {
            maker,
            maker_asset,
            taker_asset,
            making_amount: U256::from(making_amount),
            taking_amount: U256::from(taking_amount),
            constraints: crate::OrderConstraints::new(nonce).encode(),
        }
    }

    /// Same quote with a different constraint word.
    #[must_use]
    pub fn with_constraints(mut self, constraints: crate::OrderConstraints) -> Self {
        self.constraints = constraints.encode();
        self
    }
}
