//! Supply conservation invariant checker.
//!
//! Mathematical invariant the ledger upholds after every call:
//! ```text
//! ∀ asset: Σ balances(asset) == Σ minted(asset) - Σ burned(asset)
//! ```
//!
//! Fills only move value between holders, so a fill must never change either
//! side of this equation. Wrapping native value mints the wrapped token and
//! unwrapping burns it; the native asset itself is tracked under
//! [`NATIVE_ASSET`](rfqswap_types::constants::NATIVE_ASSET).

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use rfqswap_types::{Result, SwapError};

/// Tracks per-asset issuance totals.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    /// Total minted per asset since genesis.
    minted: HashMap<Address, U256>,
    /// Total burned per asset since genesis.
    burned: HashMap<Address, U256>,
}

impl SupplyConservation {
    /// Create a new supply conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mint(&mut self, asset: Address, amount: U256) {
        let entry = self.minted.entry(asset).or_default();
        *entry = entry.saturating_add(amount);
    }

    pub fn record_burn(&mut self, asset: Address, amount: U256) {
        let entry = self.burned.entry(asset).or_default();
        *entry = entry.saturating_add(amount);
    }

    /// `(minted, burned)` for an asset.
    #[must_use]
    pub fn totals(&self, asset: Address) -> (U256, U256) {
        (
            self.minted.get(&asset).copied().unwrap_or_default(),
            self.burned.get(&asset).copied().unwrap_or_default(),
        )
    }

    /// Overwrite both totals; used when a call is rolled back.
    pub(crate) fn restore(&mut self, asset: Address, minted: U256, burned: U256) {
        self.minted.insert(asset, minted);
        self.burned.insert(asset, burned);
    }

    /// Expected circulating supply: minted - burned.
    #[must_use]
    pub fn expected_supply(&self, asset: Address) -> U256 {
        let (minted, burned) = self.totals(asset);
        minted.saturating_sub(burned)
    }

    /// Verify that the actual supply (sum of all holder balances) matches
    /// the expected supply for `asset`.
    ///
    /// # Errors
    /// Returns [`SwapError::SupplyInvariantViolation`] describing the
    /// mismatch.
    pub fn verify(&self, asset: Address, actual_supply: U256) -> Result<()> {
        let expected = self.expected_supply(asset);
        if actual_supply != expected {
            let (minted, burned) = self.totals(asset);
            return Err(SwapError::SupplyInvariantViolation {
                reason: format!(
                    "{asset}: actual {actual_supply} != expected {expected} \
                     (minted={minted}, burned={burned})"
                ),
            });
        }
        Ok(())
    }

    /// All assets with recorded issuance.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<Address> {
        let mut assets: Vec<Address> = self
            .minted
            .keys()
            .chain(self.burned.keys())
            .copied()
            .collect();
        assets.sort_unstable();
        assets.dedup();
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WETH: Address = Address::repeat_byte(0xee);
    const USDC: Address = Address::repeat_byte(0xcc);

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(WETH), U256::ZERO);
        assert!(sc.verify(WETH, U256::ZERO).is_ok());
    }

    #[test]
    fn mints_increase_expected() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(USDC, U256::from(1000u32));
        sc.record_mint(USDC, U256::from(500u32));
        assert_eq!(sc.expected_supply(USDC), U256::from(1500u32));
    }

    #[test]
    fn burns_decrease_expected() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(WETH, U256::from(1000u32));
        sc.record_burn(WETH, U256::from(300u32));
        assert_eq!(sc.expected_supply(WETH), U256::from(700u32));
        assert_eq!(sc.totals(WETH), (U256::from(1000u32), U256::from(300u32)));
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(WETH, U256::from(10u8));
        let err = sc.verify(WETH, U256::from(11u8)).unwrap_err();
        assert!(matches!(err, SwapError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn restore_rolls_back_totals() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(WETH, U256::from(10u8));
        let (minted, burned) = sc.totals(WETH);
        sc.record_burn(WETH, U256::from(4u8));
        sc.restore(WETH, minted, burned);
        assert_eq!(sc.expected_supply(WETH), U256::from(10u8));
    }

    #[test]
    fn tracked_assets_are_deduplicated() {
        let mut sc = SupplyConservation::new();
        sc.record_mint(WETH, U256::from(1u8));
        sc.record_burn(WETH, U256::from(1u8));
        sc.record_mint(USDC, U256::from(1u8));
        assert_eq!(sc.tracked_assets(), vec![USDC, WETH]);
    }
}
