//! Invalidator bitmap store.
//!
//! Each maker owns a sparse map `slot -> 256-bit word`. Nonce `n` lives in
//! slot `n >> 8` at bit `n & 0xff`. A bit is set by a fill or a cancellation
//! and is never cleared again, except by reverting the call that set it.

use alloy_primitives::{Address, U256};
use rfqswap_types::{
    Result, SwapError,
    constants::{NONCES_PER_SLOT, SLOT_SHIFT},
};

use crate::ledger::Ledger;

/// Slot index and single-bit mask of `nonce`.
#[must_use]
pub fn slot_and_bit(nonce: U256) -> (U256, U256) {
    let slot = nonce >> SLOT_SHIFT;
    let bit = U256::from(1u8) << (nonce % U256::from(NONCES_PER_SLOT)).to::<usize>();
    (slot, bit)
}

/// View over the invalidator words of a [`Ledger`].
pub struct Invalidator<'a> {
    ledger: &'a mut Ledger,
}

impl<'a> Invalidator<'a> {
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Set the bit of `nonce` together with `additional_mask` in the same
    /// slot.
    ///
    /// Returns the new slot word.
    ///
    /// # Errors
    /// [`SwapError::AlreadyInvalidated`] when every requested bit is already
    /// set. Overlap with earlier invalidations is allowed as long as at least
    /// one requested bit is fresh.
    pub fn invalidate(&mut self, maker: Address, nonce: U256, additional_mask: U256) -> Result<U256> {
        let (slot, bit) = slot_and_bit(nonce);
        let mask = bit | additional_mask;
        let word = self.ledger.invalidator(maker, slot);
        if word & mask == mask {
            return Err(SwapError::AlreadyInvalidated { maker, slot });
        }
        let updated = word | mask;
        self.ledger.set_invalidator(maker, slot, updated);
        tracing::debug!(%maker, %slot, word = %updated, "Invalidator updated");
        Ok(updated)
    }
}

/// Current word of `maker`'s `slot`; zero when never written.
#[must_use]
pub fn view(ledger: &Ledger, maker: Address, slot: U256) -> U256 {
    ledger.invalidator(maker, slot)
}

/// Whether `nonce` of `maker` has been consumed.
#[must_use]
pub fn is_nonce_used(ledger: &Ledger, maker: Address, nonce: U256) -> bool {
    let (slot, bit) = slot_and_bit(nonce);
    !(ledger.invalidator(maker, slot) & bit).is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAKER: Address = Address::repeat_byte(0xa1);
    const OTHER: Address = Address::repeat_byte(0xa2);

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    #[test]
    fn slot_and_bit_layout() {
        assert_eq!(slot_and_bit(u(0)), (u(0), u(1)));
        assert_eq!(slot_and_bit(u(5)), (u(0), u(1 << 5)));
        assert_eq!(slot_and_bit(u(255)), (u(0), U256::from(1u8) << 255));
        assert_eq!(slot_and_bit(u(256)), (u(1), u(1)));
        assert_eq!(slot_and_bit(u(517)), (u(2), u(1 << 5)));
    }

    #[test]
    fn invalidate_sets_bit_once() {
        let mut ledger = Ledger::new();
        let word = Invalidator::new(&mut ledger)
            .invalidate(MAKER, u(5), U256::ZERO)
            .unwrap();
        assert_eq!(word, u(0x20));
        assert!(is_nonce_used(&ledger, MAKER, u(5)));
        assert!(!is_nonce_used(&ledger, MAKER, u(4)));

        let err = Invalidator::new(&mut ledger)
            .invalidate(MAKER, u(5), U256::ZERO)
            .unwrap_err();
        assert_eq!(err, SwapError::AlreadyInvalidated { maker: MAKER, slot: u(0) });
    }

    #[test]
    fn makers_are_independent() {
        let mut ledger = Ledger::new();
        Invalidator::new(&mut ledger)
            .invalidate(MAKER, u(9), U256::ZERO)
            .unwrap();
        assert!(!is_nonce_used(&ledger, OTHER, u(9)));
    }

    #[test]
    fn bulk_mask_with_partial_overlap_succeeds() {
        let mut ledger = Ledger::new();
        let mut inv = Invalidator::new(&mut ledger);
        inv.invalidate(MAKER, u(1), U256::ZERO).unwrap();
        // nonce 0 plus mask 0b110: bit 1 already set, bit 2 fresh
        let word = inv.invalidate(MAKER, u(0), u(0b110)).unwrap();
        assert_eq!(word, u(0b111));

        // everything requested is already set
        let err = inv.invalidate(MAKER, u(2), u(0b011)).unwrap_err();
        assert!(matches!(err, SwapError::AlreadyInvalidated { .. }));
        assert_eq!(view(&ledger, MAKER, u(0)), u(0b111));
    }

    #[test]
    fn bits_are_monotone() {
        let mut ledger = Ledger::new();
        let mut previous = U256::ZERO;
        for nonce in [3u64, 300, 7, 260, 3 + 256 * 4] {
            let _ = Invalidator::new(&mut ledger).invalidate(MAKER, u(nonce), U256::ZERO);
            let (slot, _) = slot_and_bit(u(nonce));
            let word = view(&ledger, MAKER, slot);
            assert!(is_nonce_used(&ledger, MAKER, u(nonce)));
            if slot.is_zero() {
                assert_eq!(word & previous, previous);
                previous = word;
            }
        }
    }

    #[test]
    fn revert_clears_bit() {
        let mut ledger = Ledger::new();
        let cp = ledger.checkpoint();
        Invalidator::new(&mut ledger)
            .invalidate(MAKER, u(42), U256::ZERO)
            .unwrap();
        ledger.checkpoint_revert(cp);
        assert!(!is_nonce_used(&ledger, MAKER, u(42)));
    }
}
