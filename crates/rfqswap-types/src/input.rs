//! Input codec: the packed per-fill request word.
//!
//! ```text
//!  255         254..253   252        251..248   247..0
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┐
//! │ isMaking │    -     │  unwrap  │    -     │  amount  │
//! └──────────┴──────────┴──────────┴──────────┴──────────┘
//! ```

use alloy_primitives::U256;

use crate::constants::{INPUT_AMOUNT_BITS, MAKING_AMOUNT_BIT, UNWRAP_NATIVE_BIT};

/// A decoded fill request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillInput {
    /// Requested amount; zero fills the quote in full.
    pub amount: U256,
    /// `amount` denotes the making side (otherwise the taking side).
    pub is_making_amount: bool,
    /// Pay the target in native asset when the maker asset is wrapped native.
    pub need_unwrap_weth: bool,
}

impl FillInput {
    /// Fill the whole quote.
    #[must_use]
    pub fn full() -> Self {
        Self::default()
    }

    /// Request `amount` of the maker asset.
    #[must_use]
    pub fn making(amount: U256) -> Self {
        Self {
            amount,
            is_making_amount: true,
            need_unwrap_weth: false,
        }
    }

    /// Request to pay `amount` of the taker asset.
    #[must_use]
    pub fn taking(amount: U256) -> Self {
        Self {
            amount,
            is_making_amount: false,
            need_unwrap_weth: false,
        }
    }

    #[must_use]
    pub fn with_unwrap(mut self) -> Self {
        self.need_unwrap_weth = true;
        self
    }

    /// Decode a packed input word. Reserved bits are ignored.
    #[must_use]
    pub fn decode(word: U256) -> Self {
        let amount_mask = (U256::from(1u8) << INPUT_AMOUNT_BITS) - U256::from(1u8);
        Self {
            amount: word & amount_mask,
            is_making_amount: word.bit(MAKING_AMOUNT_BIT),
            need_unwrap_weth: word.bit(UNWRAP_NATIVE_BIT),
        }
    }

    /// Pack into an input word; the amount is truncated to 248 bits.
    #[must_use]
    pub fn encode(&self) -> U256 {
        let amount_mask = (U256::from(1u8) << INPUT_AMOUNT_BITS) - U256::from(1u8);
        let mut word = self.amount & amount_mask;
        word.set_bit(MAKING_AMOUNT_BIT, self.is_making_amount);
        word.set_bit(UNWRAP_NATIVE_BIT, self.need_unwrap_weth);
        word
    }

    /// Whether the request asks for the whole quote.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.amount.is_zero()
    }
}

impl From<U256> for FillInput {
    fn from(word: U256) -> Self {
        Self::decode(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_word_is_full_taking_side_fill() {
        let input = FillInput::decode(U256::ZERO);
        assert!(input.is_full());
        assert!(!input.is_making_amount);
        assert!(!input.need_unwrap_weth);
    }

    #[test]
    fn documented_bit_positions() {
        let word = (U256::from(1u8) << 255) | (U256::from(1u8) << 252) | U256::from(40u8);
        let input = FillInput::decode(word);
        assert_eq!(input.amount, U256::from(40u8));
        assert!(input.is_making_amount);
        assert!(input.need_unwrap_weth);
    }

    #[test]
    fn reserved_bits_are_ignored() {
        let word = (U256::from(1u8) << 253) | (U256::from(1u8) << 250) | U256::from(9u8);
        let input = FillInput::decode(word);
        assert_eq!(input, FillInput::taking(U256::from(9u8)));
    }

    #[test]
    fn encode_matches_constructors() {
        let input = FillInput::making(U256::from(1234u32)).with_unwrap();
        assert_eq!(FillInput::decode(input.encode()), input);
        assert_eq!(FillInput::full().encode(), U256::ZERO);
    }

    #[test]
    fn amount_above_248_bits_is_truncated() {
        let input = FillInput::taking(U256::MAX);
        let decoded = FillInput::decode(input.encode());
        assert_eq!(decoded.amount, (U256::from(1u8) << 248) - U256::from(1u8));
        assert!(!decoded.is_making_amount);
    }
}
