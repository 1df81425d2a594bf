//! Constraint codec: the packed word a maker signs alongside the amounts.
//!
//! ## Layout
//!
//! ```text
//!  255   254   253   252   251   250..240   239..200   199..160   159..0
//! ┌─────┬─────┬─────┬─────┬─────┬─────────┬──────────┬──────────┬──────────────┐
//! │ PF  │ IR  │  -  │ PRE │POST │    -    │  nonce   │ expiry   │ allowedSender│
//! └─────┴─────┴─────┴─────┴─────┴─────────┴──────────┴──────────┴──────────────┘
//! PF = allowPartialFills, IR = allowImproveRateViaInteraction
//! ```
//!
//! `allowedSender` holds the full taker address (zero = public),
//! `expiry` is unix seconds (0 = never). Every accessor is a mask/compare.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ALLOW_IMPROVE_RATE_BIT, ALLOW_PARTIAL_FILLS_BIT, ALLOWED_SENDER_BITS, EXPIRATION_BITS,
    EXPIRATION_OFFSET, NEED_POST_INTERACTION_BIT, NEED_PRE_INTERACTION_BIT, NONCE_BITS,
    NONCE_OFFSET,
};

/// Mask with the low `bits` bits set.
fn low_mask(bits: usize) -> U256 {
    (U256::from(1u8) << bits) - U256::from(1u8)
}

fn field(word: U256, offset: usize, bits: usize) -> U256 {
    (word >> offset) & low_mask(bits)
}

fn sender_word(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

/// The packed constraint word of an [`Order`](crate::Order).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(pub U256);

impl Constraints {
    /// Whether `caller` may fill: the field is unset or matches the caller.
    #[must_use]
    pub fn is_allowed_sender(&self, caller: Address) -> bool {
        let allowed = self.allowed_sender();
        allowed.is_zero() || allowed == caller
    }

    /// Whether the quote is expired at ledger time `now`.
    ///
    /// An expiration equal to `now` is still fillable.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        let expiration = self.expiration();
        expiration != 0 && now > expiration
    }

    /// The only taker allowed to fill, zero for public quotes.
    #[must_use]
    pub fn allowed_sender(&self) -> Address {
        Address::from_word(field(self.0, 0, ALLOWED_SENDER_BITS).into())
    }

    /// Expiration timestamp, 0 when the quote never expires.
    #[must_use]
    pub fn expiration(&self) -> u64 {
        field(self.0, EXPIRATION_OFFSET, EXPIRATION_BITS).to::<u64>()
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        field(self.0, NONCE_OFFSET, NONCE_BITS).to::<u64>()
    }

    #[must_use]
    pub fn allow_partial_fills(&self) -> bool {
        self.0.bit(ALLOW_PARTIAL_FILLS_BIT)
    }

    #[must_use]
    pub fn allow_improve_rate_via_interaction(&self) -> bool {
        self.0.bit(ALLOW_IMPROVE_RATE_BIT)
    }

    #[must_use]
    pub fn need_pre_interaction_call(&self) -> bool {
        self.0.bit(NEED_PRE_INTERACTION_BIT)
    }

    #[must_use]
    pub fn need_post_interaction_call(&self) -> bool {
        self.0.bit(NEED_POST_INTERACTION_BIT)
    }

    /// Decode every field at once.
    #[must_use]
    pub fn decode(&self) -> OrderConstraints {
        OrderConstraints {
            allowed_sender: self.allowed_sender(),
            expiration: self.expiration(),
            nonce: self.nonce(),
            allow_partial_fills: self.allow_partial_fills(),
            allow_improve_rate_via_interaction: self.allow_improve_rate_via_interaction(),
            need_pre_interaction_call: self.need_pre_interaction_call(),
            need_post_interaction_call: self.need_post_interaction_call(),
        }
    }
}

impl From<U256> for Constraints {
    fn from(word: U256) -> Self {
        Self(word)
    }
}

/// Decoded view of [`Constraints`], also used to build new words.
///
/// Integer fields wider than their slot are truncated on [`encode`](Self::encode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderConstraints {
    /// Allowed taker, zero for public quotes.
    pub allowed_sender: Address,
    pub expiration: u64,
    pub nonce: u64,
    pub allow_partial_fills: bool,
    pub allow_improve_rate_via_interaction: bool,
    pub need_pre_interaction_call: bool,
    pub need_post_interaction_call: bool,
}

impl OrderConstraints {
    /// Public, non-expiring, all-or-nothing quote with the given nonce.
    #[must_use]
    pub fn new(nonce: u64) -> Self {
        Self {
            nonce,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_allowed_sender(mut self, sender: Address) -> Self {
        self.allowed_sender = sender;
        self
    }

    #[must_use]
    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.expiration = expiration;
        self
    }

    #[must_use]
    pub fn with_partial_fills(mut self) -> Self {
        self.allow_partial_fills = true;
        self
    }

    #[must_use]
    pub fn with_rate_improvement(mut self) -> Self {
        self.allow_improve_rate_via_interaction = true;
        self
    }

    #[must_use]
    pub fn with_pre_interaction(mut self) -> Self {
        self.need_pre_interaction_call = true;
        self
    }

    #[must_use]
    pub fn with_post_interaction(mut self) -> Self {
        self.need_post_interaction_call = true;
        self
    }

    /// Pack into a constraint word.
    #[must_use]
    pub fn encode(&self) -> Constraints {
        let mut word = sender_word(self.allowed_sender);
        word |= (U256::from(self.expiration) & low_mask(EXPIRATION_BITS)) << EXPIRATION_OFFSET;
        word |= (U256::from(self.nonce) & low_mask(NONCE_BITS)) << NONCE_OFFSET;
        word.set_bit(ALLOW_PARTIAL_FILLS_BIT, self.allow_partial_fills);
        word.set_bit(ALLOW_IMPROVE_RATE_BIT, self.allow_improve_rate_via_interaction);
        word.set_bit(NEED_PRE_INTERACTION_BIT, self.need_pre_interaction_call);
        word.set_bit(NEED_POST_INTERACTION_BIT, self.need_post_interaction_call);
        Constraints(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TAKER: Address = address!("0x00000000000000000000aaaabbbbccccddddeeee");

    #[test]
    fn zero_word_is_public_unexpiring_full_fill() {
        let c = Constraints::default();
        assert!(c.is_allowed_sender(TAKER));
        assert!(!c.is_expired(u64::MAX));
        assert_eq!(c.nonce(), 0);
        assert!(!c.allow_partial_fills());
        assert!(!c.allow_improve_rate_via_interaction());
        assert!(!c.need_pre_interaction_call());
        assert!(!c.need_post_interaction_call());
    }

    #[test]
    fn documented_bit_positions() {
        assert!(Constraints(U256::from(1u8) << 255).allow_partial_fills());
        assert!(Constraints(U256::from(1u8) << 254).allow_improve_rate_via_interaction());
        assert!(Constraints(U256::from(1u8) << 252).need_pre_interaction_call());
        assert!(Constraints(U256::from(1u8) << 251).need_post_interaction_call());
        assert_eq!(Constraints(U256::from(7u8) << 200).nonce(), 7);
        assert_eq!(Constraints(U256::from(1_700_000_000u64) << 160).expiration(), 1_700_000_000);
        assert_eq!(
            Constraints(U256::from(0xabcdu32)).allowed_sender(),
            address!("0x000000000000000000000000000000000000abcd")
        );
    }

    #[test]
    fn flags_do_not_bleed_into_neighbours() {
        let c = OrderConstraints::new(0).with_pre_interaction().encode();
        assert!(c.need_pre_interaction_call());
        assert!(!c.need_post_interaction_call());
        assert!(!c.allow_improve_rate_via_interaction());
        assert_eq!(c.nonce(), 0);
    }

    #[test]
    fn encode_decode_keeps_fields() {
        let decoded = OrderConstraints::new(0x12_3456_789a)
            .with_allowed_sender(TAKER)
            .with_expiration(1_800_000_000)
            .with_partial_fills()
            .with_post_interaction();
        let word = decoded.encode();
        assert_eq!(word.decode(), decoded);
        assert_eq!(word.nonce(), 0x12_3456_789a);
    }

    #[test]
    fn nonce_is_truncated_to_forty_bits() {
        let word = OrderConstraints::new(u64::MAX).encode();
        assert_eq!(word.nonce(), (1u64 << 40) - 1);
        assert_eq!(word.expiration(), 0);
    }

    #[test]
    fn private_order_matches_whole_address() {
        let c = OrderConstraints::new(1).with_allowed_sender(TAKER).encode();
        assert_eq!(c.allowed_sender(), TAKER);
        assert!(c.is_allowed_sender(TAKER));
        assert!(!c.is_allowed_sender(Address::repeat_byte(0x01)));

        // Sharing the low bytes is not enough.
        let mut twin = TAKER.0;
        twin[0] = 0xff;
        assert!(!c.is_allowed_sender(Address::from(twin)));
    }

    #[test]
    fn sender_with_zero_low_bytes_stays_private() {
        let sender = address!("0x1234567890ab0000000000000000000000000000");
        let c = OrderConstraints::new(7).with_allowed_sender(sender).encode();
        assert_eq!(c.allowed_sender(), sender);
        assert!(c.is_allowed_sender(sender));
        assert!(!c.is_allowed_sender(address!("0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0")));
    }

    #[test]
    fn full_width_fields_do_not_overlap() {
        let decoded = OrderConstraints::new((1u64 << 40) - 1)
            .with_allowed_sender(Address::repeat_byte(0xff))
            .with_expiration((1u64 << 40) - 1);
        let word = decoded.encode();
        assert_eq!(word.decode(), decoded);
        assert!(!word.need_post_interaction_call());
        assert!(!word.allow_partial_fills());
    }

    #[test]
    fn expiry_boundary() {
        let c = OrderConstraints::new(1).with_expiration(1_000).encode();
        assert!(!c.is_expired(999));
        assert!(!c.is_expired(1_000));
        assert!(c.is_expired(1_001));
    }

    #[test]
    fn serde_is_transparent() {
        let c = OrderConstraints::new(5).with_partial_fills().encode();
        let json = serde_json::to_string(&c).unwrap();
        let back: Constraints = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
        assert!(json.starts_with("\"0x"));
    }
}
