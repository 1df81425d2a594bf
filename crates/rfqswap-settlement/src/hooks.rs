//! Callback seams the engine drives during a fill.
//!
//! Every hook receives the engine itself and may call back into it. Calls
//! made from a hook run inside the outer fill's checkpoint, so a failing
//! fill rolls back whatever its hooks did.

use alloy_primitives::{Address, B256, Bytes, U256};
use rfqswap_types::{Order, Result};

use crate::engine::SwapEngine;

/// Arguments of a maker pre- or post-interaction.
#[derive(Debug, Clone, Copy)]
pub struct MakerHookCall<'a> {
    pub order_hash: B256,
    pub order: &'a Order,
    /// Caller of the fill.
    pub taker: Address,
    /// Recipient of the maker asset.
    pub target: Address,
    pub making_amount: U256,
    pub taking_amount: U256,
}

/// Callbacks of a maker contract that asked for them in its constraint word.
pub trait MakerInteraction: Send + Sync {
    /// Runs after the nonce is consumed and before the maker asset moves.
    fn pre_interaction(&self, engine: &mut SwapEngine, call: &MakerHookCall<'_>) -> Result<()>;

    /// Runs after both legs with the final amounts.
    fn post_interaction(&self, engine: &mut SwapEngine, call: &MakerHookCall<'_>) -> Result<()>;
}

/// Arguments of a taker interaction.
#[derive(Debug, Clone, Copy)]
pub struct TakerInteractionCall<'a> {
    pub taker: Address,
    pub order_hash: B256,
    pub maker: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: U256,
    /// Taking amount computed from the quote.
    pub taking_amount: U256,
    /// Opaque payload supplied with the fill.
    pub data: &'a Bytes,
}

/// Hook a taker routes through between the two legs.
pub trait TakerInteraction: Send + Sync {
    /// Returns the taking amount the taker offers. An offer above
    /// `call.taking_amount` is adopted when the quote allows rate
    /// improvement; anything else is ignored.
    fn fill_interaction(
        &self,
        engine: &mut SwapEngine,
        call: &TakerInteractionCall<'_>,
    ) -> Result<U256>;
}

/// Contract account receiving native value.
///
/// Accounts without a receiver accept every payment.
pub trait NativeReceiver: Send + Sync {
    /// Whether the payment is accepted within `gas_stipend`.
    fn receive(&self, from: Address, amount: U256, gas_stipend: u64) -> bool;
}
