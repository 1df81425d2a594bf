//! # rfqswap-settlement
//!
//! **Finality Plane**: nonce invalidation, asset movement, and the atomic
//! fill orchestrator.
//!
//! ## Architecture
//!
//! The [`SwapEngine`] receives a maker-signed [`Order`](rfqswap_types::Order)
//! from a taker and:
//! 1. Authenticates the maker (via `rfqswap-ingress`)
//! 2. Consumes the order nonce in the maker's invalidator bitmap
//! 3. Computes the fill amounts at the quoted rate
//! 4. Moves both asset legs, calling maker and taker hooks in between
//! 5. Emits `OrderFilled`
//!
//! All state lives in a journaled [`Ledger`]; a failing call is reverted to
//! its checkpoint, and the [`SupplyConservation`] invariant holds after every
//! call.

pub mod amounts;
pub mod engine;
pub mod hooks;
pub mod invalidator;
mod journal;
pub mod ledger;
pub mod supply_conservation;

pub use amounts::{FillAmounts, compute_fill_amounts};
pub use engine::{CallContext, SwapEngine};
pub use hooks::{
    MakerHookCall, MakerInteraction, NativeReceiver, TakerInteraction, TakerInteractionCall,
};
pub use invalidator::Invalidator;
pub use journal::Checkpoint;
pub use ledger::Ledger;
pub use supply_conservation::SupplyConservation;
