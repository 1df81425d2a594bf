//! # rfqswap-types
//!
//! Shared types, errors, and configuration for the **RFQ swap** settlement core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Order model**: [`Order`], [`FillOutcome`], [`OrderFilled`], [`Interaction`], [`PermitPayload`]
//! - **Constraint codec**: [`Constraints`], [`OrderConstraints`]
//! - **Input codec**: [`FillInput`]
//! - **Hashing**: [`order_hash`], [`DomainConfig::domain`]
//! - **Configuration**: [`SettlementConfig`], [`DomainConfig`]
//! - **Errors**: [`SwapError`] with `RFQ_ERR_` prefix codes
//! - **Constants**: bit layouts and defaults

pub mod config;
pub mod constants;
pub mod constraints;
pub mod error;
pub mod hashing;
pub mod input;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use rfqswap_types::{Order, Constraints, FillInput, SwapError, ...};

pub use config::*;
pub use constraints::*;
pub use error::*;
pub use hashing::*;
pub use input::*;
pub use order::*;

// Constants are accessed via `rfqswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
