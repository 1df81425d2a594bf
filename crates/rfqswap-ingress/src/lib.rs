//! # rfqswap-ingress
//!
//! **Security Envelope**: everything a fill must pass before it may touch
//! ledger state.
//!
//! ## Architecture
//!
//! 1. **SignatureVerifier**: authenticates the maker, either by ECDSA
//!    recovery over the order hash or through the maker contract's
//!    signature-validation callback
//! 2. **Admission**: stateless gates on the constraint word (allowed sender,
//!    expiry)
//!
//! ## Order Flow
//!
//! ```text
//! caller → SignatureVerifier.verify() → admission::authorize_caller()
//!        → admission::check_freshness() → settlement
//! ```
//!
//! Nothing in this crate mutates state; a rejected order leaves no trace.

pub mod admission;
pub mod signature;

pub use admission::{authorize_caller, check_freshness};
pub use signature::{ContractSigner, OrderSignature, SignatureVerifier, recover_signer};
