//! System-wide constants for the RFQ swap settlement core.
//!
//! Bit offsets refer to the 256-bit packed words, least significant bit = 0.

// ---------------------------------------------------------------------------
// Constraint word
// ---------------------------------------------------------------------------

/// Width of the allowed-sender field (the full taker address).
pub const ALLOWED_SENDER_BITS: usize = 160;

/// Offset of the expiration timestamp.
pub const EXPIRATION_OFFSET: usize = 160;

/// Width of the expiration timestamp (unix seconds).
pub const EXPIRATION_BITS: usize = 40;

/// Offset of the order nonce.
pub const NONCE_OFFSET: usize = 200;

/// Width of the order nonce.
pub const NONCE_BITS: usize = 40;

/// Maker requires a post-interaction callback after leg 2.
pub const NEED_POST_INTERACTION_BIT: usize = 251;

/// Maker requires a pre-interaction callback before leg 1.
pub const NEED_PRE_INTERACTION_BIT: usize = 252;

/// A taker interaction may raise the taking amount above the quote.
pub const ALLOW_IMPROVE_RATE_BIT: usize = 254;

/// The quote may be filled for less than its full amounts.
pub const ALLOW_PARTIAL_FILLS_BIT: usize = 255;

// ---------------------------------------------------------------------------
// Input word
// ---------------------------------------------------------------------------

/// Width of the requested amount in the input word.
pub const INPUT_AMOUNT_BITS: usize = 248;

/// Unwrap the wrapped native asset before paying the target.
pub const UNWRAP_NATIVE_BIT: usize = 252;

/// The requested amount denotes the making side.
pub const MAKING_AMOUNT_BIT: usize = 255;

// ---------------------------------------------------------------------------
// Invalidator
// ---------------------------------------------------------------------------

/// Nonces per invalidator slot (one 256-bit word).
pub const NONCES_PER_SLOT: u64 = 256;

/// Shift turning a nonce into its slot index.
pub const SLOT_SHIFT: usize = 8;

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Ledger key standing in for the native asset in supply accounting.
pub const NATIVE_ASSET: alloy_primitives::Address = alloy_primitives::Address::ZERO;

// ---------------------------------------------------------------------------
// Signatures & defaults
// ---------------------------------------------------------------------------

/// Length of a raw `r || s || v` ECDSA signature.
pub const ECDSA_SIGNATURE_LEN: usize = 65;

/// Value a contract signer returns for a valid signature
/// (`bytes4(keccak256("isValidSignature(bytes32,bytes)"))`).
pub const ERC1271_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Gas handed to a native-asset receiver on payouts and refunds.
pub const DEFAULT_NATIVE_GAS_STIPEND: u64 = 2300;

/// Default EIP-712 domain name of the settlement contract.
pub const DEFAULT_DOMAIN_NAME: &str = "RFQ Swap";

/// Default EIP-712 domain version of the settlement contract.
pub const DEFAULT_DOMAIN_VERSION: &str = "1";

/// Default chain id used when none is configured.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// EIP-712 domain name used by token permits.
pub const PERMIT_DOMAIN_NAME: &str = "RFQ Token";

/// EIP-712 domain version used by token permits.
pub const PERMIT_DOMAIN_VERSION: &str = "1";
