//! Error types for the RFQ swap settlement core.
//!
//! All errors use the `RFQ_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order / authentication errors
//! - 2xx: Fill amount errors
//! - 3xx: Native value errors
//! - 4xx: Asset ledger errors
//! - 5xx: Interaction hook errors
//! - 8xx: Ledger invariant errors
//! - 9xx: General / internal errors
//!
//! Every failure is terminal: the enclosing call is reverted and nothing is
//! retried. Errors raised by collaborators (asset ledger, hooks, permits)
//! travel through `?` untouched.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Central error enum for all settlement operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    // =================================================================
    // Order / Authentication Errors (1xx)
    // =================================================================
    /// The signature does not authenticate the order's maker.
    #[error("RFQ_ERR_100: Bad signature")]
    BadSignature,

    /// The caller is not the order's allowed sender.
    #[error("RFQ_ERR_101: Private order: caller {caller} is not the allowed sender")]
    PrivateOrder { caller: Address },

    /// The order's expiration lies in the past.
    #[error("RFQ_ERR_102: Order expired at {expiration}, now {now}")]
    OrderExpired { expiration: u64, now: u64 },

    /// The order's nonce was already consumed by a fill or a cancellation.
    #[error("RFQ_ERR_103: Invalidated order")]
    InvalidatedOrder,

    /// Every bit of the requested invalidation mask is already set.
    #[error("RFQ_ERR_104: Already invalidated: maker {maker} slot {slot}")]
    AlreadyInvalidated { maker: Address, slot: U256 },

    // =================================================================
    // Fill Amount Errors (2xx)
    // =================================================================
    /// Requested making amount exceeds the quoted making amount.
    #[error("RFQ_ERR_200: Making amount exceeded: requested {requested}, quoted {quoted}")]
    MakingAmountExceeded { requested: U256, quoted: U256 },

    /// Requested taking amount exceeds the quoted taking amount.
    #[error("RFQ_ERR_201: Taking amount exceeded: requested {requested}, quoted {quoted}")]
    TakingAmountExceeded { requested: U256, quoted: U256 },

    /// The computed fill would move zero of one of the assets.
    #[error("RFQ_ERR_202: Zero amount swap")]
    ZeroAmountSwap,

    /// A partial amount was requested on an all-or-nothing quote.
    #[error("RFQ_ERR_203: Partial fill not allowed")]
    PartialFillNotAllowed,

    /// Proportional amount computation overflowed 256 bits.
    #[error("RFQ_ERR_204: Arithmetic overflow")]
    ArithmeticOverflow,

    // =================================================================
    // Native Value Errors (3xx)
    // =================================================================
    /// The attached native value does not fit the taker-asset leg.
    #[error("RFQ_ERR_300: Invalid msg value: attached {attached}, required {required}")]
    InvalidMsgValue { attached: U256, required: U256 },

    /// A native-asset payout or refund was rejected by the receiver.
    #[error("RFQ_ERR_301: ETH transfer failed to {to}")]
    ETHTransferFailed { to: Address },

    /// The account cannot cover the native value it tried to send.
    #[error("RFQ_ERR_302: Insufficient native balance for {account}: need {needed}, have {available}")]
    InsufficientNativeBalance {
        account: Address,
        needed: U256,
        available: U256,
    },

    // =================================================================
    // Asset Ledger Errors (4xx)
    // =================================================================
    /// Token balance too low for a transfer.
    #[error("RFQ_ERR_400: Insufficient balance of {asset} for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        asset: Address,
        holder: Address,
        needed: U256,
        available: U256,
    },

    /// Spender allowance too low for a `transferFrom`.
    #[error("RFQ_ERR_401: Insufficient allowance of {asset} from {owner}: need {needed}, have {available}")]
    InsufficientAllowance {
        asset: Address,
        owner: Address,
        needed: U256,
        available: U256,
    },

    /// The permit's deadline has passed.
    #[error("RFQ_ERR_402: Permit expired at {deadline}")]
    PermitExpired { deadline: u64 },

    /// The permit signature does not recover to the owner.
    #[error("RFQ_ERR_403: Invalid permit for {owner}")]
    InvalidPermit { owner: Address },

    // =================================================================
    // Interaction Hook Errors (5xx)
    // =================================================================
    /// An interaction hook reverted (or no hook lives at the target).
    #[error("RFQ_ERR_500: Interaction with {target} failed: {reason}")]
    InteractionFailed { target: Address, reason: String },

    // =================================================================
    // Ledger Invariant Errors (8xx)
    // =================================================================
    /// Σ balances no longer equals minted - burned for some asset.
    #[error("RFQ_ERR_800: Supply invariant violated: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("RFQ_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("RFQ_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
