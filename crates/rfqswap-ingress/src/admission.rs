//! Admission gates: stateless checks on the constraint word.
//!
//! Both gates run before the nonce is consumed, so a rejected fill leaves the
//! maker's invalidator untouched.

use alloy_primitives::Address;
use rfqswap_types::{Order, Result, SwapError};

/// The caller must be the order's allowed sender, unless the order is public.
pub fn authorize_caller(order: &Order, caller: Address) -> Result<()> {
    if order.constraints.is_allowed_sender(caller) {
        Ok(())
    } else {
        tracing::debug!(maker = %order.maker, %caller, "Caller is not the allowed sender");
        Err(SwapError::PrivateOrder { caller })
    }
}

/// The order must not be expired at ledger time `now`.
pub fn check_freshness(order: &Order, now: u64) -> Result<()> {
    if order.constraints.is_expired(now) {
        return Err(SwapError::OrderExpired {
            expiration: order.constraints.expiration(),
            now,
        });
    }
    Ok(())
}
