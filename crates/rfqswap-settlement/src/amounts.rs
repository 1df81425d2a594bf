//! Fill amount computation.
//!
//! Partial fills keep the quoted rate. The side the taker did not pin is
//! rounded in the maker's favour: a requested making amount costs
//! `ceil(amount * taking / making)`, a requested taking amount buys
//! `floor(amount * making / taking)`.

use alloy_primitives::U256;
use rfqswap_types::{FillInput, Order, Result, SwapError};

/// Amounts both legs of a fill move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillAmounts {
    pub making_amount: U256,
    pub taking_amount: U256,
}

/// `floor(a * b / d)`.
fn mul_div_floor(a: U256, b: U256, d: U256) -> Result<U256> {
    let product = a.checked_mul(b).ok_or(SwapError::ArithmeticOverflow)?;
    product.checked_div(d).ok_or(SwapError::ZeroAmountSwap)
}

/// `ceil(a * b / d)`.
fn mul_div_ceil(a: U256, b: U256, d: U256) -> Result<U256> {
    let product = a.checked_mul(b).ok_or(SwapError::ArithmeticOverflow)?;
    if d.is_zero() {
        return Err(SwapError::ZeroAmountSwap);
    }
    let (quotient, remainder) = product.div_rem(d);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        quotient
            .checked_add(U256::from(1u8))
            .ok_or(SwapError::ArithmeticOverflow)
    }
}

/// Amounts a fill of `order` with `input` moves, before any rate improvement.
///
/// With `strict_partial_fills`, a partial amount on an all-or-nothing quote
/// is rejected instead of being widened to the full quote.
pub fn compute_fill_amounts(
    order: &Order,
    input: &FillInput,
    strict_partial_fills: bool,
) -> Result<FillAmounts> {
    let amount = input.amount;
    let allow_partial = order.constraints.allow_partial_fills();

    let amounts = if amount.is_zero() || !allow_partial {
        if strict_partial_fills && !amount.is_zero() {
            let quoted = if input.is_making_amount {
                order.making_amount
            } else {
                order.taking_amount
            };
            if amount != quoted {
                return Err(SwapError::PartialFillNotAllowed);
            }
        }
        FillAmounts {
            making_amount: order.making_amount,
            taking_amount: order.taking_amount,
        }
    } else if input.is_making_amount {
        if amount > order.making_amount {
            return Err(SwapError::MakingAmountExceeded {
                requested: amount,
                quoted: order.making_amount,
            });
        }
        FillAmounts {
            making_amount: amount,
            taking_amount: mul_div_ceil(amount, order.taking_amount, order.making_amount)?,
        }
    } else {
        if amount > order.taking_amount {
            return Err(SwapError::TakingAmountExceeded {
                requested: amount,
                quoted: order.taking_amount,
            });
        }
        FillAmounts {
            making_amount: mul_div_floor(amount, order.making_amount, order.taking_amount)?,
            taking_amount: amount,
        }
    };

    if amounts.making_amount.is_zero() || amounts.taking_amount.is_zero() {
        return Err(SwapError::ZeroAmountSwap);
    }
    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use rfqswap_types::OrderConstraints;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    fn quote(making: u64, taking: u64, partial: bool) -> Order {
        let mut constraints = OrderConstraints::new(1);
        if partial {
            constraints = constraints.with_partial_fills();
        }
        Order::dummy(
            Address::repeat_byte(0xa1),
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            making,
            taking,
        )
        .with_constraints(constraints)
    }

    fn amounts(making: u64, taking: u64) -> FillAmounts {
        FillAmounts {
            making_amount: u(making),
            taking_amount: u(taking),
        }
    }

    #[test]
    fn zero_amount_fills_in_full() {
        let o = quote(100, 50, true);
        assert_eq!(
            compute_fill_amounts(&o, &FillInput::full(), false).unwrap(),
            amounts(100, 50)
        );
    }

    #[test]
    fn making_side_rounds_taking_up() {
        let o = quote(100, 50, true);
        let got = compute_fill_amounts(&o, &FillInput::making(u(40)), false).unwrap();
        assert_eq!(got, amounts(40, 20));
        let got = compute_fill_amounts(&o, &FillInput::making(u(41)), false).unwrap();
        assert_eq!(got, amounts(41, 21));
    }

    #[test]
    fn taking_side_rounds_making_down() {
        let o = quote(100, 30, true);
        let got = compute_fill_amounts(&o, &FillInput::taking(u(7)), false).unwrap();
        // 7 * 100 / 30 = 23.33
        assert_eq!(got, amounts(23, 7));
    }

    #[test]
    fn exceeding_quote_rejected() {
        let o = quote(100, 50, true);
        let err = compute_fill_amounts(&o, &FillInput::making(u(101)), false).unwrap_err();
        assert_eq!(
            err,
            SwapError::MakingAmountExceeded {
                requested: u(101),
                quoted: u(100)
            }
        );
        let err = compute_fill_amounts(&o, &FillInput::taking(u(51)), false).unwrap_err();
        assert_eq!(
            err,
            SwapError::TakingAmountExceeded {
                requested: u(51),
                quoted: u(50)
            }
        );
    }

    #[test]
    fn dust_is_zero_amount_swap() {
        let o = quote(100, 30, true);
        // ceil(1 * 30 / 100) = 1
        assert_eq!(
            compute_fill_amounts(&o, &FillInput::making(u(1)), false).unwrap(),
            amounts(1, 1)
        );
        let o = quote(30, 100, true);
        let err = compute_fill_amounts(&o, &FillInput::taking(u(1)), false).unwrap_err();
        assert_eq!(err, SwapError::ZeroAmountSwap);
    }

    #[test]
    fn all_or_nothing_widens_partial_request() {
        let o = quote(100, 50, false);
        assert_eq!(
            compute_fill_amounts(&o, &FillInput::making(u(10)), false).unwrap(),
            amounts(100, 50)
        );
    }

    #[test]
    fn strict_mode_rejects_partial_on_all_or_nothing() {
        let o = quote(100, 50, false);
        let err = compute_fill_amounts(&o, &FillInput::making(u(10)), true).unwrap_err();
        assert_eq!(err, SwapError::PartialFillNotAllowed);
        assert_eq!(
            compute_fill_amounts(&o, &FillInput::taking(u(50)), true).unwrap(),
            amounts(100, 50)
        );
        assert_eq!(
            compute_fill_amounts(&o, &FillInput::full(), true).unwrap(),
            amounts(100, 50)
        );
    }

    #[test]
    fn overflow_is_reported() {
        let mut o = quote(2, 2, true);
        o.taking_amount = U256::MAX;
        let err = compute_fill_amounts(&o, &FillInput::making(u(2)), false).unwrap_err();
        assert_eq!(err, SwapError::ArithmeticOverflow);
    }

    #[test]
    fn zero_quoted_amount_is_zero_amount_swap() {
        let o = quote(100, 0, false);
        let err = compute_fill_amounts(&o, &FillInput::full(), false).unwrap_err();
        assert_eq!(err, SwapError::ZeroAmountSwap);
    }

    #[test]
    fn proportional_fills_never_beat_the_quote() {
        let o = quote(997, 313, true);
        for requested in [1u64, 2, 50, 333, 996, 997] {
            let got = compute_fill_amounts(&o, &FillInput::making(u(requested)), false).unwrap();
            // taking / making >= 313 / 997
            assert!(got.taking_amount * u(997) >= got.making_amount * u(313));
        }
        for requested in [4u64, 17, 100, 312, 313] {
            let got = compute_fill_amounts(&o, &FillInput::taking(u(requested)), false).unwrap();
            assert!(got.taking_amount * u(997) >= got.making_amount * u(313));
        }
    }
}
