//! Monetary types and cent quantization.
//!
//! Every price, cost and P&L figure in the exchange is a [`Decimal`] with two
//! fractional digits. All arithmetic that produces a stored amount goes
//! through [`quantize`] or [`complement`], so rounding error is bounded to one
//! cent per operation and complementary prices always sum to exactly
//! [`HUNDRED`].

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Price of one contract on one side, in units where a winning contract pays 100.
pub type Price = Decimal;

/// An amount of money (costs, payouts, realized P&L).
pub type Money = Decimal;

/// Number of contracts held or traded.
pub type Quantity = u64;

/// Payout of a winning contract, and the sum of the YES and NO prices.
pub const HUNDRED: Decimal = dec!(100.00);

/// Zero with cent scale, so it renders as `0.00`.
pub const ZERO: Decimal = dec!(0.00);

/// Round to the nearest cent, ties away from zero.
#[must_use]
pub fn quantize(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // round_dp never adds scale; pin it so 60 and 60.00 render identically.
    rounded.rescale(2);
    rounded
}

/// The same quote expressed on the opposite side of the market.
#[must_use]
pub fn complement(price: Price) -> Price {
    quantize(HUNDRED - price)
}

/// Total cost of `quantity` contracts at `price`, unrounded.
#[must_use]
pub fn notional(price: Price, quantity: Quantity) -> Money {
    price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_carry_cent_scale() {
        assert_eq!(HUNDRED.to_string(), "100.00");
        assert_eq!(ZERO.to_string(), "0.00");
    }

    #[test]
    fn quantize_rounds_half_up() {
        assert_eq!(quantize(dec!(1.005)), dec!(1.01));
        assert_eq!(quantize(dec!(1.004)), dec!(1.00));
        assert_eq!(quantize(dec!(-1.005)), dec!(-1.01));
        assert_eq!(quantize(dec!(33.333333)), dec!(33.33));
    }

    #[test]
    fn quantize_pads_to_two_places() {
        assert_eq!(quantize(dec!(60)).to_string(), "60.00");
        assert_eq!(quantize(dec!(7.5)).to_string(), "7.50");
    }

    #[test]
    fn complement_sums_to_hundred() {
        for price in [dec!(0.01), dec!(33.33), dec!(50), dec!(72.004), dec!(99.99)] {
            let yes = quantize(price);
            assert_eq!(yes + complement(yes), HUNDRED);
        }
    }

    #[test]
    fn complement_of_boundaries() {
        assert_eq!(complement(dec!(0)), dec!(100.00));
        assert_eq!(complement(dec!(100)), dec!(0.00));
        assert_eq!(complement(dec!(40.00)), dec!(60.00));
    }

    #[test]
    fn notional_multiplies_by_contract_count() {
        assert_eq!(notional(dec!(60.00), 10), dec!(600.00));
        assert_eq!(notional(dec!(12.34), 0), dec!(0));
    }
}
