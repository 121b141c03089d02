//! Order money rules
//!
//! Totals are always derived from the stored line prices; nothing the
//! client sends is trusted.

use rust_decimal::Decimal;

/// Largest value a `NUMERIC(10,2)` column can hold (99 999 999.99)
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// `quantity * price_at_order`, rounded to cents
pub fn line_total(quantity: i32, price_at_order: Decimal) -> Decimal {
    (Decimal::from(quantity) * price_at_order).round_dp(2)
}

/// Sum of `line_total` over `(quantity, price_at_order)` pairs
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (i32, Decimal)>,
{
    lines
        .into_iter()
        .map(|(quantity, price)| line_total(quantity, price))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(3, dec("10.99")), dec("32.97"));
        assert_eq!(line_total(1, dec("0.00")), Decimal::ZERO);
    }

    #[test]
    fn test_order_total_sums_lines() {
        let lines = vec![(2, dec("4.50")), (1, dec("12.00")), (3, dec("0.10"))];
        assert_eq!(order_total(lines), dec("21.30"));
    }

    #[test]
    fn test_empty_order_total_is_zero() {
        assert_eq!(order_total(Vec::<(i32, Decimal)>::new()), Decimal::ZERO);
    }

    #[test]
    fn test_no_float_drift() {
        // 0.1 * 1000 lines stays exact
        let lines = std::iter::repeat((1, dec("0.10"))).take(1000);
        assert_eq!(order_total(lines), dec("100.00"));
    }

    #[test]
    fn test_max_money_constant() {
        assert_eq!(MAX_MONEY, dec("99999999.99"));
    }
}
