//! Pricing

use rusty_money::{Money, iso::Currency};

/// Effective unit price in minor units: `price - discount`, never below zero.
pub fn effective_minor(price: &Money<'_, Currency>, discount: &Money<'_, Currency>) -> i64 {
    price
        .to_minor_units()
        .saturating_sub(discount.to_minor_units())
        .max(0)
}

/// Unit price multiplied by quantity, in minor units.
pub fn line_minor(unit_minor: i64, quantity: u32) -> i64 {
    unit_minor.saturating_mul(i64::from(quantity))
}

/// Amount with two decimal places and no currency symbol (e.g. `24.99`).
pub fn format_plain(money: &Money<'_, Currency>) -> String {
    format!("{:.2}", money.amount())
}

/// Amount with two decimal places prefixed by the currency symbol (e.g. `₹24.99`).
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    format!("{}{}", money.currency().symbol, format_plain(money))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};

    use super::*;

    #[test]
    fn effective_minor_subtracts_and_clamps() {
        let price = Money::from_minor(1000, INR);

        assert_eq!(effective_minor(&price, &Money::from_minor(200, INR)), 800);
        assert_eq!(effective_minor(&price, &Money::from_minor(1500, INR)), 0);
    }

    #[test]
    fn line_minor_multiplies_and_saturates() {
        assert_eq!(line_minor(800, 3), 2400);
        assert_eq!(line_minor(i64::MAX, 2), i64::MAX);
    }

    #[test]
    fn format_amount_has_two_decimals() {
        assert_eq!(format_plain(&Money::from_minor(500, INR)), "5.00");
        assert_eq!(format_amount(&Money::from_minor(2199, INR)), "₹21.99");
        assert_eq!(format_amount(&Money::from_minor(5, GBP)), "£0.05");
    }
}
