//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{PLACEHOLDER_IMAGE, Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in display order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price (e.g., "24.99 INR")
    pub price: String,

    /// Discount off the price, in the same currency (e.g., "3.00 INR")
    #[serde(default)]
    pub discount: Option<String>,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Product category
    pub category: String,

    /// Product image URL
    #[serde(default)]
    pub image: Option<String>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let discount = match fixture.discount.as_deref() {
            Some(discount) => {
                let (minor_units, discount_currency) = parse_price(discount)?;

                if discount_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        discount_currency.iso_alpha_code.to_string(),
                    ));
                }

                Money::from_minor(minor_units, currency)
            }
            None => Money::from_minor(0, currency),
        };

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            price,
            discount,
            description: fixture.description,
            category: fixture.category,
            image: fixture
                .image
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        })
    }
}

/// Parse price string (e.g., "2.99 INR") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        "INR" => INR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
