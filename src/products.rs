//! Products

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::pricing::effective_minor;

/// Image shown for products created without one.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/4110098/pexels-photo-4110098.jpeg?auto=compress&cs=tinysrgb&w=400";

/// Product Identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier following this one, or `None` past `u64::MAX`.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
///
/// Prices follow the price-minus-discount shape: a flat-priced product simply
/// carries a zero discount.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Base price
    pub price: Money<'static, Currency>,

    /// Amount taken off the base price
    pub discount: Money<'static, Currency>,

    /// Product description
    pub description: String,

    /// Product category
    pub category: String,

    /// Product image URL
    pub image: String,
}

impl Product {
    /// Create a product with no discount and empty display metadata.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money<'static, Currency>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            discount: Money::from_minor(0, price.currency()),
            description: String::new(),
            category: String::new(),
            image: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    /// Set the discount taken off the base price.
    #[must_use]
    pub fn with_discount(mut self, discount: Money<'static, Currency>) -> Self {
        self.discount = discount;
        self
    }

    /// Set the product category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Currency the product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.price.currency()
    }

    /// Effective unit price in minor units, clamped at zero.
    pub fn effective_minor(&self) -> i64 {
        effective_minor(&self.price, &self.discount)
    }

    /// Amount actually charged per unit: `price - discount`, never below zero.
    pub fn effective_price(&self) -> Money<'static, Currency> {
        Money::from_minor(self.effective_minor(), self.currency())
    }

    /// Amount saved per unit, at most the base price.
    pub fn savings(&self) -> Money<'static, Currency> {
        let price = self.price.to_minor_units().max(0);
        let discount = self.discount.to_minor_units().max(0);

        Money::from_minor(discount.min(price), self.currency())
    }

    /// Whether the product is sold below its base price.
    pub fn is_discounted(&self) -> bool {
        self.discount.to_minor_units() > 0
    }

    /// Discount as a whole percentage of the base price, rounded half away from zero.
    pub fn discount_percentage(&self) -> u32 {
        let price = self.price.to_minor_units();
        let savings = self.savings().to_minor_units();

        if price <= 0 || savings <= 0 {
            return 0;
        }

        Decimal::from(savings)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(Decimal::from(price)))
            .map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|rounded| rounded.to_u32())
            .unwrap_or(0)
    }
}
