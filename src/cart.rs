//! Cart

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    pricing::line_minor,
    products::{Product, ProductId},
};

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),
}

/// A product paired with the quantity selected by the shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    product: Product,
    quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line item holding a single unit of `product`.
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    /// The product in this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Identifier of the product in this line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Number of units selected.
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// Amount charged per unit.
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.product.effective_price()
    }

    /// Line total in minor units.
    pub fn total_minor(&self) -> i64 {
        line_minor(self.product.effective_minor(), self.quantity.get())
    }

    /// Unit price multiplied by quantity.
    pub fn total(&self) -> Money<'static, Currency> {
        Money::from_minor(self.total_minor(), self.product.currency())
    }
}

/// Cart
///
/// Line items are kept in the order their products were first added, with at
/// most one line per product.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add one unit of `product`, appending a new line if it isn't in the cart yet.
    ///
    /// Returns whether the cart changed; a line already at `u32::MAX` stays put.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in a
    /// different currency from the cart. Products from one catalog share its
    /// currency, so this only happens when a product built elsewhere (another
    /// fixture set, a hand-made [`Product`]) is added.
    pub fn add_item(&mut self, product: Product) -> Result<bool, CartError> {
        self.add_items(product, NonZeroU32::MIN)
    }

    /// Add `quantity` units of `product` at once, as the product page's
    /// quantity selector does. Quantities saturate at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] under the same rule as
    /// [`Cart::add_item`].
    pub fn add_items(&mut self, product: Product, quantity: NonZeroU32) -> Result<bool, CartError> {
        if product.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id,
                product.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(item) = self.get_mut(product.id) {
            let next = item.quantity.saturating_add(quantity.get());

            if next == item.quantity {
                return Ok(false);
            }

            item.quantity = next;

            debug!(product = %item.id(), quantity = item.quantity(), "incremented line item");
        } else {
            debug!(product = %product.id, quantity = quantity.get(), "added line item");

            self.items.push(LineItem { product, quantity });
        }

        Ok(true)
    }

    /// Replace the quantity of an existing line. Zero or below removes the line.
    ///
    /// Unknown identifiers are left alone; a bare quantity never creates a line.
    /// Returns whether the cart changed.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        let Some(quantity) = positive_quantity(quantity) else {
            return self.remove_item(id).is_some();
        };

        let Some(item) = self.get_mut(id) else {
            debug!(product = %id, "ignored quantity change for unknown product");
            return false;
        };

        if item.quantity == quantity {
            return false;
        }

        item.quantity = quantity;

        debug!(product = %id, quantity = quantity.get(), "set line item quantity");

        true
    }

    /// Remove the line for `id`, returning it if it was present.
    pub fn remove_item(&mut self, id: ProductId) -> Option<LineItem> {
        let idx = self.items.iter().position(|item| item.id() == id)?;

        debug!(product = %id, "removed line item");

        Some(self.items.remove(idx))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of effective unit price times quantity across all lines.
    pub fn total(&self) -> Money<'static, Currency> {
        let minor = self
            .items
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.total_minor()));

        Money::from_minor(minor, self.currency)
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Get the line for `id`.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Convert a requested quantity into a positive one, saturating at `u32::MAX`.
fn positive_quantity(quantity: i64) -> Option<NonZeroU32> {
    if quantity <= 0 {
        return None;
    }

    NonZeroU32::new(u32::try_from(quantity).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{INR, USD};
    use testresult::TestResult;

    use super::*;

    fn product(id: u64, price: i64, discount: i64) -> Product {
        Product::new(ProductId::new(id), format!("Product {id}"), Money::from_minor(price, INR))
            .with_discount(Money::from_minor(discount, INR))
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(INR);

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), INR);
        assert_eq!(cart.total(), Money::from_minor(0, INR));
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn add_item_appends_new_lines_in_order() -> TestResult {
        let mut cart = Cart::new(INR);

        cart.add_item(product(2, 100, 0))?;
        cart.add_item(product(1, 100, 0))?;

        let ids: Vec<u64> = cart.iter().map(|item| item.id().get()).collect();

        assert_eq!(ids, vec![2, 1]);

        Ok(())
    }

    #[test]
    fn add_item_increments_existing_line() -> TestResult {
        let mut cart = Cart::new(INR);

        cart.add_item(product(1, 100, 0))?;
        cart.add_item(product(1, 100, 0))?;
        cart.add_item(product(1, 100, 0))?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).map(LineItem::quantity), Some(3));

        Ok(())
    }

    #[test]
    fn add_items_adds_several_units() -> TestResult {
        let mut cart = Cart::new(INR);
        let three = NonZeroU32::new(3).ok_or("zero")?;

        assert!(cart.add_items(product(1, 100, 0), three)?);
        assert!(cart.add_items(product(1, 100, 0), three)?);
        cart.add_item(product(2, 100, 0))?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(1)).map(LineItem::quantity), Some(6));
        assert_eq!(cart.item_count(), 7);

        Ok(())
    }

    #[test]
    fn add_item_at_max_quantity_is_not_a_change() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_items(product(1, 1, 0), NonZeroU32::MAX)?;

        let before = cart.clone();

        assert!(!cart.add_item(product(1, 1, 0))?);
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn add_item_rejects_other_currency() {
        let mut cart = Cart::new(INR);
        let dollars = Product::new(ProductId::new(9), "Import", Money::from_minor(100, USD));

        assert_eq!(
            cart.add_item(dollars),
            Err(CartError::CurrencyMismatch(
                ProductId::new(9),
                USD.iso_alpha_code,
                INR.iso_alpha_code
            ))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_replaces_quantity() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 100, 0))?;

        assert!(cart.set_quantity(ProductId::new(1), 5));
        assert_eq!(cart.item_count(), 5);

        // Same quantity again is not a change
        assert!(!cart.set_quantity(ProductId::new(1), 5));

        Ok(())
    }

    #[test]
    fn set_quantity_zero_or_negative_removes() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 100, 0))?;
        cart.add_item(product(2, 100, 0))?;

        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert!(cart.set_quantity(ProductId::new(2), -3));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_id_is_noop() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 100, 0))?;
        let before = cart.clone();

        assert!(!cart.set_quantity(ProductId::new(99), 4));
        assert!(!cart.set_quantity(ProductId::new(99), 0));
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn set_quantity_saturates_large_values() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 1, 0))?;

        cart.set_quantity(ProductId::new(1), i64::MAX);

        assert_eq!(cart.item_count(), u64::from(u32::MAX));

        Ok(())
    }

    #[test]
    fn remove_item_returns_removed_line() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 100, 0))?;

        let removed = cart.remove_item(ProductId::new(1));

        assert_eq!(removed.map(|item| item.id()), Some(ProductId::new(1)));
        assert!(cart.remove_item(ProductId::new(1)).is_none());

        Ok(())
    }

    #[test]
    fn total_uses_effective_price() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 1000, 200))?;
        cart.set_quantity(ProductId::new(1), 3);

        assert_eq!(cart.total(), Money::from_minor(2400, INR));

        Ok(())
    }

    #[test]
    fn item_count_sums_quantities() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 100, 0))?;
        cart.add_item(product(2, 100, 0))?;
        cart.set_quantity(ProductId::new(1), 2);
        cart.set_quantity(ProductId::new(2), 2);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 4);

        Ok(())
    }

    #[test]
    fn line_item_totals() {
        let item = LineItem::new(product(1, 2499, 300));

        assert_eq!(item.quantity(), 1);
        assert_eq!(item.unit_price(), Money::from_minor(2199, INR));
        assert_eq!(item.total(), Money::from_minor(2199, INR));
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1, 100, 0))?;
        cart.clear();

        assert!(cart.is_empty());

        Ok(())
    }
}
