//! Checkout
//!
//! Renders the cart for the order-submission handoff and passes it on.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::info;

use crate::{
    cart::Cart,
    pricing::{format_amount, format_plain},
    store::CartStore,
};

/// Errors raised while handing an order off.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no line items.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Writing the order failed.
    #[error("Failed to write order: {0}")]
    Io(#[from] io::Error),
}

/// One row of an order summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Product name
    pub name: String,

    /// Effective unit price
    pub unit_price: Money<'static, Currency>,

    /// Units ordered
    pub quantity: u32,

    /// Unit price multiplied by quantity
    pub total: Money<'static, Currency>,
}

/// Order Summary
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    lines: SmallVec<[OrderLine; 8]>,
    total: Money<'static, Currency>,
}

impl OrderSummary {
    /// Summarise the current contents of `cart`.
    pub fn from_cart(cart: &Cart) -> Self {
        let lines = cart
            .iter()
            .map(|item| OrderLine {
                name: item.product().name.clone(),
                unit_price: item.unit_price(),
                quantity: item.quantity(),
                total: item.total(),
            })
            .collect();

        Self {
            lines,
            total: cart.total(),
        }
    }

    /// Order lines in cart order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Order total.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Check if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Tab-separated rendering sent to the order form. Empty orders render as `""`.
    pub fn to_plain_text(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut text = String::from("Product Name\tPrice\tQuantity");

        for line in &self.lines {
            text.push('\n');
            text.push_str(&format!(
                "{}\t{}\t{}",
                line.name,
                format_plain(&line.unit_price),
                line.quantity
            ));
        }

        text.push_str(&format!("\nTotal: {}", format_amount(&self.total)));

        text
    }

    /// Write a terminal table of the order followed by its total.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Io`] if writing to `out` fails.
    pub fn write_table(&self, mut out: impl io::Write) -> Result<(), CheckoutError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Price", "Qty", "Total"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                format_amount(&line.unit_price),
                line.quantity.to_string(),
                format_amount(&line.total),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.modify(Columns::new(1..4), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, " Total: {}", format_amount(&self.total))?;

        Ok(())
    }
}

/// External collaborator receiving the rendered order.
pub trait OrderSink {
    /// Deliver the plain-text order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the order could not be delivered.
    fn submit(&mut self, order: &str) -> Result<(), CheckoutError>;
}

/// Order sink writing each order to an [`io::Write`].
#[derive(Debug)]
pub struct WriterSink<W> {
    out: W,
}

impl<W: io::Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> OrderSink for WriterSink<W> {
    fn submit(&mut self, order: &str) -> Result<(), CheckoutError> {
        writeln!(self.out, "{order}")?;
        self.out.flush()?;

        Ok(())
    }
}

/// Hand the store's cart off to `sink` and empty the cart once it's accepted.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing to order, or the
/// sink's error if delivery fails. The cart is only cleared on success.
pub fn place_order(
    store: &mut CartStore,
    sink: &mut impl OrderSink,
) -> Result<OrderSummary, CheckoutError> {
    let summary = OrderSummary::from_cart(&store.cart());

    if summary.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    sink.submit(&summary.to_plain_text())?;

    info!(
        lines = summary.lines().len(),
        total = %format_amount(&summary.total()),
        "order handed off"
    );

    store.clear();

    Ok(summary)
}
