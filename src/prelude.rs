//! Harvest prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, LineItem},
    catalog::{Catalog, CatalogError, CatalogQuery, ProductDraft},
    checkout::{CheckoutError, OrderLine, OrderSink, OrderSummary, WriterSink, place_order},
    fixtures::{Fixture, FixtureError},
    products::{Product, ProductId},
    store::{CartStore, CartSummary, SubscriptionKey},
};
