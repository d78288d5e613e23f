//! Harvest
//!
//! Cart aggregation, product catalog and checkout handoff for the Organic
//! Harvest storefront. Everything is held in memory for a single shopping
//! session.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod store;
