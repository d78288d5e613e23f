//! Cart Fixtures

use serde::Deserialize;

use crate::products::ProductId;

/// Cart Fixture
///
/// Product identifiers in the order a shopper adds them; repeats raise the quantity.
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Product identifiers
    pub items: Vec<ProductId>,
}
