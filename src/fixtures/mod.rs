//! Fixtures
//!
//! Mock catalog and cart data loaded from YAML.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    fixtures::{carts::CartFixture, products::ProductsFixture},
    products::{Product, ProductId},
};

pub mod carts;
pub mod products;

/// Catalog bundled with the crate.
pub const ORGANIC_HARVEST_YAML: &str = include_str!("../../fixtures/catalog/organic-harvest.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No products loaded yet
    #[error("No products loaded; currency unknown")]
    NoProducts,

    /// Not enough items in fixture
    #[error("Not enough items in fixture, available: {available}, requested: {requested}")]
    NotEnoughItems {
        /// Number of items defined in the fixture
        available: usize,
        /// Number of items requested
        requested: usize,
    },

    /// Catalog creation error
    #[error("Failed to create catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in the order they were loaded
    products: Vec<Product>,

    /// Product identifiers added to the fixture cart
    cart_items: Vec<ProductId>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            cart_items: Vec::new(),
            currency: None,
        }
    }

    /// Fixture holding the bundled Organic Harvest catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled YAML is invalid.
    pub fn organic_harvest() -> Result<Self, FixtureError> {
        let mut fixture = Self::new();
        fixture.add_products_yaml(ORGANIC_HARVEST_YAML)?;

        Ok(fixture)
    }

    /// Load products from a YAML fixture file under `catalog/`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));

        debug!(path = %file_path.display(), "loading catalog fixture");

        let contents = fs::read_to_string(&file_path)?;

        self.add_products_yaml(&contents)
    }

    /// Load cart contents from a YAML fixture file under `carts/`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));

        debug!(path = %file_path.display(), "loading cart fixture");

        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for id in fixture.items {
            if self.product(id).is_none() {
                return Err(FixtureError::ProductNotFound(id));
            }

            self.cart_items.push(id);
        }

        Ok(self)
    }

    /// Parse products from YAML and add them to the fixture
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a price is malformed, or
    /// products use different currencies.
    pub fn add_products_yaml(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

        for product_fixture in fixture.products {
            let product = Product::try_from(product_fixture)?;

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != product.currency() {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        product.currency().iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(product.currency());
            }

            self.products.push(product);
        }

        Ok(self)
    }

    /// Load a complete fixture set (catalog and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_cart(name)?;

        Ok(fixture)
    }

    /// Get a loaded product by identifier
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Get all loaded products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Currency shared by every loaded product
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoProducts`] if nothing has been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoProducts)
    }

    /// Build a catalog from the loaded products
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or if catalog creation fails.
    pub fn catalog(&self) -> Result<Catalog, FixtureError> {
        let currency = self.currency()?;

        Ok(Catalog::with_products(self.products.iter().cloned(), currency)?)
    }

    /// Build a cart from the first `n` fixture cart entries, or all of them
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded, if `n` exceeds the number
    /// of entries, or if a product cannot be added.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart, FixtureError> {
        let currency = self.currency()?;

        let entries = match n {
            Some(requested) => self.cart_items.get(..requested).ok_or(
                FixtureError::NotEnoughItems {
                    available: self.cart_items.len(),
                    requested,
                },
            )?,
            None => self.cart_items.as_slice(),
        };

        let mut cart = Cart::new(currency);

        for id in entries {
            let product = self
                .product(*id)
                .ok_or(FixtureError::ProductNotFound(*id))?;

            cart.add_item(product.clone())?;
        }

        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rusty_money::{Money, iso::INR};
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn organic_harvest_catalog_loads() -> TestResult {
        let fixture = Fixture::organic_harvest()?;
        let catalog = fixture.catalog()?;

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.currency(), INR);
        assert_eq!(
            catalog.categories(),
            vec!["rice", "grains", "pulses", "cereals"]
        );

        let lentils = catalog.get(ProductId::new(3)).ok_or("missing lentils")?;

        assert_eq!(lentils.discount, Money::from_minor(0, INR));

        Ok(())
    }

    #[test]
    fn from_set_builds_cart() -> TestResult {
        let fixture = Fixture::from_set("organic-harvest")?;
        let cart = fixture.cart(None)?;

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.total(), Money::from_minor(9894, INR));

        Ok(())
    }

    #[test]
    fn cart_with_prefix_of_entries() -> TestResult {
        let fixture = Fixture::from_set("organic-harvest")?;
        let cart = fixture.cart(Some(2))?;

        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn cart_rejects_too_many_entries() -> TestResult {
        let fixture = Fixture::from_set("organic-harvest")?;

        assert!(matches!(
            fixture.cart(Some(100)),
            Err(FixtureError::NotEnoughItems {
                available: 6,
                requested: 100
            })
        ));

        Ok(())
    }

    #[test]
    fn empty_fixture_has_no_currency() {
        let fixture = Fixture::with_base_path("/nonexistent");

        assert!(matches!(fixture.catalog(), Err(FixtureError::NoProducts)));
        assert!(matches!(fixture.cart(None), Err(FixtureError::NoProducts)));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let yaml = "
products:
  - id: 1
    name: Rice
    price: 1.00 INR
    category: rice
  - id: 2
    name: Oats
    price: 1.00 GBP
    category: cereals
";

        let result = Fixture::new().add_products_yaml(yaml).map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "INR" && found == "GBP"
        ));
    }

    #[test]
    fn cart_fixture_with_unknown_product_errors() -> TestResult {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("catalog"))?;
        fs::create_dir_all(dir.path().join("carts"))?;

        fs::write(dir.path().join("catalog/small.yml"), ORGANIC_HARVEST_YAML)?;
        fs::write(dir.path().join("carts/small.yml"), "items: [1, 42]\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("small")?;

        let result = fixture.load_cart("small").map(|_| ());

        assert!(matches!(
            result,
            Err(FixtureError::ProductNotFound(id)) if id == ProductId::new(42)
        ));

        Ok(())
    }

    #[test]
    fn missing_fixture_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("/nonexistent");

        let result = fixture.load_catalog("nope").map(|_| ());

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
