//! Harvest CLI

use std::io;

use clap::{Args, Parser, Subcommand};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartError,
    catalog::{Catalog, CatalogQuery},
    checkout::{CheckoutError, OrderSummary, WriterSink, place_order},
    config::{CatalogConfig, LoggingConfig},
    fixtures::{Fixture, FixtureError, ORGANIC_HARVEST_YAML},
    pricing::format_amount,
    products::{Product, ProductId},
    store::CartStore,
};

pub mod ops;

use ops::CartOp;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Fixture loading failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// A cart mutation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// No product exists with the given identifier.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Command line interface
#[derive(Debug, Parser)]
#[command(name = "harvest", about = "Organic Harvest storefront", long_about = None)]
pub struct Cli {
    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog settings
    #[command(flatten)]
    pub catalog: CatalogConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, optionally filtered by name and category
    Products(ProductsArgs),

    /// Show a single product
    Show(ShowArgs),

    /// Apply cart operations in order and hand the order off
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct ProductsArgs {
    /// Case-insensitive name search
    #[arg(short, long, default_value = "")]
    search: String,

    /// Category to list; all categories when omitted
    #[arg(short, long)]
    category: Option<String>,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Product identifier
    id: u64,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Operations: add:<id>, add:<id>x<qty>, set:<id>=<qty>, remove:<id>
    ops: Vec<CartOp>,
}

impl Cli {
    /// Run the selected command, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if fixtures fail to load, a product is unknown,
    /// checkout fails, or output cannot be written.
    pub fn run(&self, out: &mut impl io::Write) -> Result<(), CliError> {
        let fixture = self.load_fixture()?;
        let catalog = fixture.catalog()?;

        match &self.command {
            Commands::Products(args) => list_products(&catalog, args, out),
            Commands::Show(args) => show_product(&catalog, ProductId::new(args.id), out),
            Commands::Checkout(args) => checkout(&fixture, &catalog, &args.ops, out),
        }
    }

    fn load_fixture(&self) -> Result<Fixture, FixtureError> {
        let config = &self.catalog;
        let mut fixture = Fixture::with_base_path(&config.fixtures_dir);

        match config.catalog.as_deref() {
            Some(name) => fixture.load_catalog(name)?,
            None => fixture.add_products_yaml(ORGANIC_HARVEST_YAML)?,
        };

        if let Some(cart) = config.cart.as_deref() {
            fixture.load_cart(cart)?;
        }

        Ok(fixture)
    }
}

fn list_products(
    catalog: &Catalog,
    args: &ProductsArgs,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let query = CatalogQuery {
        search: args.search.clone(),
        category: args.category.clone(),
    };

    let products: Vec<&Product> = catalog.search(&query).collect();

    if products.is_empty() {
        writeln!(out, "No products found")?;
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Category", "Price", "Discount", "Now"]);

    for product in &products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            format_amount(&product.price),
            discount_badge(product),
            format_amount(&product.effective_price()),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, "{} products found", products.len())?;

    Ok(())
}

fn show_product(catalog: &Catalog, id: ProductId, out: &mut impl io::Write) -> Result<(), CliError> {
    let product = catalog.get(id).ok_or(CliError::ProductNotFound(id))?;

    writeln!(out, "{} (#{})", product.name, product.id)?;
    writeln!(out, "Category: {}", product.category)?;

    if product.is_discounted() {
        writeln!(
            out,
            "Price: {} (was {}, save {}, {} OFF)",
            format_amount(&product.effective_price()),
            format_amount(&product.price),
            format_amount(&product.savings()),
            discount_badge(product)
        )?;
    } else {
        writeln!(out, "Price: {}", format_amount(&product.price))?;
    }

    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }

    Ok(())
}

fn checkout(
    fixture: &Fixture,
    catalog: &Catalog,
    ops: &[CartOp],
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let mut store = CartStore::from_cart(fixture.cart(None)?);

    store.subscribe(|cart| {
        debug!(
            items = cart.item_count(),
            total = %format_amount(&cart.total()),
            "cart updated"
        );
    });

    for op in ops {
        match *op {
            CartOp::Add(id, quantity) => {
                let product = catalog.get(id).ok_or(CliError::ProductNotFound(id))?;
                store.add_items(product.clone(), quantity)?;
            }
            CartOp::Set(id, quantity) => {
                store.set_quantity(id, quantity);
            }
            CartOp::Remove(id) => {
                store.remove_item(id);
            }
        }
    }

    if store.cart().is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    OrderSummary::from_cart(&store.cart()).write_table(&mut *out)?;

    writeln!(out, "\nOrder details:")?;
    place_order(&mut store, &mut WriterSink::new(&mut *out))?;

    Ok(())
}

fn discount_badge(product: &Product) -> String {
    match product.discount_percentage() {
        0 => String::new(),
        percent => format!("-{percent}%"),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn run(args: &[&str]) -> TestResult<String> {
        let cli = Cli::try_parse_from(std::iter::once("harvest").chain(args.iter().copied()))?;

        let mut out = Vec::new();
        cli.run(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn products_lists_bundled_catalog() -> TestResult {
        let output = run(&["products"])?;

        assert!(output.contains("Organic Basmati Rice"));
        assert!(output.contains("-12%"));
        assert!(output.contains("5 products found"));

        Ok(())
    }

    #[test]
    fn products_filters_by_search_and_category() -> TestResult {
        let output = run(&["products", "--search", "organic", "--category", "rice"])?;

        assert!(output.contains("Organic Brown Rice"));
        assert!(!output.contains("Mixed Quinoa Grains"));
        assert!(output.contains("2 products found"));

        assert_eq!(
            run(&["products", "--category", "spices"])?,
            "No products found\n"
        );

        Ok(())
    }

    #[test]
    fn show_prints_discount_details() -> TestResult {
        let output = run(&["show", "1"])?;

        assert!(output.contains("Organic Basmati Rice (#1)"));
        assert!(output.contains("Price: ₹21.99 (was ₹24.99, save ₹3.00, -12% OFF)"));

        Ok(())
    }

    #[test]
    fn show_unknown_product_errors() -> TestResult {
        let cli = Cli::try_parse_from(["harvest", "show", "99"])?;

        assert!(matches!(
            cli.run(&mut Vec::<u8>::new()),
            Err(CliError::ProductNotFound(id)) if id == ProductId::new(99)
        ));

        Ok(())
    }

    #[test]
    fn checkout_applies_operations_in_order() -> TestResult {
        let output = run(&["checkout", "add:1", "add:1", "add:3", "set:1=5", "remove:3"])?;

        assert!(output.contains("Product Name\tPrice\tQuantity"));
        assert!(output.contains("Organic Basmati Rice\t21.99\t5"));
        assert!(!output.contains("Organic Red Lentils\t"));
        assert!(output.contains("Total: ₹109.95"));

        Ok(())
    }

    #[test]
    fn checkout_adds_selected_quantity() -> TestResult {
        let output = run(&["checkout", "add:3x4", "add:3"])?;

        assert!(output.contains("Organic Red Lentils\t12.99\t5"));
        assert!(output.contains("Total: ₹64.95"));

        Ok(())
    }

    #[test]
    fn checkout_with_nothing_added_reports_empty_cart() -> TestResult {
        assert_eq!(run(&["checkout", "set:1=4"])?, "Your cart is empty\n");

        Ok(())
    }

    #[test]
    fn checkout_seeds_cart_from_fixture() -> TestResult {
        let output = run(&[
            "--catalog",
            "organic-harvest",
            "--cart",
            "organic-harvest",
            "checkout",
        ])?;

        assert!(output.contains("Total: ₹98.94"));

        Ok(())
    }

    #[test]
    fn checkout_rejects_invalid_operation() {
        assert!(Cli::try_parse_from(["harvest", "checkout", "buy:1"]).is_err());
    }
}
