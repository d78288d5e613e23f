//! Catalog
//!
//! In-memory product list behind the storefront and the admin panel.

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::products::{PLACEHOLDER_IMAGE, Product, ProductId};

/// Errors related to catalog changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No product exists with the given identifier.
    #[error("Product {0} not found")]
    NotFound(ProductId),

    /// Two products share the same identifier.
    #[error("Duplicate product id {0}")]
    DuplicateId(ProductId),

    /// The product name is blank.
    #[error("Product name cannot be empty")]
    EmptyName,

    /// The price or discount is below zero (field name).
    #[error("Product {0} cannot be negative")]
    NegativeAmount(&'static str),

    /// The discount is larger than the price, which would make the effective price negative.
    #[error("Discount {discount} exceeds price {price}")]
    DiscountExceedsPrice {
        /// Price in minor units
        price: i64,
        /// Discount in minor units
        discount: i64,
    },

    /// A product is priced in a different currency than the catalog (product currency, catalog currency).
    #[error("Product has currency {0}, but catalog has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Every product identifier up to `u64::MAX` has been handed out.
    #[error("No product identifiers left")]
    IdsExhausted,
}

/// Fields submitted from the admin form when creating or editing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
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

    /// Product image URL, replaced with a placeholder when missing
    pub image: Option<String>,
}

impl ProductDraft {
    /// Check the draft against the catalog currency and price rules.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first rule the draft breaks.
    pub fn validate(&self, currency: &'static Currency) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        for amount in [&self.price, &self.discount] {
            if amount.currency() != currency {
                return Err(CatalogError::CurrencyMismatch(
                    amount.currency().iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
        }

        let price = self.price.to_minor_units();
        let discount = self.discount.to_minor_units();

        if price < 0 {
            return Err(CatalogError::NegativeAmount("price"));
        }

        if discount < 0 {
            return Err(CatalogError::NegativeAmount("discount"));
        }

        if discount > price {
            return Err(CatalogError::DiscountExceedsPrice { price, discount });
        }

        Ok(())
    }

    fn into_product(self, id: ProductId) -> Product {
        let image = self
            .image
            .filter(|image| !image.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Product {
            id,
            name: self.name,
            price: self.price,
            discount: self.discount,
            description: self.description,
            category: self.category,
            image,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            discount: product.discount,
            description: product.description.clone(),
            category: product.category.clone(),
            image: Some(product.image.clone()),
        }
    }
}

/// Storefront search: name substring and optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the product name
    pub search: String,

    /// Exact category, or every category when `None`
    pub category: Option<String>,
}

impl CatalogQuery {
    /// Whether `product` satisfies the query.
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = product
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);

        matches_search && matches_category
    }
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    next_id: Option<ProductId>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: Vec::new(),
            next_id: Some(ProductId::new(1)),
            currency,
        }
    }

    /// Create a catalog from existing products, keeping their identifiers.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if two products share an identifier, or a
    /// product breaks the same rules [`ProductDraft::validate`] applies to
    /// admin edits.
    pub fn with_products(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);
        let mut seen = FxHashSet::default();

        for product in products {
            ProductDraft::from(&product).validate(currency)?;

            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }

            // Once `u64::MAX` is taken there is nothing left to assign
            catalog.next_id = catalog
                .next_id
                .zip(product.id.next())
                .map(|(current, next)| current.max(next));
            catalog.products.push(product);
        }

        Ok(catalog)
    }

    /// Products in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get the product for `id`.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Create a product from `draft`, assigning it a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the draft fails validation, or
    /// [`CatalogError::IdsExhausted`] once no identifier is left.
    pub fn create(&mut self, draft: ProductDraft) -> Result<&Product, CatalogError> {
        draft.validate(self.currency)?;

        let id = self.next_id.ok_or(CatalogError::IdsExhausted)?;
        self.next_id = id.next();

        info!(product = %id, name = %draft.name, "created product");

        let idx = self.products.len();
        self.products.push(draft.into_product(id));

        self.products.get(idx).ok_or(CatalogError::NotFound(id))
    }

    /// Replace every field of product `id` with `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown identifier, or another
    /// [`CatalogError`] if the draft fails validation.
    pub fn update(&mut self, id: ProductId, draft: ProductDraft) -> Result<&Product, CatalogError> {
        draft.validate(self.currency)?;

        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        *product = draft.into_product(id);

        info!(product = %id, name = %product.name, "updated product");

        Ok(product)
    }

    /// Remove product `id`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown identifier.
    pub fn delete(&mut self, id: ProductId) -> Result<Product, CatalogError> {
        let idx = self
            .products
            .iter()
            .position(|product| product.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        info!(product = %id, "deleted product");

        Ok(self.products.remove(idx))
    }

    /// Products matching `query`, in display order.
    pub fn search<'a>(&'a self, query: &'a CatalogQuery) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| query.matches(product))
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();

        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Get the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
