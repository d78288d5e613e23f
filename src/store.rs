//! Cart Store
//!
//! Shared, subscribable owner of the session cart. Every view that shows cart
//! state reads from the store and is notified when the cart changes.

use std::{fmt, num::NonZeroU32, rc::Rc};

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::{
    cart::{Cart, CartError, LineItem},
    products::{Product, ProductId},
};

new_key_type! {
    /// Subscription Key
    pub struct SubscriptionKey;
}

type Subscriber = Box<dyn FnMut(&Cart)>;

/// Derived figures for cart badges and headers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSummary {
    /// Number of distinct products
    pub distinct_items: usize,

    /// Sum of quantities
    pub item_count: u64,

    /// Cart total
    pub total: Money<'static, Currency>,
}

/// Cart Store
///
/// Holds the current cart as an immutable snapshot. Mutations build a new
/// snapshot and swap it in, so snapshots handed out earlier never change.
pub struct CartStore {
    cart: Rc<Cart>,
    subscribers: SlotMap<SubscriptionKey, Subscriber>,

    /// Subscription order; the slot map reuses freed slots.
    order: Vec<SubscriptionKey>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl CartStore {
    /// Create a store holding an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self::from_cart(Cart::new(currency))
    }

    /// Create a store seeded with an existing cart.
    pub fn from_cart(cart: Cart) -> Self {
        Self {
            cart: Rc::new(cart),
            subscribers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a callback run with the new cart after every change.
    ///
    /// Subscribers are called in the order they subscribed.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Cart) + 'static) -> SubscriptionKey {
        let key = self.subscribers.insert(Box::new(subscriber));
        self.order.push(key);

        key
    }

    /// Drop a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        if self.subscribers.remove(key).is_none() {
            return false;
        }

        self.order.retain(|subscribed| *subscribed != key);

        true
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Rc<Cart> {
        Rc::clone(&self.cart)
    }

    /// Current line items.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Current cart total.
    pub fn total(&self) -> Money<'static, Currency> {
        self.cart.total()
    }

    /// Current sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Badge/header figures for the current cart.
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            distinct_items: self.cart.len(),
            item_count: self.cart.item_count(),
            total: self.cart.total(),
        }
    }

    /// Add one unit of `product`. Returns whether the cart changed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in a
    /// different currency from the cart; the cart is left unchanged.
    pub fn add_item(&mut self, product: Product) -> Result<bool, CartError> {
        self.add_items(product, NonZeroU32::MIN)
    }

    /// Add `quantity` units of `product` with a single notification.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] as [`CartStore::add_item`] does.
    pub fn add_items(&mut self, product: Product, quantity: NonZeroU32) -> Result<bool, CartError> {
        let mut next = Cart::clone(&self.cart);

        if !next.add_items(product, quantity)? {
            return Ok(false);
        }

        self.publish(next);

        Ok(true)
    }

    /// Replace the quantity of an existing line; zero or below removes it.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        self.apply(|cart| cart.set_quantity(id, quantity))
    }

    /// Remove the line for `id`.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        self.apply(|cart| cart.remove_item(id).is_some())
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> bool {
        self.apply(|cart| {
            let changed = !cart.is_empty();
            cart.clear();
            changed
        })
    }

    /// Run `mutate` against a copy of the cart, publishing it if anything changed.
    fn apply(&mut self, mutate: impl FnOnce(&mut Cart) -> bool) -> bool {
        let mut next = Cart::clone(&self.cart);

        if !mutate(&mut next) {
            return false;
        }

        self.publish(next);

        true
    }

    fn publish(&mut self, cart: Cart) {
        self.cart = Rc::new(cart);

        trace!(
            subscribers = self.subscribers.len(),
            item_count = self.cart.item_count(),
            "publishing cart"
        );

        for key in &self.order {
            if let Some(subscriber) = self.subscribers.get_mut(*key) {
                subscriber(&self.cart);
            }
        }
    }
}
