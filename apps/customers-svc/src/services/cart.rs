//! Cart operations: the service face of the cart mutation engine.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Every cart operation                               │
//! │                                                                         │
//! │  decoded payload                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate ids / entries (mesa-core)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  precondition lookups: customer exists? cart exists?                   │
//! │       │          (a miss aborts here - nothing written yet)            │
//! │       ▼                                                                 │
//! │  one engine call (mesa-db CartRepository)                              │
//! │       │          (atomic upsert / write transaction)                   │
//! │       ▼                                                                 │
//! │  result shaping for the reply                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::error::SvcError;
use mesa_core::cart_math::aggregate_entries;
use mesa_core::{validation, Cart, CartEntry, CartItem, CartWithItems, CoreError, MAX_CART_ITEMS};
use mesa_db::{Database, RemovedItem};

/// Cart operations exposed to the handler layer.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    /// Creates a new CartService.
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// Adds one unit of a dish to a customer's cart.
    ///
    /// ## Preconditions
    /// Customer exists, cart exists (the cart check is defensive - a cart
    /// is created with every customer).
    ///
    /// ## Returns
    /// The affected line item in its post-write state.
    pub async fn add_to_cart(&self, customer_id: &str, dish_id: &str) -> Result<CartItem, SvcError> {
        validation::validate_customer_id(customer_id)?;
        validation::validate_dish_id(dish_id)?;

        self.require_customer(customer_id).await?;
        let cart = self.require_cart(customer_id).await?;

        let item = self.db.carts().upsert_item(&cart.id, dish_id).await?;

        info!(customer_id = %customer_id, dish_id = %dish_id, quantity = item.quantity, "Added to cart");
        Ok(item)
    }

    /// Removes one unit of a dish from a customer's cart.
    ///
    /// Quantity drains by exactly 1 per call; the line is deleted when it
    /// would hit zero.
    ///
    /// ## Errors
    /// `NotFound` when the customer, the cart, or the dish's line is absent.
    pub async fn remove_from_cart(
        &self,
        customer_id: &str,
        dish_id: &str,
    ) -> Result<RemovedItem, SvcError> {
        validation::validate_customer_id(customer_id)?;
        validation::validate_dish_id(dish_id)?;

        self.require_customer(customer_id).await?;
        let cart = self.require_cart(customer_id).await?;

        let removed = self
            .db
            .carts()
            .remove_one(&cart.id, dish_id)
            .await?
            .ok_or_else(|| CoreError::DishNotInCart(dish_id.to_string()))?;

        info!(
            customer_id = %customer_id,
            dish_id = %dish_id,
            deleted = removed.deleted,
            "Removed from cart"
        );
        Ok(removed)
    }

    /// Replaces the whole cart with the caller-supplied entries.
    ///
    /// Entries are validated and aggregated by dish (duplicates sum their
    /// quantities) before the destructive replacement runs; the delete +
    /// recreate is a single all-or-nothing transaction.
    ///
    /// ## Returns
    /// The full cart with its fresh items.
    pub async fn set_cart(
        &self,
        customer_id: &str,
        entries: Vec<CartEntry>,
    ) -> Result<CartWithItems, SvcError> {
        validation::validate_customer_id(customer_id)?;
        validation::validate_entries(&entries)?;

        self.require_customer(customer_id).await?;
        let cart = self.require_cart(customer_id).await?;

        let entries = aggregate_entries(entries);
        if entries.len() > MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            }
            .into());
        }

        let items = self.db.carts().replace_items(&cart.id, &entries).await?;

        // Reload so the reply carries the cart's post-replacement timestamp
        let cart = self.require_cart(customer_id).await?;

        info!(customer_id = %customer_id, count = items.len(), "Cart replaced");
        Ok(CartWithItems { cart, items })
    }

    /// Clears every line item, keeping the cart.
    ///
    /// Invoked by the `restartCart` request and the `order_paid` event -
    /// one operation, two entry points. Clearing an already-empty cart
    /// reports zero deletions and is not an error.
    ///
    /// ## Returns
    /// Number of line items deleted.
    pub async fn restart_cart(&self, customer_id: &str) -> Result<u64, SvcError> {
        validation::validate_customer_id(customer_id)?;

        let cart = self.require_cart(customer_id).await?;
        let count = self.db.carts().clear_items(&cart.id).await?;

        info!(customer_id = %customer_id, count = count, "Cart restarted");
        Ok(count)
    }

    /// Lists a customer's cart items.
    pub async fn get_items(&self, customer_id: &str) -> Result<Vec<CartItem>, SvcError> {
        validation::validate_customer_id(customer_id)?;

        let cart = self.require_cart(customer_id).await?;
        let items = self.db.carts().list_items(&cart.id).await?;

        Ok(items)
    }

    // =========================================================================
    // Preconditions
    // =========================================================================

    async fn require_customer(&self, customer_id: &str) -> Result<(), SvcError> {
        match self.db.customers().find_by_id(customer_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::CustomerNotFound(customer_id.to_string()).into()),
        }
    }

    async fn require_cart(&self, customer_id: &str) -> Result<Cart, SvcError> {
        self.db
            .carts()
            .find_by_customer(customer_id)
            .await?
            .ok_or_else(|| CoreError::CartNotFound(customer_id.to_string()).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
