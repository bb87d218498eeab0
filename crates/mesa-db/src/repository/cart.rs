//! # Cart Repository
//!
//! Database operations for carts and their line items - the cart
//! mutation engine.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Two handlers add the same dish concurrently                │
//! │                                                                         │
//! │  Task A: addToCart(cust, dish)      Task B: addToCart(cust, dish)      │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  INSERT .. ON CONFLICT              INSERT .. ON CONFLICT              │
//! │  DO UPDATE quantity+1               DO UPDATE quantity+1               │
//! │       │                                  │                              │
//! │       └──────────── SQLite serializes ───┘                              │
//! │                                                                         │
//! │  Result: quantity = 2, one row. Never a lost update, because the        │
//! │  read-decide-write span is a single conditional statement.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Removal and replacement cannot be collapsed into one statement, so they
//! run inside a write transaction that touches the cart row FIRST. The
//! touch takes SQLite's write lock before anything is read, which
//! serializes every mutation of the cart against every other one; a
//! concurrent reader sees either the whole transaction or none of it.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mesa_core::cart_math::{remove_action, RemoveAction};
use mesa_core::{Cart, CartEntry, CartItem};

/// The outcome of removing one unit of a dish.
#[derive(Debug, Clone)]
pub struct RemovedItem {
    /// The line item after the removal. When `deleted` is true, this is
    /// the final state the line had before it was dropped.
    pub item: CartItem,

    /// Whether the line item was deleted (quantity would have hit zero).
    pub deleted: bool,
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Gets a customer's cart.
    ///
    /// ## Returns
    /// * `Ok(Some(Cart))` - Cart found
    /// * `Ok(None)` - No cart for this customer (only possible if the
    ///   customer doesn't exist either; carts are created with customers)
    pub async fn find_by_customer(&self, customer_id: &str) -> DbResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, customer_id, created_at, updated_at
            FROM carts
            WHERE customer_id = ?1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Gets all line items of a cart.
    ///
    /// Ordered by insertion time; the order carries no meaning.
    pub async fn list_items(&self, cart_id: &str) -> DbResult<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, dish_id, quantity, created_at, updated_at
            FROM cart_items
            WHERE cart_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a single line item by dish.
    pub async fn find_item(&self, cart_id: &str, dish_id: &str) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, dish_id, quantity, created_at, updated_at
            FROM cart_items
            WHERE cart_id = ?1 AND dish_id = ?2
            "#,
        )
        .bind(cart_id)
        .bind(dish_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Adds one unit of a dish to a cart.
    ///
    /// ## Algorithm
    /// A single conditional upsert: insert a quantity-1 line, or bump the
    /// existing line's quantity by exactly 1 on `(cart_id, dish_id)`
    /// conflict. One statement, one write - two concurrent calls for the
    /// same dish always end at quantity 2, never 1.
    ///
    /// ## Returns
    /// The line item in its post-write state.
    pub async fn upsert_item(&self, cart_id: &str, dish_id: &str) -> DbResult<CartItem> {
        debug!(cart_id = %cart_id, dish_id = %dish_id, "Adding one unit to cart");

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        // Cart timestamp reflects the last mutation
        sqlx::query("UPDATE carts SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (id, cart_id, dish_id, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            ON CONFLICT (cart_id, dish_id)
            DO UPDATE SET quantity = quantity + 1, updated_at = ?4
            RETURNING id, cart_id, dish_id, quantity, created_at, updated_at
            "#,
        )
        .bind(&id)
        .bind(cart_id)
        .bind(dish_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(item)
    }

    /// Removes one unit of a dish from a cart.
    ///
    /// ## Algorithm
    /// Inside one write transaction (lock taken by the cart touch before
    /// the read, so concurrent removals serialize):
    /// - quantity > 1: decrement by 1 and persist
    /// - quantity == 1: delete the line item
    ///
    /// ## Returns
    /// * `Ok(Some(RemovedItem))` - One unit removed
    /// * `Ok(None)` - The dish has no line in this cart
    pub async fn remove_one(&self, cart_id: &str, dish_id: &str) -> DbResult<Option<RemovedItem>> {
        debug!(cart_id = %cart_id, dish_id = %dish_id, "Removing one unit from cart");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Write first: promotes this transaction to the writer before the
        // item is read, closing the read-decide-write race
        sqlx::query("UPDATE carts SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, dish_id, quantity, created_at, updated_at
            FROM cart_items
            WHERE cart_id = ?1 AND dish_id = ?2
            "#,
        )
        .bind(cart_id)
        .bind(dish_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut item) = existing else {
            tx.rollback().await?;
            return Ok(None);
        };

        let removed = match remove_action(item.quantity) {
            RemoveAction::Decrement(next) => {
                sqlx::query(
                    "UPDATE cart_items SET quantity = ?1, updated_at = ?2 WHERE id = ?3",
                )
                .bind(next)
                .bind(now)
                .bind(&item.id)
                .execute(&mut *tx)
                .await?;

                item.quantity = next;
                item.updated_at = now;
                RemovedItem {
                    item,
                    deleted: false,
                }
            }
            RemoveAction::Delete => {
                sqlx::query("DELETE FROM cart_items WHERE id = ?1")
                    .bind(&item.id)
                    .execute(&mut *tx)
                    .await?;

                RemovedItem {
                    item,
                    deleted: true,
                }
            }
        };

        tx.commit().await?;

        Ok(Some(removed))
    }

    /// Replaces every line item of a cart with the supplied entries.
    ///
    /// ## Algorithm
    /// One all-or-nothing transaction: delete all existing items, then
    /// insert one line per entry verbatim. A concurrent reader never
    /// observes the half-replaced cart. Entries are expected to already
    /// be aggregated (one per dish); a duplicate would violate the
    /// `UNIQUE (cart_id, dish_id)` constraint and roll the whole
    /// replacement back.
    ///
    /// ## Returns
    /// The freshly inserted line items.
    pub async fn replace_items(
        &self,
        cart_id: &str,
        entries: &[CartEntry],
    ) -> DbResult<Vec<CartItem>> {
        debug!(cart_id = %cart_id, count = entries.len(), "Replacing cart items");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE carts SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = CartItem {
                id: Uuid::new_v4().to_string(),
                cart_id: cart_id.to_string(),
                dish_id: entry.dish_id.clone(),
                quantity: entry.quantity,
                created_at: now,
                updated_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO cart_items (id, cart_id, dish_id, quantity, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.cart_id)
            .bind(&item.dish_id)
            .bind(item.quantity)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        tx.commit().await?;

        Ok(items)
    }

    /// Deletes every line item of a cart, keeping the cart row.
    ///
    /// Naturally idempotent: clearing an already-empty cart deletes zero
    /// rows and is not an error.
    ///
    /// ## Returns
    /// Number of line items deleted.
    pub async fn clear_items(&self, cart_id: &str) -> DbResult<u64> {
        debug!(cart_id = %cart_id, "Clearing cart");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE carts SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::customer::NewAddress;

    const DISH_A: &str = "11111111-1111-4111-8111-111111111111";
    const DISH_B: &str = "22222222-2222-4222-8222-222222222222";

    async fn db_with_cart() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer_id = Uuid::new_v4().to_string();
        db.customers()
            .create(
                &customer_id,
                &format!("{customer_id}@example.com"),
                NewAddress {
                    street: "Gran Via",
                    street_number: Some(12),
                    city: "Madrid",
                    province: "Madrid",
                    zip_code: "28013",
                    additional_info: None,
                },
            )
            .await
            .unwrap();

        let cart = db
            .carts()
            .find_by_customer(&customer_id)
            .await
            .unwrap()
            .expect("cart created with customer");

        (db, customer_id, cart.id)
    }

    #[tokio::test]
    async fn test_add_creates_then_increments() {
        let (db, _customer_id, cart_id) = db_with_cart().await;
        let carts = db.carts();

        let item = carts.upsert_item(&cart_id, DISH_A).await.unwrap();
        assert_eq!(item.quantity, 1);

        let item = carts.upsert_item(&cart_id, DISH_A).await.unwrap();
        assert_eq!(item.quantity, 2);

        // Still a single line for the dish
        let items = carts.list_items(&cart_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_concurrent_adds_never_lose_an_update() {
        let (db, _customer_id, cart_id) = db_with_cart().await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let carts = db.carts();
            let cart_id = cart_id.clone();
            handles.push(tokio::spawn(async move {
                carts.upsert_item(&cart_id, DISH_A).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let items = db.carts().list_items(&cart_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 8);
    }

    #[tokio::test]
    async fn test_remove_decrements_then_deletes() {
        let (db, _customer_id, cart_id) = db_with_cart().await;
        let carts = db.carts();

        carts.upsert_item(&cart_id, DISH_A).await.unwrap();
        carts.upsert_item(&cart_id, DISH_A).await.unwrap();

        let removed = carts.remove_one(&cart_id, DISH_A).await.unwrap().unwrap();
        assert!(!removed.deleted);
        assert_eq!(removed.item.quantity, 1);

        let removed = carts.remove_one(&cart_id, DISH_A).await.unwrap().unwrap();
        assert!(removed.deleted);

        // Line is gone; removing again reports absence
        assert!(carts.remove_one(&cart_id, DISH_A).await.unwrap().is_none());
        assert!(carts.list_items(&cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_discards_previous_items() {
        let (db, _customer_id, cart_id) = db_with_cart().await;
        let carts = db.carts();

        carts.upsert_item(&cart_id, DISH_A).await.unwrap();

        let entries = vec![
            CartEntry {
                dish_id: DISH_A.to_string(),
                quantity: 2,
            },
            CartEntry {
                dish_id: DISH_B.to_string(),
                quantity: 1,
            },
        ];
        let items = carts.replace_items(&cart_id, &entries).await.unwrap();
        assert_eq!(items.len(), 2);

        let stored = carts.list_items(&cart_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        let a = stored.iter().find(|i| i.dish_id == DISH_A).unwrap();
        assert_eq!(a.quantity, 2);
        let b = stored.iter().find(|i| i.dish_id == DISH_B).unwrap();
        assert_eq!(b.quantity, 1);
    }

    #[tokio::test]
    async fn test_replace_with_empty_list_clears() {
        let (db, _customer_id, cart_id) = db_with_cart().await;
        let carts = db.carts();

        carts.upsert_item(&cart_id, DISH_A).await.unwrap();
        let items = carts.replace_items(&cart_id, &[]).await.unwrap();
        assert!(items.is_empty());
        assert!(carts.list_items(&cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_reports_count_and_is_idempotent() {
        let (db, customer_id, cart_id) = db_with_cart().await;
        let carts = db.carts();

        carts.upsert_item(&cart_id, DISH_A).await.unwrap();
        carts.upsert_item(&cart_id, DISH_B).await.unwrap();

        assert_eq!(carts.clear_items(&cart_id).await.unwrap(), 2);
        // Cart row survives; clearing again is a zero-count no-op
        assert_eq!(carts.clear_items(&cart_id).await.unwrap(), 0);
        assert!(carts
            .find_by_customer(&customer_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_find_item() {
        let (db, _customer_id, cart_id) = db_with_cart().await;
        let carts = db.carts();

        assert!(carts.find_item(&cart_id, DISH_A).await.unwrap().is_none());
        carts.upsert_item(&cart_id, DISH_A).await.unwrap();
        let item = carts.find_item(&cart_id, DISH_A).await.unwrap().unwrap();
        assert_eq!(item.dish_id, DISH_A);
    }
}
