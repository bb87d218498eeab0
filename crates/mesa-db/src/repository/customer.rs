//! # Customer Repository
//!
//! Database operations for customers, their embedded address, and the
//! cart every customer owns.
//!
//! ## Customer Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Customer Lifecycle                                 │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → customer + address + empty cart, one transaction    │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── find_by_id() / find_by_email() / list() + count()              │
//! │                                                                         │
//! │  3. UPDATE                                                             │
//! │     └── update_address() → replaces the address fields                 │
//! │                                                                         │
//! │  4. DELETE                                                             │
//! │     └── delete() → address, cart, and items follow via cascade         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::{Address, Cart, Customer, CustomerProfile, Pagination};

/// Address fields for a create or update, borrowed from the request.
#[derive(Debug, Clone, Copy)]
pub struct NewAddress<'a> {
    pub street: &'a str,
    pub street_number: Option<i64>,
    pub city: &'a str,
    pub province: &'a str,
    pub zip_code: &'a str,
    pub additional_info: Option<&'a str>,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates a customer together with their address and an empty cart.
    ///
    /// ## Atomicity
    /// All three rows are written in one transaction; a customer without
    /// a cart (or a cart without a customer) is never observable, which
    /// is what lets the cart engine treat a missing cart as a defect
    /// rather than a state.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - email (or id) already registered
    pub async fn create(
        &self,
        id: &str,
        email: &str,
        address: NewAddress<'_>,
    ) -> DbResult<CustomerProfile> {
        debug!(id = %id, "Creating customer");

        let now = Utc::now();

        let customer = Customer {
            id: id.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        let address = Address {
            id: Uuid::new_v4().to_string(),
            customer_id: id.to_string(),
            street: address.street.to_string(),
            street_number: address.street_number,
            city: address.city.to_string(),
            province: address.province.to_string(),
            zip_code: address.zip_code.to_string(),
            additional_info: address.additional_info.map(str::to_string),
        };
        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            customer_id: id.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, email, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.email)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO addresses (
                id, customer_id, street, street_number,
                city, province, zip_code, additional_info
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&address.id)
        .bind(&address.customer_id)
        .bind(&address.street)
        .bind(address.street_number)
        .bind(&address.city)
        .bind(&address.province)
        .bind(&address.zip_code)
        .bind(&address.additional_info)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.customer_id)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CustomerProfile { customer, address })
    }

    /// Gets a customer with their address.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<CustomerProfile>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(customer) = customer else {
            return Ok(None);
        };

        let address = sqlx::query_as::<_, Address>(
            r#"
            SELECT id, customer_id, street, street_number,
                   city, province, zip_code, additional_info
            FROM addresses
            WHERE customer_id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(CustomerProfile { customer, address }))
    }

    /// Gets a customer by email (without the address).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, created_at, updated_at
            FROM customers
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists one page of customers.
    pub async fn list(&self, pagination: Pagination) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, created_at, updated_at
            FROM customers
            ORDER BY created_at
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(i64::from(pagination.limit))
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Counts all customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Replaces a customer's address fields.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no address row for this customer
    pub async fn update_address(
        &self,
        customer_id: &str,
        address: NewAddress<'_>,
    ) -> DbResult<()> {
        debug!(customer_id = %customer_id, "Updating customer address");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE addresses SET
                street = ?2,
                street_number = ?3,
                city = ?4,
                province = ?5,
                zip_code = ?6,
                additional_info = ?7
            WHERE customer_id = ?1
            "#,
        )
        .bind(customer_id)
        .bind(address.street)
        .bind(address.street_number)
        .bind(address.city)
        .bind(address.province)
        .bind(address.zip_code)
        .bind(address.additional_info)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::not_found("Address", customer_id));
        }

        sqlx::query("UPDATE customers SET updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Deletes a customer.
    ///
    /// The address, cart, and cart items follow via `ON DELETE CASCADE`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - customer does not exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    const DISH: &str = "11111111-1111-4111-8111-111111111111";

    fn address() -> NewAddress<'static> {
        NewAddress {
            street: "Gran Via",
            street_number: Some(12),
            city: "Madrid",
            province: "Madrid",
            zip_code: "28013",
            additional_info: Some("3B"),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = test_db().await;
        let customers = db.customers();

        let id = Uuid::new_v4().to_string();
        let created = customers
            .create(&id, "ana@example.com", address())
            .await
            .unwrap();
        assert_eq!(created.customer.email, "ana@example.com");
        assert_eq!(created.address.zip_code, "28013");

        let found = customers.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.customer.id, id);
        assert_eq!(found.address.street, "Gran Via");

        let by_email = customers
            .find_by_email("ana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, id);
    }

    #[tokio::test]
    async fn test_create_also_creates_cart() {
        let db = test_db().await;

        let id = Uuid::new_v4().to_string();
        db.customers()
            .create(&id, "cart@example.com", address())
            .await
            .unwrap();

        let cart = db.carts().find_by_customer(&id).await.unwrap();
        assert!(cart.is_some(), "cart must exist as soon as the customer does");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_unique_violation() {
        let db = test_db().await;
        let customers = db.customers();

        customers
            .create(&Uuid::new_v4().to_string(), "dup@example.com", address())
            .await
            .unwrap();

        let err = customers
            .create(&Uuid::new_v4().to_string(), "dup@example.com", address())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The failed create must not leave partial rows behind
        assert_eq!(customers.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_cart_and_items() {
        let db = test_db().await;

        let id = Uuid::new_v4().to_string();
        db.customers()
            .create(&id, "gone@example.com", address())
            .await
            .unwrap();

        let cart = db.carts().find_by_customer(&id).await.unwrap().unwrap();
        db.carts().upsert_item(&cart.id, DISH).await.unwrap();

        db.customers().delete(&id).await.unwrap();

        assert!(db.customers().find_by_id(&id).await.unwrap().is_none());
        assert!(db.carts().find_by_customer(&id).await.unwrap().is_none());
        assert!(db.carts().list_items(&cart.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_not_found() {
        let db = test_db().await;
        let err = db.customers().delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_address() {
        let db = test_db().await;
        let customers = db.customers();

        let id = Uuid::new_v4().to_string();
        customers
            .create(&id, "move@example.com", address())
            .await
            .unwrap();

        customers
            .update_address(
                &id,
                NewAddress {
                    street: "Diagonal",
                    street_number: None,
                    city: "Barcelona",
                    province: "Barcelona",
                    zip_code: "08019",
                    additional_info: None,
                },
            )
            .await
            .unwrap();

        let found = customers.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.address.city, "Barcelona");
        assert_eq!(found.address.street_number, None);
    }

    #[tokio::test]
    async fn test_list_and_count_paginate() {
        let db = test_db().await;
        let customers = db.customers();

        for i in 0..5 {
            customers
                .create(
                    &Uuid::new_v4().to_string(),
                    &format!("c{i}@example.com"),
                    address(),
                )
                .await
                .unwrap();
        }

        assert_eq!(customers.count().await.unwrap(), 5);

        let page = customers
            .list(Pagination { page: 3, limit: 2 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }
}
