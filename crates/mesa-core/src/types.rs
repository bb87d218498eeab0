//! # Domain Types
//!
//! Core domain types for the customers service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Customer     │ 1    1 │     Address     │                        │
//! │  │  ─────────────  │◄───────│  ─────────────  │                        │
//! │  │  id (UUID)      │        │  street, city   │                        │
//! │  │  email (unique) │        │  province, zip  │                        │
//! │  └────────┬────────┘        └─────────────────┘                        │
//! │           │ 1                                                           │
//! │           │                                                             │
//! │           │ 1                                                           │
//! │  ┌────────▼────────┐        ┌─────────────────┐                        │
//! │  │      Cart       │ 1    * │    CartItem     │                        │
//! │  │  ─────────────  │◄───────│  ─────────────  │                        │
//! │  │  id (UUID)      │        │  dish_id        │                        │
//! │  │  customer_id    │        │  quantity ≥ 1   │                        │
//! │  └─────────────────┘        └─────────────────┘                        │
//! │                                                                         │
//! │  Invariants:                                                            │
//! │  • every customer owns exactly one cart                                 │
//! │  • at most one CartItem per (cart, dish)                                │
//! │  • quantity 0 never exists - the row is deleted instead                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier (UUID, supplied by the caller at creation).
    pub id: String,

    /// Contact email, unique across all customers.
    pub email: String,

    /// When the customer was created.
    pub created_at: DateTime<Utc>,

    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Address
// =============================================================================

/// A customer's delivery address (1:1 with the customer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning customer.
    pub customer_id: String,

    /// Street name.
    pub street: String,

    /// Street number, when the address has one.
    pub street_number: Option<i64>,

    /// City.
    pub city: String,

    /// Province.
    pub province: String,

    /// Postal code.
    pub zip_code: String,

    /// Floor, door, delivery notes.
    pub additional_info: Option<String>,
}

// =============================================================================
// Customer Profile
// =============================================================================

/// A customer together with their address, as returned by lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    #[serde(flatten)]
    pub customer: Customer,

    pub address: Address,
}

// =============================================================================
// Cart
// =============================================================================

/// A customer's cart. Created with the customer, never recreated; only
/// its items change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning customer (unique - one cart per customer).
    pub customer_id: String,

    /// When the cart was created.
    pub created_at: DateTime<Utc>,

    /// When the cart was last mutated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line item in a cart: one dish, with an aggregated quantity.
///
/// At most one item exists per (cart, dish) pair; asking for "more of the
/// same dish" raises the quantity rather than adding a second row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning cart.
    pub cart_id: String,

    /// Opaque reference to a dish in the catalog service. Not resolved
    /// or validated here.
    pub dish_id: String,

    /// Units of the dish in the cart. Always >= 1; a quantity that would
    /// reach 0 deletes the row instead.
    pub quantity: i64,

    /// When the line was first added.
    pub created_at: DateTime<Utc>,

    /// When the quantity last changed.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cart Entry (set-cart input)
// =============================================================================

/// One caller-supplied (dish, quantity) pair for a cart replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub dish_id: String,
    pub quantity: i64,
}

// =============================================================================
// Cart With Items
// =============================================================================

/// The full cart view returned by the replace operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartWithItems {
    #[serde(flatten)]
    pub cart: Cart,

    pub items: Vec<CartItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================
