//! # mesa-core: Pure Domain Logic for the Mesa Customers Service
//!
//! This crate is the **heart** of the customers service. It contains the
//! domain types and the cart quantity rules as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Customers Service Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     NATS Message Patterns                       │   │
//! │  │   createCustomer, addToCart, removeFromCart, setCart, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mesa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ cart_math │  │pagination │  │ validation│  │   │
//! │  │   │ Customer  │  │ aggregate │  │   pages   │  │   rules   │  │   │
//! │  │   │ CartItem  │  │ decrement │  │   meta    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     mesa-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Address, Cart, CartItem)
//! - [`cart_math`] - Quantity aggregation and removal rules
//! - [`pagination`] - Page/limit arithmetic and listing envelopes
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart_math;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use pagination::{PageMeta, Paginated, Pagination};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
///
/// Keeps carts at a size one order can plausibly carry; a request that
/// would push a cart past this limit is rejected before any write.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single dish in a cart line.
///
/// Guards against fat-fingered quantities (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
