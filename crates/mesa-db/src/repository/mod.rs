//! # Repository Module
//!
//! Database repository implementations for the customers service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Message handler                                                        │
//! │       │                                                                 │
//! │       │  db.carts().upsert_item(cart_id, dish_id)                       │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── find_by_customer(&self, customer_id)                              │
//! │  ├── upsert_item(&self, cart_id, dish_id)                              │
//! │  ├── remove_one(&self, cart_id, dish_id)                               │
//! │  └── replace_items(&self, cart_id, entries)                            │
//! │       │                                                                 │
//! │       │  SQL (atomic statements / write transactions)                   │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customer CRUD with the embedded
//!   address and the cart created alongside
//! - [`cart::CartRepository`] - The cart mutation engine

pub mod cart;
pub mod customer;
