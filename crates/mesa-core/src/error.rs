//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule failures (not found, conflict)     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mesa-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  customers-svc errors (in app)                                         │
//! │  └── SvcError         - What goes on the wire ({status, message})      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SvcError → reply payload          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (customer id, dish id, email)
//! 3. Errors are enum variants, never String
//! 4. Message text is the caller-facing text, verbatim

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule errors.
///
/// Each variant carries the identifier that failed the rule; the display
/// text is exactly what callers receive in the error reply.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer id does not resolve to an existing customer.
    #[error("Customer #{0} not found")]
    CustomerNotFound(String),

    /// No customer exists with the given email.
    #[error("Customer with email {0} not found")]
    CustomerEmailNotFound(String),

    /// The customer exists but their cart row is missing.
    ///
    /// Every customer is created together with a cart, so this is checked
    /// defensively rather than expected in practice.
    #[error("Cart not found for customer with ID {0}")]
    CartNotFound(String),

    /// The dish is not a line item of the customer's cart.
    #[error("Dish with ID {0} not found in the cart")]
    DishNotInCart(String),

    /// Email is already registered to another customer.
    #[error("Customer with email {0} already exists")]
    EmailTaken(String),

    /// Customer listing requested but the table is empty.
    #[error("No customers found.")]
    NoCustomers,

    /// Cart has exceeded the maximum number of distinct line items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether this error is an absence of the requested entity
    /// (as opposed to a conflict or bad input).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::CustomerNotFound(_)
                | CoreError::CustomerEmailNotFound(_)
                | CoreError::CartNotFound(_)
                | CoreError::DishNotInCart(_)
                | CoreError::NoCustomers
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when an incoming payload doesn't meet requirements.
/// Used for early validation before any store access.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
