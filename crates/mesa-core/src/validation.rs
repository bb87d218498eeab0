//! # Validation Module
//!
//! Input validation for incoming payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shape and type checks on the wire payload                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Field-level rules (UUID format, email shape, quantity range)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  ├── CHECK (quantity >= 1)                                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CartEntry;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a customer id (caller-supplied UUID).
pub fn validate_customer_id(id: &str) -> ValidationResult<()> {
    validate_uuid_field("id", id)
}

/// Validates a dish id (opaque catalog UUID; existence is not checked).
pub fn validate_dish_id(id: &str) -> ValidationResult<()> {
    validate_uuid_field("dishId", id)
}

fn validate_uuid_field(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Email Validator
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Non-empty, at most 254 characters
/// - Exactly one `@` with non-empty local part
/// - Domain part contains a dot
///
/// Deliverability is not checked; this only rejects values that cannot
/// be an address at all.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("malformed address"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("malformed domain"));
    }

    Ok(())
}

// =============================================================================
// Address Validators
// =============================================================================

/// Address fields as they arrive on the wire, before persistence.
#[derive(Debug, Clone, Copy)]
pub struct AddressInput<'a> {
    pub street: &'a str,
    pub street_number: Option<i64>,
    pub city: &'a str,
    pub province: &'a str,
    pub zip_code: &'a str,
}

/// Validates a delivery address.
///
/// ## Rules
/// - street, city, province: required, at most 200 characters
/// - street_number: positive when present
/// - zip_code: five digits (Spanish postal code)
pub fn validate_address(address: &AddressInput<'_>) -> ValidationResult<()> {
    validate_required_text("street", address.street, 200)?;
    validate_required_text("city", address.city, 200)?;
    validate_required_text("province", address.province, 200)?;

    if let Some(number) = address.street_number {
        if number <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "streetNumber".to_string(),
            });
        }
    }

    let zip = address.zip_code.trim();
    if zip.len() != 5 || !zip.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "zipCode".to_string(),
            reason: "must be a five-digit postal code".to_string(),
        });
    }

    Ok(())
}

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Cart Entry Validators
// =============================================================================

/// Validates a quantity value for a cart line.
///
/// ## Rules
/// - Must be positive (> 0) - a zero-quantity line never exists
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a cart replacement list before it is aggregated and written.
///
/// ## Rules
/// - Every entry: valid dish UUID and quantity in range
///
/// An empty list is valid: replacing with nothing clears the cart. The
/// distinct-dish cap is applied after aggregation, where duplicate
/// entries have already been merged.
pub fn validate_entries(entries: &[CartEntry]) -> ValidationResult<()> {
    for entry in entries {
        validate_dish_id(&entry.dish_id)?;
        validate_quantity(entry.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id(UUID).is_ok());
        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@nodot").is_err());
        assert!(validate_email("ana@.com").is_err());
    }

    #[test]
    fn test_validate_address() {
        let ok = AddressInput {
            street: "Gran Via",
            street_number: Some(12),
            city: "Madrid",
            province: "Madrid",
            zip_code: "28013",
        };
        assert!(validate_address(&ok).is_ok());

        let bad_zip = AddressInput { zip_code: "2801", ..ok };
        assert!(validate_address(&bad_zip).is_err());

        let bad_number = AddressInput {
            street_number: Some(0),
            zip_code: "28013",
            ..ok
        };
        assert!(validate_address(&bad_number).is_err());

        let empty_city = AddressInput {
            city: "  ",
            street_number: Some(12),
            zip_code: "28013",
            ..ok
        };
        assert!(validate_address(&empty_city).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_entries() {
        let entries = vec![CartEntry {
            dish_id: UUID.to_string(),
            quantity: 2,
        }];
        assert!(validate_entries(&entries).is_ok());
        assert!(validate_entries(&[]).is_ok());

        let zero_qty = vec![CartEntry {
            dish_id: UUID.to_string(),
            quantity: 0,
        }];
        assert!(validate_entries(&zero_qty).is_err());

        let bad_dish = vec![CartEntry {
            dish_id: "nope".to_string(),
            quantity: 1,
        }];
        assert!(validate_entries(&bad_dish).is_err());
    }
}
