//! Wire payloads for the message patterns.
//!
//! Field names are camelCase on the wire, matching what the gateway and
//! the other services send. Deserialization rejects unknown shapes; field
//! rules (UUID format, quantity range) are applied by `mesa_core::validation`
//! before any store access.

use serde::{Deserialize, Serialize};

use mesa_core::validation::AddressInput;
use mesa_core::{CartEntry, CartItem};
use mesa_db::repository::customer::NewAddress;

// =============================================================================
// Address
// =============================================================================

/// Address fields as sent by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub street: String,
    #[serde(default)]
    pub street_number: Option<i64>,
    pub city: String,
    pub province: String,
    pub zip_code: String,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl AddressDto {
    /// View for field validation.
    pub fn as_input(&self) -> AddressInput<'_> {
        AddressInput {
            street: &self.street,
            street_number: self.street_number,
            city: &self.city,
            province: &self.province,
            zip_code: &self.zip_code,
        }
    }

    /// View for persistence.
    pub fn as_new(&self) -> NewAddress<'_> {
        NewAddress {
            street: &self.street,
            street_number: self.street_number,
            city: &self.city,
            province: &self.province,
            zip_code: &self.zip_code,
            additional_info: self.additional_info.as_deref(),
        }
    }
}

// =============================================================================
// Customer Patterns
// =============================================================================

/// `createCustomer` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerDto {
    pub id: String,
    pub email: String,
    pub address: AddressDto,
}

/// `updateCustomer` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerDto {
    pub id: String,
    pub address: AddressDto,
}

/// `findOneCustomerByEmail` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerEmailDto {
    pub email: String,
}

/// Payload carrying just a customer id (`findOneCustomer`,
/// `findCustomerCart`, `deleteCustomer`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerIdDto {
    pub id: String,
}

// =============================================================================
// Cart Patterns
// =============================================================================

/// `addToCart` / `removeFromCart` payload: which customer, which dish.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartDto {
    pub id: String,
    pub dish_id: String,
}

/// `setCart` payload: the full replacement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCartDto {
    pub id: String,
    pub items: Vec<CartEntry>,
}

/// `restartCart` request and `order_paid` event payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartCartDto {
    pub customer_id: String,
}

// =============================================================================
// Replies
// =============================================================================

/// `removeFromCart` reply: the affected line, and whether it was dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartReply {
    #[serde(flatten)]
    pub item: CartItem,
    pub deleted: bool,
}

/// `restartCart` reply: how many lines were deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteCountReply {
    pub count: u64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_customer_dto_wire_shape() {
        let dto: CreateCustomerDto = serde_json::from_str(
            r#"{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "email": "ana@example.com",
                "address": {
                    "street": "Gran Via",
                    "streetNumber": 12,
                    "city": "Madrid",
                    "province": "Madrid",
                    "zipCode": "28013"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(dto.address.street_number, Some(12));
        assert_eq!(dto.address.zip_code, "28013");
        assert_eq!(dto.address.additional_info, None);
    }

    #[test]
    fn test_update_cart_dto_wire_shape() {
        let dto: UpdateCartDto = serde_json::from_str(
            r#"{"id":"u-1","dishId":"d-1"}"#,
        )
        .unwrap();
        assert_eq!(dto.dish_id, "d-1");
    }

    #[test]
    fn test_set_cart_dto_wire_shape() {
        let dto: SetCartDto = serde_json::from_str(
            r#"{"id":"u-1","items":[{"dishId":"d-1","quantity":2}]}"#,
        )
        .unwrap();
        assert_eq!(dto.items.len(), 1);
        assert_eq!(dto.items[0].quantity, 2);
    }

    #[test]
    fn test_restart_cart_dto_wire_shape() {
        let dto: RestartCartDto =
            serde_json::from_str(r#"{"customerId":"u-1"}"#).unwrap();
        assert_eq!(dto.customer_id, "u-1");
    }
}
