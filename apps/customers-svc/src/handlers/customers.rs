//! Handlers for the customer message patterns.
//!
//! Each handler decodes its DTO, delegates to [`CustomersService`], and
//! returns the value that goes inside the reply envelope.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::to_value;

use super::{AppContext, HandlerFuture};
use crate::dto::{CreateCustomerDto, CustomerEmailDto, CustomerIdDto, UpdateCustomerDto};
use mesa_core::Pagination;

/// `createCustomer` - registers a customer with address and empty cart.
pub fn create_customer(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: CreateCustomerDto = serde_json::from_slice(&payload)?;
        let profile = ctx.customers.create_customer(&dto).await?;
        Ok(to_value(profile)?)
    })
}

/// `findAllCustomers` - paginated listing.
pub fn find_all_customers(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        // An empty payload means first page, default size
        let pagination: Pagination = if payload.is_empty() {
            Pagination::default()
        } else {
            serde_json::from_slice(&payload)?
        };
        let page = ctx.customers.find_all_customers(pagination).await?;
        Ok(to_value(page)?)
    })
}

/// `findOneCustomer` - customer with address by id.
pub fn find_one_customer(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: CustomerIdDto = serde_json::from_slice(&payload)?;
        let profile = ctx.customers.find_one_customer(&dto.id).await?;
        Ok(to_value(profile)?)
    })
}

/// `findOneCustomerByEmail` - customer lookup by email.
pub fn find_one_customer_by_email(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: CustomerEmailDto = serde_json::from_slice(&payload)?;
        let customer = ctx
            .customers
            .find_one_customer_by_email(dto.email.trim())
            .await?;
        Ok(to_value(customer)?)
    })
}

/// `updateCustomer` (event) - replaces the customer's address.
pub fn update_customer(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: UpdateCustomerDto = serde_json::from_slice(&payload)?;
        let profile = ctx.customers.update_customer(&dto).await?;
        Ok(to_value(profile)?)
    })
}

/// `deleteCustomer` - removes the customer; cart and items cascade.
pub fn delete_customer(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: CustomerIdDto = serde_json::from_slice(&payload)?;
        let customer = ctx.customers.delete_customer(&dto.id).await?;
        Ok(to_value(customer)?)
    })
}
