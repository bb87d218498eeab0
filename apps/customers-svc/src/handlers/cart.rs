//! Handlers for the cart message patterns.
//!
//! Thin decode-and-delegate wrappers over [`CartService`]. The engine
//! semantics (preconditions, atomicity, aggregation) live in the service
//! and repository layers.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::to_value;

use super::{AppContext, HandlerFuture};
use crate::dto::{
    CustomerIdDto, DeleteCountReply, RemoveFromCartReply, RestartCartDto, SetCartDto,
    UpdateCartDto,
};

/// `findCustomerCart` - the cart's current line items.
pub fn find_customer_cart(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: CustomerIdDto = serde_json::from_slice(&payload)?;
        let items = ctx.cart.get_items(&dto.id).await?;
        Ok(to_value(items)?)
    })
}

/// `addToCart` - one more unit of a dish.
pub fn add_to_cart(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: UpdateCartDto = serde_json::from_slice(&payload)?;
        let item = ctx.cart.add_to_cart(&dto.id, &dto.dish_id).await?;
        Ok(to_value(item)?)
    })
}

/// `removeFromCart` - one unit fewer; deletes the line at zero.
pub fn remove_from_cart(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: UpdateCartDto = serde_json::from_slice(&payload)?;
        let removed = ctx.cart.remove_from_cart(&dto.id, &dto.dish_id).await?;
        Ok(to_value(RemoveFromCartReply {
            item: removed.item,
            deleted: removed.deleted,
        })?)
    })
}

/// `setCart` - destructive full replacement of the cart's items.
pub fn set_cart(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: SetCartDto = serde_json::from_slice(&payload)?;
        let cart = ctx.cart.set_cart(&dto.id, dto.items).await?;
        Ok(to_value(cart)?)
    })
}

/// `restartCart` request and `order_paid` event - clears the cart.
pub fn restart_cart(ctx: Arc<AppContext>, payload: Bytes) -> HandlerFuture {
    Box::pin(async move {
        let dto: RestartCartDto = serde_json::from_slice(&payload)?;
        let count = ctx.cart.restart_cart(&dto.customer_id).await?;
        Ok(to_value(DeleteCountReply { count })?)
    })
}
