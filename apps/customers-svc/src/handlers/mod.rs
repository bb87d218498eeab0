//! Message-pattern routing over NATS.
//!
//! ## Pattern Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Pattern Dispatch                                  │
//! │                                                                         │
//! │  NATS subject "addToCart" ──► queue-group subscription                 │
//! │       │                       (one instance per message)               │
//! │       ▼                                                                 │
//! │  spawned task per message                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  handler fn: decode DTO → service call → JSON value                    │
//! │       │                                                                 │
//! │       ├── request pattern: reply {"data": ..} or {"error": ..}         │
//! │       └── event pattern:   no reply, failures logged                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers do no business logic; they decode, call a service, and shape
//! the reply envelope.

pub mod cart;
pub mod customers;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_nats::Client;
use bytes::Bytes;
use futures::StreamExt;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::SvcError;
use crate::services::{CartService, CustomersService};
use mesa_db::Database;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub customers: CustomersService,
    pub cart: CartService,
}

impl AppContext {
    /// Builds the context from a database handle.
    pub fn new(db: Database) -> Self {
        AppContext {
            customers: CustomersService::new(db.clone()),
            cart: CartService::new(db),
        }
    }
}

/// What a handler produces: a JSON-ready value or a wire error.
pub type HandlerResult = Result<serde_json::Value, SvcError>;

/// Boxed handler future, so handler fns fit in the pattern tables.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

/// A message handler: context + raw payload in, reply value out.
pub type Handler = fn(Arc<AppContext>, Bytes) -> HandlerFuture;

/// Request/reply patterns (the caller waits for the reply envelope).
pub const REQUEST_PATTERNS: &[(&str, Handler)] = &[
    ("createCustomer", customers::create_customer),
    ("findAllCustomers", customers::find_all_customers),
    ("findOneCustomer", customers::find_one_customer),
    ("findOneCustomerByEmail", customers::find_one_customer_by_email),
    ("deleteCustomer", customers::delete_customer),
    ("findCustomerCart", cart::find_customer_cart),
    ("addToCart", cart::add_to_cart),
    ("removeFromCart", cart::remove_from_cart),
    ("setCart", cart::set_cart),
    ("restartCart", cart::restart_cart),
];

/// Fire-and-forget event patterns (no reply expected).
///
/// `order_paid` reuses the restart handler: the same cart reset, reached
/// through a second entry point with event semantics.
pub const EVENT_PATTERNS: &[(&str, Handler)] = &[
    ("order_paid", cart::restart_cart),
    ("updateCustomer", customers::update_customer),
];

/// Subscribes every pattern and spawns its dispatch loop.
///
/// Each subscription uses the shared queue group, so horizontally scaled
/// instances split the pattern's traffic instead of all handling it.
pub async fn serve(
    client: Client,
    ctx: Arc<AppContext>,
    queue_group: String,
) -> Result<Vec<JoinHandle<()>>, async_nats::SubscribeError> {
    let mut tasks = Vec::with_capacity(REQUEST_PATTERNS.len() + EVENT_PATTERNS.len());

    for (pattern, handler) in REQUEST_PATTERNS.iter().copied() {
        let subscriber = client
            .queue_subscribe(pattern.to_string(), queue_group.clone())
            .await?;
        info!(pattern = %pattern, "Subscribed (request/reply)");
        tasks.push(spawn_dispatch_loop(
            client.clone(),
            ctx.clone(),
            pattern,
            handler,
            subscriber,
            true,
        ));
    }

    for (pattern, handler) in EVENT_PATTERNS.iter().copied() {
        let subscriber = client
            .queue_subscribe(pattern.to_string(), queue_group.clone())
            .await?;
        info!(pattern = %pattern, "Subscribed (event)");
        tasks.push(spawn_dispatch_loop(
            client.clone(),
            ctx.clone(),
            pattern,
            handler,
            subscriber,
            false,
        ));
    }

    Ok(tasks)
}

/// Runs one pattern's dispatch loop, handling each message in its own task.
fn spawn_dispatch_loop(
    client: Client,
    ctx: Arc<AppContext>,
    pattern: &'static str,
    handler: Handler,
    mut subscriber: async_nats::Subscriber,
    expects_reply: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = subscriber.next().await {
            let client = client.clone();
            let ctx = ctx.clone();

            tokio::spawn(async move {
                let result = handler(ctx, message.payload).await;

                if let Err(ref err) = result {
                    warn!(pattern = %pattern, status = err.status(), error = %err, "Pattern failed");
                }

                match (expects_reply, message.reply) {
                    (true, Some(reply)) => {
                        if let Err(err) = client.publish(reply, encode_reply(result).into()).await {
                            error!(pattern = %pattern, error = %err, "Failed to publish reply");
                        }
                    }
                    (true, None) => {
                        // Caller forgot the reply subject; the outcome is
                        // already logged above, nothing else to do
                    }
                    (false, _) => {}
                }
            });
        }

        info!(pattern = %pattern, "Subscription closed");
    })
}

/// Wraps a handler outcome in the reply envelope.
fn encode_reply(result: HandlerResult) -> Vec<u8> {
    let envelope = match result {
        Ok(data) => json!({ "data": data }),
        Err(err) => json!({ "error": err.payload() }),
    };

    serde_json::to_vec(&envelope).unwrap_or_else(|_| {
        br#"{"error":{"status":500,"message":"reply serialization failed"}}"#.to_vec()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_success_envelope() {
        let bytes = encode_reply(Ok(json!({"quantity": 2})));
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["data"]["quantity"], 2);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_encode_error_envelope() {
        let bytes = encode_reply(Err(SvcError::NotFound("Customer #x not found".into())));
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["status"], 404);
        assert_eq!(value["error"]["message"], "Customer #x not found");
    }

    #[test]
    fn test_every_pattern_is_distinct() {
        let mut names: Vec<&str> = REQUEST_PATTERNS
            .iter()
            .chain(EVENT_PATTERNS.iter())
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before, "duplicate pattern registration");
    }
}
