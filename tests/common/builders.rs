//! Shared registry fixtures for integration tests

use dispatch_core::registry::{BoundArgs, MethodDescriptor, MethodRegistry, MethodSource};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub sku: String,
    pub quantity: u32,
    pub note: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("out of stock: {sku}")]
pub struct OutOfStock {
    pub sku: String,
}

/// `greet(name: String = "stranger") -> String`
pub fn greet() -> MethodDescriptor {
    MethodDescriptor::builder("greet")
        .param_with_default("name", || "stranger".to_string())
        .handler(|mut args| Ok(format!("Hello {}", args.take::<String>(0)?)))
        .build()
        .unwrap()
}

/// Identity method over `T`, registered as `name`.
pub fn identity<T>(name: &str) -> MethodDescriptor
where
    T: Serialize + serde::de::DeserializeOwned + Send + 'static,
{
    MethodDescriptor::builder(name)
        .param::<T>("x")
        .handler(|mut args| args.take::<T>(0))
        .build()
        .unwrap()
}

/// An order desk whose ticket counter feeds a default parameter.
pub struct OrderDesk {
    next_ticket: AtomicU64,
}

impl OrderDesk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_ticket: AtomicU64::new(1),
        })
    }

    fn place(&self, mut args: BoundArgs) -> anyhow::Result<Order> {
        let order: Order = args.take(0)?;
        if order.sku == "discontinued" {
            return Err(OutOfStock { sku: order.sku }.into());
        }
        Ok(order)
    }

    fn ticket(&self, mut args: BoundArgs) -> anyhow::Result<u64> {
        args.take::<u64>(0)
    }

    fn issue(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }
}

impl MethodSource for OrderDesk {
    fn methods(self: Arc<Self>) -> Vec<MethodDescriptor> {
        let counter = Arc::clone(&self);
        vec![
            MethodDescriptor::builder("place")
                .namespace("orders")
                .param::<Order>("order")
                .owned_by(Arc::clone(&self), OrderDesk::place)
                .build()
                .unwrap(),
            MethodDescriptor::builder("ticket")
                .namespace("orders")
                .param_with_default("number", move || counter.issue())
                .owned_by(self, OrderDesk::ticket)
                .build()
                .unwrap(),
        ]
    }
}

/// Registry holding `greet` plus the order desk methods.
pub fn demo_registry() -> MethodRegistry {
    let mut registry = MethodRegistry::new();
    registry.register(greet());
    registry.scan(OrderDesk::new());
    registry
}
