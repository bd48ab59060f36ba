//! The `transport` module is the seam to the publish/subscribe layer that
//! delivers stream messages.
//!
//! It defines the message shapes carried on each stream, the `Transport`
//! trait handlers subscribe through, and `LocalBus`, an in-process transport
//! that routes published messages to subscribed callbacks.

pub mod bus;
pub mod message;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use uuid::Uuid;

use crate::utils::error::TransportError;

pub use bus::LocalBus;
pub use message::{ChannelFloat32, ColorRgba, Point32, PointCloud, StreamKind, StreamMessage};

/// Callback invoked for every message delivered on a subscription.
///
/// Transports may call it from any thread, concurrently with other callbacks.
pub type Callback = Arc<dyn Fn(&StreamMessage) + Send + Sync>;

/// Opaque token identifying one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(Uuid);

impl SubscriptionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscribe/unsubscribe primitive consumed by stream handlers.
///
/// Implementations must guarantee that once `unsubscribe` returns, the
/// callback registered under that handle is never invoked again.
pub trait Transport: Send + Sync {
    fn subscribe(
        &self,
        topic: &str,
        kind: StreamKind,
        callback: Callback,
    ) -> Result<SubscriptionHandle, TransportError>;

    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), TransportError>;
}
