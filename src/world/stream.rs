//! Per-topic stream handler
//!
//! A `StreamHandler` owns the three subscriptions (data, radius, color) of one
//! point-cloud topic and the state they feed: the latest cloud and the point
//! radius. The callbacks share that state through an `Arc`, so the transport
//! can deliver on any thread while renderers read concurrently.
//!
//! Lifecycle: `new` -> `activate` -> `teardown` (or drop). Teardown
//! unsubscribes before anything is released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::transport::{Callback, PointCloud, StreamKind, StreamMessage, SubscriptionHandle, Transport};
use crate::utils::error::{Error, Result};
use crate::utils::lock;

pub const DEFAULT_RADIUS: f64 = 10.0;

#[derive(Debug)]
struct StreamState {
    latest: Mutex<Option<Arc<PointCloud>>>,
    // f64 bits
    radius: AtomicU64,
}

impl StreamState {
    fn new() -> Self {
        Self {
            latest: Mutex::new(None),
            radius: AtomicU64::new(DEFAULT_RADIUS.to_bits()),
        }
    }

    fn radius(&self) -> f64 {
        f64::from_bits(self.radius.load(Ordering::Acquire))
    }

    fn set_radius(&self, radius: f64) {
        if !radius.is_finite() {
            warn!("Ignoring non-finite radius {radius}");
            return;
        }
        self.radius.store(radius.abs().to_bits(), Ordering::Release);
    }

    fn on_message(&self, msg: &StreamMessage) {
        match msg {
            StreamMessage::PointCloud(cloud) => {
                *lock(&self.latest) = Some(Arc::new(cloud.clone()));
            }
            StreamMessage::Radius { data } => self.set_radius(f64::from(*data)),
            // color is part of the stream triple but has no effect on handler state
            StreamMessage::Color(_) => {}
        }
    }
}

pub struct StreamHandler {
    topic_name: String,
    state: Arc<StreamState>,
    transport: Option<Arc<dyn Transport>>,
    subscriptions: Vec<SubscriptionHandle>,
}

impl StreamHandler {
    /// Create an inactive handler. Nothing is subscribed until `activate`.
    pub fn new(topic_name: &str) -> Self {
        Self {
            topic_name: topic_name.to_string(),
            state: Arc::new(StreamState::new()),
            transport: None,
            subscriptions: Vec::new(),
        }
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    pub fn is_active(&self) -> bool {
        self.transport.is_some()
    }

    /// Subscribe the data, radius and color streams through `transport`.
    ///
    /// Fails with `AlreadyActive` without touching the transport if the
    /// handler already holds subscriptions. If any subscribe fails, the ones
    /// already made are released and the handler stays inactive.
    pub fn activate(&mut self, transport: Arc<dyn Transport>) -> Result<()> {
        if self.is_active() {
            warn!("Handler for '{}' is already active", self.topic_name);
            return Err(Error::AlreadyActive(self.topic_name.clone()));
        }

        let mut handles = Vec::with_capacity(StreamKind::ALL.len());
        for kind in StreamKind::ALL {
            let topic = kind.topic_for(&self.topic_name);
            let state = Arc::clone(&self.state);
            let callback: Callback = Arc::new(move |msg: &StreamMessage| state.on_message(msg));

            match transport.subscribe(&topic, kind, callback) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    for handle in handles {
                        if let Err(e) = transport.unsubscribe(handle) {
                            warn!("Failed to roll back subscription on '{}': {e}", self.topic_name);
                        }
                    }
                    return Err(Error::Transport { topic, source });
                }
            }
        }

        self.subscriptions = handles;
        self.transport = Some(transport);
        info!("Activated point cloud handler for '{}'", self.topic_name);
        Ok(())
    }

    /// Release every subscription. Calling it again is a no-op.
    ///
    /// All handles are released even if some unsubscribe calls fail; the
    /// first failure is returned and none are retried.
    pub fn teardown(&mut self) -> Result<()> {
        let Some(transport) = self.transport.take() else {
            return Ok(());
        };

        let mut first_err = None;
        for handle in self.subscriptions.drain(..) {
            if let Err(source) = transport.unsubscribe(handle) {
                warn!("Failed to unsubscribe from '{}': {source}", self.topic_name);
                first_err.get_or_insert(Error::Transport {
                    topic: self.topic_name.clone(),
                    source,
                });
            }
        }

        info!("Removed point cloud handler for '{}'", self.topic_name);
        first_err.map_or(Ok(()), Err)
    }

    /// Latest cloud received on the data stream, if any.
    pub fn latest_sample(&self) -> Option<Arc<PointCloud>> {
        lock(&self.state.latest).clone()
    }

    pub fn radius(&self) -> f64 {
        self.state.radius()
    }

    /// Store `|radius|`. Negative input is folded; NaN and infinities are
    /// dropped and the previous value kept.
    pub fn set_radius(&self, radius: f64) {
        self.state.set_radius(radius);
    }
}

impl std::fmt::Debug for StreamHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandler")
            .field("topic_name", &self.topic_name)
            .field("active", &self.is_active())
            .field("radius", &self.radius())
            .finish()
    }
}

impl Drop for StreamHandler {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            warn!("Teardown on drop of '{}' failed: {e}", self.topic_name);
        }
    }
}
