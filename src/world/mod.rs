//! The `world` module holds the point-cloud topic machinery of a simulated
//! world.
//!
//! - `diff`: membership diff between two desired topic lists
//! - `stream`: one handler per topic, owning its subscriptions and cached state
//! - `reconciler`: keeps the handler map in line with the parameter store
//! - `state`: simulation step and loop-frequency bookkeeping
//! - `driver`: periodic async loop that runs reconciliation cycles
//!
//! `World` composes these: it owns a `TopicReconciler` and a `WorldState`
//! side by side and talks to the parameter store and transport through the
//! handles it was built with.

pub mod diff;
pub mod driver;
pub mod reconciler;
pub mod state;
pub mod stream;


use std::sync::Arc;

use tracing::{info, warn};

use crate::params::{POINT_CLOUD_TOPICS, ParamStore, qualified_key};
use crate::transport::Transport;
use crate::utils::error::{Error, Result};

pub use diff::{TopicDelta, diff};
pub use reconciler::{ReconcileReport, TopicReconciler};
pub use state::WorldState;
pub use stream::StreamHandler;

pub struct World {
    name: String,
    namespace: String,
    state: WorldState,
    store: Arc<dyn ParamStore>,
    reconciler: Arc<TopicReconciler>,
}

impl World {
    pub fn new(
        name: &str,
        namespace: &str,
        store: Arc<dyn ParamStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let key = qualified_key(namespace, name, POINT_CLOUD_TOPICS);
        let reconciler = Arc::new(TopicReconciler::new(&key, Arc::clone(&store), transport));
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            state: WorldState::default(),
            store,
            reconciler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully qualified key of the point-cloud topic parameter.
    pub fn params_key(&self) -> &str {
        self.reconciler.key()
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Shared handle for consumers (e.g. a renderer) that poll samples.
    pub fn reconciler(&self) -> Arc<TopicReconciler> {
        Arc::clone(&self.reconciler)
    }

    pub fn set_num_devices(&mut self, n: u32) {
        self.state.set_num_devices(n);
    }

    pub fn set_graphics_loop_freq(&mut self, freq: f64) {
        self.state.set_graphics_loop_freq(freq);
    }

    pub fn set_physics_loop_freq(&mut self, freq: f64) {
        self.state.set_physics_loop_freq(freq);
    }

    pub fn increment_sim_step(&mut self) {
        self.state.increment_sim_step();
    }

    pub fn step_sim(&self) -> bool {
        self.state.step_sim()
    }

    pub fn set_step_sim(&mut self, step: bool) {
        self.state.set_step_sim(step);
    }

    /// Pull the topic list from the parameter store and apply it.
    pub fn update_params_from_server(&self) -> ReconcileReport {
        self.reconciler.reconcile()
    }

    /// Push the remembered topic list to the parameter store, merged into
    /// what the store already lists.
    ///
    /// Stored entries are kept in their order, including topics whose
    /// activation failed, and remembered topics missing from the store are
    /// appended. Nothing is written before the first successful cycle.
    /// Returns whether the store was written.
    pub fn set_params_on_server(&self) -> Result<bool> {
        if !self.reconciler.has_synced() {
            warn!(
                "Not publishing topics to '{}' before the first successful cycle",
                self.params_key()
            );
            return Ok(false);
        }

        let mut topics = self.store.list_string_param(self.params_key())?;
        for topic in self.reconciler.desired_topics() {
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
        self.store.set_string_param(self.params_key(), &topics)?;
        info!("Published {} point cloud topics to '{}'", topics.len(), self.params_key());
        Ok(true)
    }

    /// Append `topic` to the stored list so the next cycle picks it up.
    ///
    /// Observers see it in `new_topic_names` once that cycle has activated
    /// it, not at the time of the call. Returns `false` if it was already
    /// listed.
    pub fn append_point_cloud_topic(&self, topic: &str) -> Result<bool> {
        let key = self.params_key();
        let mut topics = self.store.list_string_param(key)?;
        if topics.iter().any(|t| t == topic) {
            return Ok(false);
        }
        topics.push(topic.to_string());
        self.store.set_string_param(key, &topics)?;
        Ok(true)
    }

    /// Whether the most recent cycle changed the topic set.
    pub fn params_changed(&self) -> bool {
        self.reconciler.has_changed()
    }

    pub fn new_topic_names(&self) -> Vec<String> {
        self.reconciler.new_topics()
    }

    pub fn defunct_topic_names(&self) -> Vec<String> {
        self.reconciler.removed_topics()
    }

    /// Drain every handler. Returns the unsubscribe failures met.
    pub fn shutdown(&self) -> Vec<Error> {
        let failures = self.reconciler.shutdown();
        info!("World '{}' released all point cloud handlers", self.name);
        failures
    }
}
