//! Topic reconciler
//!
//! Keeps exactly one `StreamHandler` per topic in the desired set. Each
//! `reconcile` call fetches the list from the parameter store, diffs it
//! against the list remembered from the previous cycle and applies the delta.
//!
//! Concurrency notes:
//! - Cycles are serialized by the `desired` mutex, held for the whole cycle.
//! - The handler map is only written inside a cycle, and the write lock is
//!   held just long enough to insert or take out one entry. Teardown runs
//!   with no map lock held, so readers of other topics never wait on it.
//! - Readers (`latest_sample`, `radius`) take the map read lock briefly and
//!   then rely on each handler's own synchronization.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, info, warn};

use super::diff::{TopicDelta, dedup_topics, diff};
use super::stream::StreamHandler;
use crate::params::ParamStore;
use crate::transport::{PointCloud, Transport};
use crate::utils::error::Error;
use crate::utils::{lock, read, write};

/// Outcome of one reconciliation cycle.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Non-fatal problems met during the cycle.
    pub diagnostics: Vec<Error>,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

pub struct TopicReconciler {
    key: String,
    store: Arc<dyn ParamStore>,
    transport: Arc<dyn Transport>,
    handlers: RwLock<HashMap<String, StreamHandler>>,
    desired: Mutex<Vec<String>>,
    last_delta: RwLock<TopicDelta>,
    changed: AtomicBool,
    // set once a fetch has succeeded, cleared by shutdown
    synced: AtomicBool,
}

impl TopicReconciler {
    /// `key` is the fully qualified parameter holding the topic list.
    pub fn new(key: &str, store: Arc<dyn ParamStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            key: key.to_string(),
            store,
            transport,
            handlers: RwLock::new(HashMap::new()),
            desired: Mutex::new(Vec::new()),
            last_delta: RwLock::new(TopicDelta::default()),
            changed: AtomicBool::new(false),
            synced: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Run one fetch-diff-apply cycle.
    pub fn reconcile(&self) -> ReconcileReport {
        let mut desired = lock(&self.desired);

        let current = match self.store.list_string_param(&self.key) {
            Ok(list) => dedup_topics(list),
            Err(err) => {
                // skip the cycle, keep every live handler
                warn!("Skipping reconciliation: {err}");
                self.publish_delta(TopicDelta::default());
                return ReconcileReport {
                    diagnostics: vec![err],
                    ..Default::default()
                };
            }
        };

        self.synced.store(true, Ordering::SeqCst);
        let TopicDelta { mut added, removed } = diff(&desired, &current);
        let mut report = ReconcileReport::default();

        for name in &removed {
            let handler = write(&self.handlers).remove(name);
            match handler {
                Some(mut handler) => {
                    if let Err(e) = handler.teardown() {
                        report.diagnostics.push(e);
                    }
                }
                None => debug!("No handler to remove for '{name}'"),
            }
        }

        let mut next = current;
        let mut failed = Vec::new();
        for name in &added {
            if read(&self.handlers).contains_key(name) {
                warn!("Topic '{name}' already has a handler, skipping creation");
                report.diagnostics.push(Error::DuplicateTopic(name.clone()));
                continue;
            }

            let mut handler = StreamHandler::new(name);
            match handler.activate(Arc::clone(&self.transport)) {
                Ok(()) => {
                    write(&self.handlers).insert(name.clone(), handler);
                }
                Err(e) => {
                    warn!("Could not activate '{name}', will retry next cycle: {e}");
                    failed.push(name.clone());
                    report.diagnostics.push(e);
                }
            }
        }

        if !failed.is_empty() {
            next.retain(|t| !failed.contains(t));
            added.retain(|t| !failed.contains(t));
        }
        *desired = next;

        let delta = TopicDelta { added, removed };
        if !delta.is_empty() {
            info!(
                "Reconciled '{}': +{} -{} ({} live)",
                self.key,
                delta.added.len(),
                delta.removed.len(),
                desired.len()
            );
        }
        report.added = delta.added.clone();
        report.removed = delta.removed.clone();
        self.publish_delta(delta);
        report
    }

    fn publish_delta(&self, delta: TopicDelta) {
        self.changed.store(!delta.is_empty(), Ordering::SeqCst);
        *write(&self.last_delta) = delta;
    }

    /// Tear down every handler and forget the desired set.
    ///
    /// Returns the unsubscribe failures met along the way.
    pub fn shutdown(&self) -> Vec<Error> {
        let mut desired = lock(&self.desired);
        let drained: Vec<StreamHandler> = write(&self.handlers).drain().map(|(_, h)| h).collect();

        let mut failures = Vec::new();
        for mut handler in drained {
            if let Err(e) = handler.teardown() {
                failures.push(e);
            }
        }

        desired.clear();
        self.synced.store(false, Ordering::SeqCst);
        self.publish_delta(TopicDelta::default());
        failures
    }

    /// Whether a cycle has fetched the topic list since creation or the
    /// last shutdown.
    pub fn has_synced(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }

    /// Whether the most recent cycle changed the desired set.
    pub fn has_changed(&self) -> bool {
        self.changed.load(Ordering::SeqCst)
    }

    pub fn new_topics(&self) -> Vec<String> {
        read(&self.last_delta).added.clone()
    }

    pub fn removed_topics(&self) -> Vec<String> {
        read(&self.last_delta).removed.clone()
    }

    /// Desired set remembered from the last successful cycle.
    ///
    /// Blocks while a cycle is in flight.
    pub fn desired_topics(&self) -> Vec<String> {
        lock(&self.desired).clone()
    }

    /// Topics with a live handler, sorted.
    pub fn active_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = read(&self.handlers).keys().cloned().collect();
        topics.sort();
        topics
    }

    pub fn handler_count(&self) -> usize {
        read(&self.handlers).len()
    }

    pub fn latest_sample(&self, topic: &str) -> Option<Arc<PointCloud>> {
        read(&self.handlers).get(topic).and_then(StreamHandler::latest_sample)
    }

    pub fn radius(&self, topic: &str) -> Option<f64> {
        read(&self.handlers).get(topic).map(StreamHandler::radius)
    }

    /// Forget the remembered set while keeping handlers, so the next cycle
    /// re-adds topics that are already live.
    #[cfg(test)]
    pub(super) fn forget_desired(&self) {
        lock(&self.desired).clear();
    }
}

impl Drop for TopicReconciler {
    fn drop(&mut self) {
        for e in self.shutdown() {
            warn!("Teardown during shutdown failed: {e}");
        }
    }
}
