//! # pctopics
//!
//! `pctopics` keeps the point-cloud topics of a simulated world in line with
//! a parameter server. A periodic cycle fetches the desired topic list, diffs
//! it against the previous one, and creates or tears down one stream handler
//! per topic. Each handler caches the latest cloud and a point radius that
//! renderers can poll while messages keep arriving on transport threads.
//!
//! ## Core Modules
//!
//! - `world`: the reconciler, the per-topic stream handlers and the world orchestrator.
//! - `transport`: stream message types, the `Transport` trait and an in-process bus.
//! - `params`: the `ParamStore` trait with in-memory and JSON-file stores.
//! - `config`: loading and merging runtime configuration.
//! - `utils`: error types, logging setup and lock helpers.

pub mod config;
pub mod params;
pub mod transport;
pub mod utils;
pub mod world;

#[cfg(test)]
mod tests;

pub use utils::error::{Error, Result};
pub use world::{StreamHandler, TopicReconciler, World};
