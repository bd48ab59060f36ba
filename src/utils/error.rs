//! The `error` module defines the error types used across `pctopics`.
//!
//! None of these conditions is fatal to the process. The reconciler absorbs
//! them locally and hands them back as diagnostics in its cycle report.

use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,

    #[error("unknown subscription {0}")]
    UnknownSubscription(Uuid),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("parameter store unreachable for '{key}': {reason}")]
    Unreachable { key: String, reason: String },

    #[error("topic '{0}' already has a live handler")]
    DuplicateTopic(String),

    #[error("handler for '{0}' is already active")]
    AlreadyActive(String),

    #[error("transport failure on '{topic}': {source}")]
    Transport {
        topic: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
