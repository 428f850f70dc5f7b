//! # Retarget Errors
//!
//! Fatal errors only. Per-node problems (unresolved symbols, broken links,
//! unreachable nodes) are recorded in the report as [`Issue`](crate::report::Issue)s
//! and never abort a run.

use crate::graph::{NodeId, PinId};
use thiserror::Error;

/// Errors produced by the retarget engine and the graph builder.
#[derive(Debug, Error)]
pub enum RetargetError {
    /// The input graph violates a structural invariant. Aborts the run before
    /// any output is produced.
    #[error("malformed graph: {reason}")]
    MalformedGraph { reason: String },

    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    #[error("pin not found: {id}")]
    PinNotFound { id: PinId },

    /// A link requested through the builder API cannot exist.
    #[error("invalid link {from} -> {to}: {reason}")]
    InvalidLink { from: PinId, to: PinId, reason: String },

    #[error("unknown class: '{name}'")]
    UnknownClass { name: String },

    /// The target class fails the reparenting rules for this blueprint.
    #[error("target class '{target}' rejected: {reason}")]
    TargetRejected { target: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RetargetError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RetargetError::MalformedGraph {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RetargetError>;
