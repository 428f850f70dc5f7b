//! # Node Remapping and Link Validation
//!
//! Per-node rewriting against resolved bindings, followed by a re-check of
//! every link between the rewritten nodes.

mod remapper;
mod validator;

pub use remapper::{NodeRemapper, RemappedNode};
pub use validator::{ConnectionValidator, ConnectionVerdict, RemappedNodes};
