//! # Retarget Report
//!
//! Per-node outcomes and the graph-level summary handed back to the host.
//! Everything is ordered by id so two runs over the same input serialize to
//! the same bytes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{Connection, NodeId, PinId, PinType};
use crate::remap::ConnectionVerdict;
use crate::reparent::ClassWarning;

/// A per-node finding. None of these abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    /// A required symbol has no counterpart in the target namespace.
    UnresolvedSymbol { symbol: String },
    /// A symbol was bound through a rename or an implicit conversion.
    CoercedBinding { from: String, to: String },
    /// A link on this node was dropped because its pin types no longer match.
    IncompatibleConnection {
        pin: PinId,
        peer: PinId,
        from_type: PinType,
        to_type: PinType,
    },
    /// The node is not reachable from any event. Informational.
    UnreachableNode,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::UnresolvedSymbol { symbol } => write!(f, "unresolved symbol {}", symbol),
            Issue::CoercedBinding { from, to } => write!(f, "{} bound to {} with coercion", from, to),
            Issue::IncompatibleConnection {
                pin,
                peer,
                from_type,
                to_type,
            } => write!(
                f,
                "link {} <-> {} dropped: {} does not fit {}",
                pin, peer, from_type, to_type
            ),
            Issue::UnreachableNode => write!(f, "unreachable from any event"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    Migrated,
    MigratedWithWarning,
    Failed,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOutcome {
    pub node: NodeId,
    pub title: String,
    pub status: NodeStatus,
    pub issues: Vec<Issue>,
}

/// Node counts per status. Every node lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub migrated: usize,
    pub warning: usize,
    pub failed: usize,
    pub unreachable: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.migrated + self.warning + self.failed + self.unreachable
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub valid: usize,
    pub incompatible: usize,
    pub orphaned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedConnection {
    pub connection: Connection,
    pub from_node: NodeId,
    pub to_node: NodeId,
    pub verdict: ConnectionVerdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetargetReport {
    pub graph: String,
    pub source_class: Option<String>,
    pub target_class: String,
    pub summary: Summary,
    pub connections: ConnectionSummary,
    /// One outcome per input node, ascending by id.
    pub outcomes: Vec<NodeOutcome>,
    /// `(node, reason)` for every node that did not migrate cleanly,
    /// ascending by node id.
    pub issues: Vec<(NodeId, Issue)>,
    pub dropped: Vec<DroppedConnection>,
    pub processing_order: Vec<NodeId>,
    pub class_warnings: Vec<ClassWarning>,
}

impl RetargetReport {
    pub fn outcome(&self, node: NodeId) -> Option<&NodeOutcome> {
        self.outcomes
            .binary_search_by_key(&node, |o| o.node)
            .ok()
            .map(|idx| &self.outcomes[idx])
    }

    /// `true` when no node failed.
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Collects per-node findings while a run progresses, then folds them into
/// a [`RetargetReport`].
#[derive(Debug, Default)]
pub struct ReportBuilder {
    nodes: BTreeMap<NodeId, PendingOutcome>,
    connections: ConnectionSummary,
    dropped: Vec<DroppedConnection>,
    processing_order: Vec<NodeId>,
    class_warnings: Vec<ClassWarning>,
}

#[derive(Debug, Default)]
struct PendingOutcome {
    title: String,
    failed: bool,
    unreachable: bool,
    issues: Vec<Issue>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node in processing order.
    pub fn visit(&mut self, node: NodeId, title: String, unreachable: bool) {
        self.processing_order.push(node);
        let entry = self.nodes.entry(node).or_default();
        entry.title = title;
        entry.unreachable = unreachable;
        if unreachable {
            entry.issues.push(Issue::UnreachableNode);
        }
    }

    pub fn mark_failed(&mut self, node: NodeId) {
        self.nodes.entry(node).or_default().failed = true;
    }

    pub fn add_issue(&mut self, node: NodeId, issue: Issue) {
        self.nodes.entry(node).or_default().issues.push(issue);
    }

    pub fn record_connection(&mut self, dropped: Option<DroppedConnection>) {
        match dropped {
            None => self.connections.valid += 1,
            Some(d) => {
                match d.verdict {
                    ConnectionVerdict::Incompatible => self.connections.incompatible += 1,
                    ConnectionVerdict::Orphaned => self.connections.orphaned += 1,
                    ConnectionVerdict::Valid => self.connections.valid += 1,
                }
                self.dropped.push(d);
            }
        }
    }

    pub fn add_class_warnings(&mut self, warnings: impl IntoIterator<Item = ClassWarning>) {
        self.class_warnings.extend(warnings);
    }

    pub fn build(self, graph: String, source_class: Option<String>, target_class: String) -> RetargetReport {
        let mut summary = Summary::default();
        let mut outcomes = Vec::with_capacity(self.nodes.len());
        let mut issues = Vec::new();

        for (id, pending) in self.nodes {
            let warned = pending
                .issues
                .iter()
                .any(|i| !matches!(i, Issue::UnreachableNode));

            // Failed > Warning > Unreachable > Migrated
            let status = if pending.failed {
                summary.failed += 1;
                NodeStatus::Failed
            } else if warned {
                summary.warning += 1;
                NodeStatus::MigratedWithWarning
            } else if pending.unreachable {
                summary.unreachable += 1;
                NodeStatus::Unreachable
            } else {
                summary.migrated += 1;
                NodeStatus::Migrated
            };

            issues.extend(pending.issues.iter().cloned().map(|issue| (id, issue)));
            outcomes.push(NodeOutcome {
                node: id,
                title: pending.title,
                status,
                issues: pending.issues,
            });
        }

        let mut dropped = self.dropped;
        dropped.sort_by_key(|d| d.connection);

        RetargetReport {
            graph,
            source_class,
            target_class,
            summary,
            connections: self.connections,
            outcomes,
            issues,
            dropped,
            processing_order: self.processing_order,
            class_warnings: self.class_warnings,
        }
    }
}
