//! # Connection Validator
//!
//! Re-checks every input link against the remapped nodes. Only `Valid`
//! links are carried into the output graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::remapper::RemappedNode;
use crate::graph::{Connection, NodeId, Pin, PinId, PinType};
use crate::hierarchy::ClassRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionVerdict {
    Valid,
    /// Pin types no longer fit after remapping.
    Incompatible,
    /// An endpoint node failed to remap.
    Orphaned,
}

/// Remapped nodes indexed by node id and by pin id.
#[derive(Debug, Default)]
pub struct RemappedNodes {
    nodes: BTreeMap<NodeId, RemappedNode>,
    pin_owners: BTreeMap<PinId, NodeId>,
}

impl RemappedNodes {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a remapped node and indexes its pins.
    pub fn insert(&mut self, remapped: RemappedNode) {
        for pin in &remapped.pins {
            self.pin_owners.insert(pin.id, remapped.node.id);
        }
        self.nodes.insert(remapped.node.id, remapped);
    }

    /// The remapped node with this id.
    pub fn get(&self, id: NodeId) -> Option<&RemappedNode> {
        self.nodes.get(&id)
    }

    /// The pin and the remapped node owning it.
    pub fn pin(&self, id: PinId) -> Option<(&RemappedNode, &Pin)> {
        let owner = self.nodes.get(self.pin_owners.get(&id)?)?;
        owner.pin(id).map(|pin| (owner, pin))
    }

    /// Number of remapped nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when no node has been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remapped nodes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &RemappedNode> {
        self.nodes.values()
    }

    /// Consumes the set, yielding nodes in ascending id order.
    pub fn into_nodes(self) -> impl Iterator<Item = RemappedNode> {
        self.nodes.into_values()
    }
}

pub struct ConnectionValidator<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> ConnectionValidator<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    pub fn validate(&self, connection: &Connection, remapped: &RemappedNodes) -> ConnectionVerdict {
        let (Some((from_node, from_pin)), Some((to_node, to_pin))) =
            (remapped.pin(connection.from), remapped.pin(connection.to))
        else {
            return ConnectionVerdict::Orphaned;
        };

        if from_node.failed || to_node.failed {
            return ConnectionVerdict::Orphaned;
        }

        if PinType::compatibility(&from_pin.ty, &to_pin.ty, self.registry).is_compatible() {
            ConnectionVerdict::Valid
        } else {
            ConnectionVerdict::Incompatible
        }
    }
}
