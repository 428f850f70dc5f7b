//! BlueprintGraph: arena container for nodes, pins and their links.
//!
//! Nodes and pins are stored in ordered maps keyed by stable ids, so every
//! traversal and every serialized form is deterministic. The builder methods
//! keep the graph well-formed; [`BlueprintGraph::from_parts`] does not, and
//! [`BlueprintGraph::validate_structure`] is the gate the engine runs before
//! touching a graph it did not build itself.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::id::{GraphId, NodeId, PinId};
use super::node::{GraphNode, NodeKind, Pin, PinDirection};
use super::types::PinType;
use crate::error::{Result, RetargetError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlueprintKind {
    #[default]
    Normal,
    Animation,
}

/// A directed pin-to-pin link, always output → input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: PinId,
    pub to: PinId,
}

impl Connection {
    pub fn new(from: PinId, to: PinId) -> Self {
        Self { from, to }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintGraph {
    pub id: GraphId,
    pub name: String,
    /// Current parent class. `None` when the parent has gone missing.
    pub parent_class: Option<String>,
    /// The class this blueprint compiles to, if it has been compiled.
    pub generated_class: Option<String>,
    #[serde(default)]
    pub kind: BlueprintKind,
    /// Interfaces the blueprint implements itself.
    #[serde(default)]
    pub interfaces: BTreeSet<String>,
    nodes: BTreeMap<NodeId, GraphNode>,
    pins: BTreeMap<PinId, Pin>,
}

impl BlueprintGraph {
    pub fn new(id: GraphId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_class: None,
            generated_class: None,
            kind: BlueprintKind::Normal,
            interfaces: BTreeSet::new(),
            nodes: BTreeMap::new(),
            pins: BTreeMap::new(),
        }
    }

    /// Assembles a graph from loaded nodes and pins without checking any
    /// invariant. Later duplicates replace earlier ones.
    pub fn from_parts(
        id: GraphId,
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = GraphNode>,
        pins: impl IntoIterator<Item = Pin>,
    ) -> Self {
        let mut graph = Self::new(id, name);
        graph.nodes = nodes.into_iter().map(|n| (n.id, n)).collect();
        graph.pins = pins.into_iter().map(|p| (p.id, p)).collect();
        graph
    }

    pub fn with_parent(mut self, class: impl Into<String>) -> Self {
        self.parent_class = Some(class.into());
        self
    }

    pub fn with_generated_class(mut self, class: impl Into<String>) -> Self {
        self.generated_class = Some(class.into());
        self
    }

    pub fn with_kind(mut self, kind: BlueprintKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.insert(interface.into());
        self
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(&id)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Pins in ascending id order.
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// All links, read from the output side, in ascending `(from, to)` order.
    pub fn connections(&self) -> Vec<Connection> {
        self.pins
            .values()
            .filter(|pin| pin.direction == PinDirection::Output)
            .flat_map(|pin| pin.links.iter().map(move |&to| Connection::new(pin.id, to)))
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections().len()
    }

    /// Node owning the given pin.
    pub fn pin_owner(&self, pin: PinId) -> Option<&GraphNode> {
        self.pins.get(&pin).and_then(|p| self.nodes.get(&p.owner))
    }

    // -----------------------------------------------------------------------
    // Builder methods
    // -----------------------------------------------------------------------

    /// Adds a node with no pins and returns its id.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.keys().next_back().map_or(0, |last| last.0 + 1));
        self.nodes.insert(id, GraphNode::new(id, self.id, kind));
        id
    }

    /// Appends a pin to a node's input or output list.
    pub fn add_pin(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        ty: PinType,
        direction: PinDirection,
    ) -> Result<PinId> {
        let id = PinId(self.pins.keys().next_back().map_or(0, |last| last.0 + 1));
        let owner = self
            .nodes
            .get_mut(&node)
            .ok_or(RetargetError::NodeNotFound { id: node })?;

        match direction {
            PinDirection::Input => owner.inputs.push(id),
            PinDirection::Output => owner.outputs.push(id),
        }
        self.pins.insert(id, Pin::new(id, node, name, ty, direction));
        Ok(id)
    }

    /// Links an output pin to an input pin. Types are not checked here.
    pub fn connect(&mut self, from: PinId, to: PinId) -> Result<()> {
        let from_pin = self.pins.get(&from).ok_or(RetargetError::PinNotFound { id: from })?;
        let to_pin = self.pins.get(&to).ok_or(RetargetError::PinNotFound { id: to })?;

        if from_pin.direction != PinDirection::Output || to_pin.direction != PinDirection::Input {
            return Err(RetargetError::InvalidLink {
                from,
                to,
                reason: "links must run from an output pin to an input pin".to_string(),
            });
        }

        if let Some(pin) = self.pins.get_mut(&from) {
            pin.links.insert(to);
        }
        if let Some(pin) = self.pins.get_mut(&to) {
            pin.links.insert(from);
        }
        Ok(())
    }

    /// Removes a link if present. Returns whether anything changed.
    pub fn disconnect(&mut self, from: PinId, to: PinId) -> bool {
        let removed_out = self.pins.get_mut(&from).is_some_and(|p| p.links.remove(&to));
        let removed_in = self.pins.get_mut(&to).is_some_and(|p| p.links.remove(&from));
        removed_out || removed_in
    }

    /// Inserts an already-built node and its pins, keeping their ids.
    /// Links on the given pins are discarded.
    pub(crate) fn insert_node_with_pins(&mut self, mut node: GraphNode, pins: Vec<Pin>) {
        node.graph = self.id;
        for mut pin in pins {
            pin.links.clear();
            self.pins.insert(pin.id, pin);
        }
        self.nodes.insert(node.id, node);
    }

    // -----------------------------------------------------------------------
    // Structural validation
    // -----------------------------------------------------------------------

    /// Checks every structural invariant of the arena.
    ///
    /// - Map keys match the stored ids, and every node belongs to this graph
    /// - Every pin is listed exactly once, by its owner, on the side matching
    ///   its direction
    /// - Every link names an existing pin of the opposite direction and is
    ///   recorded on both endpoints
    pub fn validate_structure(&self) -> Result<()> {
        let mut listed: BTreeSet<PinId> = BTreeSet::new();

        for (key, node) in &self.nodes {
            if *key != node.id {
                return Err(RetargetError::malformed(format!(
                    "node stored under id {} reports id {}",
                    key, node.id
                )));
            }
            if node.graph != self.id {
                return Err(RetargetError::malformed(format!(
                    "node {} belongs to graph {}, not {}",
                    node.id, node.graph, self.id
                )));
            }

            let sides = [(&node.inputs, PinDirection::Input), (&node.outputs, PinDirection::Output)];
            for (list, direction) in sides {
                for pin_id in list {
                    let pin = self.pins.get(pin_id).ok_or_else(|| {
                        RetargetError::malformed(format!("node {} lists missing pin {}", node.id, pin_id))
                    })?;
                    if pin.owner != node.id {
                        return Err(RetargetError::malformed(format!(
                            "node {} lists pin {} owned by node {}",
                            node.id, pin_id, pin.owner
                        )));
                    }
                    if pin.direction != direction {
                        return Err(RetargetError::malformed(format!(
                            "pin {} is listed as {:?} on node {} but declared {:?}",
                            pin_id, direction, node.id, pin.direction
                        )));
                    }
                    if !listed.insert(*pin_id) {
                        return Err(RetargetError::malformed(format!("pin {} is listed more than once", pin_id)));
                    }
                }
            }
        }

        for (key, pin) in &self.pins {
            if *key != pin.id {
                return Err(RetargetError::malformed(format!(
                    "pin stored under id {} reports id {}",
                    key, pin.id
                )));
            }
            if !self.nodes.contains_key(&pin.owner) {
                return Err(RetargetError::malformed(format!(
                    "pin {} is owned by missing node {}",
                    pin.id, pin.owner
                )));
            }
            if !listed.contains(&pin.id) {
                return Err(RetargetError::malformed(format!(
                    "pin {} is not listed by its owner node {}",
                    pin.id, pin.owner
                )));
            }

            for peer_id in &pin.links {
                let peer = self.pins.get(peer_id).ok_or_else(|| {
                    RetargetError::malformed(format!("pin {} links to missing pin {}", pin.id, peer_id))
                })?;
                if peer.direction == pin.direction {
                    return Err(RetargetError::malformed(format!(
                        "pins {} and {} are linked but both are {:?}",
                        pin.id, peer_id, pin.direction
                    )));
                }
                if !peer.links.contains(&pin.id) {
                    return Err(RetargetError::malformed(format!(
                        "link {} -> {} is not recorded on pin {}",
                        pin.id, peer_id, peer_id
                    )));
                }
            }
        }

        Ok(())
    }
}
