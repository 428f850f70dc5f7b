//! Graph nodes and pins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::id::{GraphId, NodeId, PinId};
use super::types::PinType;
use crate::symbols::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    Input,
    Output,
}

/// A typed connection point on a node.
///
/// Links are stored on both endpoints; an output pin's `links` name input pins
/// and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub owner: NodeId,
    pub name: String,
    pub ty: PinType,
    pub direction: PinDirection,
    #[serde(default)]
    pub links: BTreeSet<PinId>,
}

impl Pin {
    pub fn new(id: PinId, owner: NodeId, name: impl Into<String>, ty: PinType, direction: PinDirection) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            ty,
            direction,
            links: BTreeSet::new(),
        }
    }

    pub fn is_exec(&self) -> bool {
        self.ty.is_exec()
    }
}

/// Built-in flow-control nodes. They reference no symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlFlowOp {
    Branch,
    Sequence,
    ForLoop,
    WhileLoop,
    DoOnce,
    Gate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Event { event: Symbol },
    FunctionCall { function: Symbol },
    VariableGet { variable: Symbol },
    VariableSet { variable: Symbol },
    ControlFlow(ControlFlowOp),
}

impl NodeKind {
    /// Every symbol this node needs bound in the target namespace.
    pub fn required_symbols(&self) -> Vec<&Symbol> {
        match self {
            NodeKind::Event { event } => vec![event],
            NodeKind::FunctionCall { function } => vec![function],
            NodeKind::VariableGet { variable } | NodeKind::VariableSet { variable } => vec![variable],
            NodeKind::ControlFlow(_) => Vec::new(),
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self, NodeKind::Event { .. })
    }

    /// Short human-readable label, e.g. `Set Health` or `Call Jump`.
    pub fn title(&self) -> String {
        match self {
            NodeKind::Event { event } => format!("Event {}", event.name),
            NodeKind::FunctionCall { function } => format!("Call {}", function.name),
            NodeKind::VariableGet { variable } => format!("Get {}", variable.name),
            NodeKind::VariableSet { variable } => format!("Set {}", variable.name),
            NodeKind::ControlFlow(op) => format!("{:?}", op),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Owning graph. A lookup key, not an owning reference.
    pub graph: GraphId,
    pub kind: NodeKind,
    pub inputs: Vec<PinId>,
    pub outputs: Vec<PinId>,
}

impl GraphNode {
    pub fn new(id: NodeId, graph: GraphId, kind: NodeKind) -> Self {
        Self {
            id,
            graph,
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn title(&self) -> String {
        self.kind.title()
    }

    pub fn pin_ids(&self) -> impl Iterator<Item = PinId> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).copied()
    }
}
