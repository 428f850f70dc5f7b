//! # Node Remapper
//!
//! Rewrites a single node against resolved bindings.

use crate::graph::{BlueprintGraph, GraphNode, NodeKind, Pin, PinId, PinType};
use crate::report::Issue;
use crate::symbols::{BindingMap, Confidence, Symbol};

/// A node after remapping, together with its retyped pins.
///
/// A failed node keeps its original kind and pin shape; it is reported but
/// never placed in the output graph. Pins carry no links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedNode {
    pub node: GraphNode,
    pub pins: Vec<Pin>,
    pub issues: Vec<Issue>,
    pub failed: bool,
}

impl RemappedNode {
    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }
}

pub struct NodeRemapper<'a> {
    graph: &'a BlueprintGraph,
    bindings: &'a BindingMap,
}

impl<'a> NodeRemapper<'a> {
    pub fn new(graph: &'a BlueprintGraph, bindings: &'a BindingMap) -> Self {
        Self { graph, bindings }
    }

    pub fn remap(&self, node: &GraphNode) -> RemappedNode {
        let mut pins: Vec<Pin> = node
            .pin_ids()
            .filter_map(|id| self.graph.pin(id))
            .cloned()
            .map(|mut pin| {
                pin.links.clear();
                pin
            })
            .collect();

        let mut issues = Vec::new();
        let mut unresolved = false;
        for symbol in node.kind.required_symbols() {
            match self.bindings.get(symbol) {
                Some(binding) if binding.confidence == Confidence::Coerced => {
                    if let Some(target) = &binding.target {
                        issues.push(Issue::CoercedBinding {
                            from: symbol.to_string(),
                            to: target.to_string(),
                        });
                    }
                }
                Some(binding) if binding.is_resolved() => {}
                _ => {
                    unresolved = true;
                    issues.push(Issue::UnresolvedSymbol {
                        symbol: symbol.to_string(),
                    });
                }
            }
        }

        if unresolved {
            tracing::warn!("[REMAP] Node {} ({}) failed to remap", node.id, node.title());
            return RemappedNode {
                node: node.clone(),
                pins,
                issues,
                failed: true,
            };
        }

        let kind = self.rebind(&node.kind);
        retype_pins(node, &kind, &mut pins);
        tracing::debug!("[REMAP] Node {} -> {}", node.id, kind.title());

        RemappedNode {
            node: GraphNode {
                kind,
                ..node.clone()
            },
            pins,
            issues,
            failed: false,
        }
    }

    fn bound(&self, symbol: &Symbol) -> Symbol {
        self.bindings
            .get(symbol)
            .and_then(|b| b.target.clone())
            .unwrap_or_else(|| symbol.clone())
    }

    fn rebind(&self, kind: &NodeKind) -> NodeKind {
        match kind {
            NodeKind::Event { event } => NodeKind::Event {
                event: self.bound(event),
            },
            NodeKind::FunctionCall { function } => NodeKind::FunctionCall {
                function: self.bound(function),
            },
            NodeKind::VariableGet { variable } => NodeKind::VariableGet {
                variable: self.bound(variable),
            },
            NodeKind::VariableSet { variable } => NodeKind::VariableSet {
                variable: self.bound(variable),
            },
            NodeKind::ControlFlow(op) => NodeKind::ControlFlow(*op),
        }
    }
}

/// Applies the bound signature to the node's data pins, in declaration order.
/// Exec pins are never retyped.
fn retype_pins(node: &GraphNode, kind: &NodeKind, pins: &mut [Pin]) {
    let (input_types, output_types): (Vec<PinType>, Vec<PinType>) = match kind {
        NodeKind::Event { event } => (Vec::new(), event.signature.params.clone()),
        NodeKind::FunctionCall { function } => {
            (function.signature.params.clone(), function.signature.returns.clone())
        }
        NodeKind::VariableGet { variable } => {
            let ty = variable.property_type().cloned();
            (Vec::new(), ty.into_iter().collect())
        }
        NodeKind::VariableSet { variable } => {
            let ty: Vec<PinType> = variable.property_type().cloned().into_iter().collect();
            (ty.clone(), ty)
        }
        NodeKind::ControlFlow(_) => return,
    };

    apply(&node.inputs, &input_types, pins);
    apply(&node.outputs, &output_types, pins);
}

fn apply(side: &[PinId], types: &[PinType], pins: &mut [Pin]) {
    let data_pins: Vec<PinId> = side
        .iter()
        .copied()
        .filter(|id| pins.iter().any(|p| p.id == *id && !p.is_exec()))
        .collect();

    for (id, ty) in data_pins.into_iter().zip(types) {
        if let Some(pin) = pins.iter_mut().find(|p| p.id == id) {
            pin.ty = ty.clone();
        }
    }
}
