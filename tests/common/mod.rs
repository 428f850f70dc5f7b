#![allow(dead_code)]

use bpretarget::{
    BlueprintGraph, ClassDescriptor, ClassFlags, ClassRegistry, GraphId, NodeId, NodeKind, PinDirection, PinId,
    PinType, Symbol,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn native() -> ClassFlags {
    ClassFlags {
        native: true,
        ..Default::default()
    }
}

/// A small engine hierarchy. `OldPawn` is deliberately absent: it plays the
/// deleted parent.
pub fn registry() -> ClassRegistry {
    let mut reg = ClassRegistry::new();
    reg.register(ClassDescriptor::new("Object").with_flags(native()));
    reg.register(
        ClassDescriptor::new("Actor")
            .with_parent("Object")
            .with_flags(native())
            .with_event("BeginPlay", vec![])
            .with_event("Tick", vec![PinType::Float])
            .with_function("Jump", vec![], vec![]),
    );
    reg.register(
        ClassDescriptor::new("Pawn")
            .with_parent("Actor")
            .with_flags(native())
            .with_function("Fire", vec![], vec![])
            .with_function("Print", vec![PinType::String], vec![])
            .with_function("Scale", vec![PinType::Float], vec![PinType::Float])
            .with_property("Ammo", PinType::Int)
            .with_property("Health", PinType::Float)
            .with_property("Speed", PinType::Float),
    );
    reg.register(ClassDescriptor::new("LevelScriptActor").with_parent("Actor").with_flags(native()));
    reg.register(ClassDescriptor::new("SaveGame").with_parent("Object").with_flags(native()));
    reg
}

/// Thin helper over [`BlueprintGraph`] that wires the usual pin layouts.
pub struct Builder {
    pub graph: BlueprintGraph,
}

pub struct ExecNode {
    pub id: NodeId,
    pub exec: Option<PinId>,
    pub then: PinId,
    pub inputs: Vec<PinId>,
    pub outputs: Vec<PinId>,
}

impl Builder {
    pub fn new(name: &str) -> Self {
        Self {
            graph: BlueprintGraph::new(GraphId(1), name)
                .with_parent("OldPawn")
                .with_generated_class(format!("{}_C", name)),
        }
    }

    pub fn event(&mut self, name: &str, params: Vec<PinType>) -> ExecNode {
        let id = self.graph.add_node(NodeKind::Event {
            event: Symbol::event(name, params.clone()),
        });
        let then = self.pin(id, "then", PinType::Exec, PinDirection::Output);
        let outputs = params
            .into_iter()
            .enumerate()
            .map(|(i, ty)| self.pin(id, &format!("param{}", i), ty, PinDirection::Output))
            .collect();
        ExecNode {
            id,
            exec: None,
            then,
            inputs: Vec::new(),
            outputs,
        }
    }

    pub fn call(&mut self, name: &str, params: Vec<PinType>, returns: Vec<PinType>) -> ExecNode {
        let id = self.graph.add_node(NodeKind::FunctionCall {
            function: Symbol::function(name, params.clone(), returns.clone()),
        });
        let exec = self.pin(id, "exec", PinType::Exec, PinDirection::Input);
        let inputs = params
            .into_iter()
            .enumerate()
            .map(|(i, ty)| self.pin(id, &format!("arg{}", i), ty, PinDirection::Input))
            .collect();
        let then = self.pin(id, "then", PinType::Exec, PinDirection::Output);
        let outputs = returns
            .into_iter()
            .enumerate()
            .map(|(i, ty)| self.pin(id, &format!("ret{}", i), ty, PinDirection::Output))
            .collect();
        ExecNode {
            id,
            exec: Some(exec),
            then,
            inputs,
            outputs,
        }
    }

    pub fn set(&mut self, name: &str, ty: PinType) -> ExecNode {
        let id = self.graph.add_node(NodeKind::VariableSet {
            variable: Symbol::property(name, ty.clone()),
        });
        let exec = self.pin(id, "exec", PinType::Exec, PinDirection::Input);
        let value = self.pin(id, "value", ty.clone(), PinDirection::Input);
        let then = self.pin(id, "then", PinType::Exec, PinDirection::Output);
        let out = self.pin(id, "out", ty, PinDirection::Output);
        ExecNode {
            id,
            exec: Some(exec),
            then,
            inputs: vec![value],
            outputs: vec![out],
        }
    }

    /// Returns the getter and its value pin.
    pub fn get(&mut self, name: &str, ty: PinType) -> (NodeId, PinId) {
        let id = self.graph.add_node(NodeKind::VariableGet {
            variable: Symbol::property(name, ty.clone()),
        });
        let value = self.pin(id, "value", ty, PinDirection::Output);
        (id, value)
    }

    pub fn link(&mut self, from: PinId, to: PinId) {
        self.graph.connect(from, to).expect("fixture link");
    }

    /// Chains `nodes` behind `from` through their exec pins.
    pub fn chain(&mut self, from: &ExecNode, nodes: &[&ExecNode]) {
        let mut then = from.then;
        for node in nodes {
            if let Some(exec) = node.exec {
                self.link(then, exec);
            }
            then = node.then;
        }
    }

    fn pin(&mut self, node: NodeId, name: &str, ty: PinType, direction: PinDirection) -> PinId {
        self.graph.add_pin(node, name, ty, direction).expect("fixture pin")
    }
}
