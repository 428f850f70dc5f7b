//! # Blueprint Retarget Engine
//!
//! Rewrites Blueprint visual node graphs so they run against a different
//! parent class. Typical use is repairing a Blueprint whose parent class was
//! deleted or renamed.
//!
//! The engine provides:
//! - Symbol resolution against the target class and its ancestors, with a
//!   user-supplied rename map as fallback
//! - Per-node remapping that retypes pins from the bound signatures
//! - Link re-validation after remapping; broken links are dropped, never forced
//! - Reparenting rules that keep actors, components and animation Blueprints
//!   inside their own class families
//! - A deterministic report of every node that did not migrate cleanly
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bpretarget::{retarget_graph, BlueprintGraph, ClassRegistry, GraphId};
//!
//! let graph = BlueprintGraph::new(GraphId(0), "BP_Door").with_parent("OldDoorBase");
//! let registry = ClassRegistry::new();
//! // ... register the target class and build the graph
//!
//! match retarget_graph(&graph, &registry, "DoorBase") {
//!     Ok(output) => {
//!         std::fs::write("report.json", output.report.to_json()?)?;
//!     }
//!     Err(e) => eprintln!("Retarget failed: {}", e),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! Each run follows a fixed pipeline:
//!
//! 1. **Checks** - Structural validation of the input, target eligibility
//! 2. **Resolving** - Bind every referenced symbol in the target namespace
//! 3. **Remapping** - Rewrite nodes against the bindings, in control-flow order
//! 4. **Validating** - Re-check every link between the rewritten nodes
//! 5. **Report** - Aggregate per-node outcomes
//!
//! The input graph is never modified; a new graph is built from the surviving
//! nodes and links.

pub mod config;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod remap;
pub mod reparent;
pub mod report;
pub mod retarget;
pub mod symbols;

// Re-export the main retarget API
pub use retarget::{
    retarget_batch,
    retarget_graph,
    retarget_graph_with_config,
    RetargetOutput,
    RetargetPhase,
    Retargeter,
};

pub use config::{HierarchyRoots, RetargetConfig};
pub use error::{Result, RetargetError};

pub use graph::{
    BlueprintGraph, BlueprintKind, Compatibility, Connection, ControlFlowOp, GraphId,
    GraphNode, NodeId, NodeKind, Pin, PinDirection, PinId, PinType,
};

pub use hierarchy::{ClassDescriptor, ClassFlags, ClassRegistry};

pub use symbols::{
    BindingMap, Confidence, Signature, Symbol, SymbolBinding, SymbolKind, SymbolResolver,
    SymbolScope, TargetContext,
};

pub use remap::{ConnectionValidator, ConnectionVerdict, NodeRemapper, RemappedNode, RemappedNodes};

pub use report::{Issue, NodeOutcome, NodeStatus, RetargetReport, Summary};

pub use reparent::{needs_retarget, preflight, ClassWarning, TargetFilter};
