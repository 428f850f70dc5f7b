//! Class-level checks run before a graph is retargeted.

use serde::{Deserialize, Serialize};

use crate::graph::BlueprintGraph;
use crate::hierarchy::ClassRegistry;

/// A class-level concern about moving a blueprint onto a new parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWarning {
    /// The new parent already implements interfaces the blueprint implements
    /// itself.
    CommonInterfaces { interfaces: Vec<String> },
    /// The new parent is not a descendant of the old one, so inherited data
    /// may be lost.
    HierarchyChange { from: Option<String>, to: String },
}

/// Returns `true` when the blueprint's parent or generated class is missing,
/// which is the situation retargeting exists to repair.
pub fn needs_retarget(graph: &BlueprintGraph, registry: &ClassRegistry) -> bool {
    let parent_ok = graph
        .parent_class
        .as_deref()
        .is_some_and(|parent| registry.contains(parent));
    !parent_ok || graph.generated_class.is_none()
}

pub fn preflight(graph: &BlueprintGraph, target: &str, registry: &ClassRegistry) -> Vec<ClassWarning> {
    let mut warnings = Vec::new();

    let common: Vec<String> = graph
        .interfaces
        .iter()
        .filter(|iface| registry.implements(target, iface))
        .cloned()
        .collect();
    if !common.is_empty() {
        warnings.push(ClassWarning::CommonInterfaces { interfaces: common });
    }

    let keeps_lineage = graph
        .parent_class
        .as_deref()
        .is_some_and(|old| registry.is_child_of(target, old));
    if !keeps_lineage {
        warnings.push(ClassWarning::HierarchyChange {
            from: graph.parent_class.clone(),
            to: target.to_string(),
        });
    }

    warnings
}
