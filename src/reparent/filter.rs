//! Target class eligibility.
//!
//! A blueprint may only move within the family of classes it already belongs
//! to: actors stay actors, animation blueprints stay animation instances, and
//! so on. A blueprint may never become its own parent or a child of itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::HierarchyRoots;
use crate::graph::{BlueprintGraph, BlueprintKind};
use crate::hierarchy::ClassRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFilter {
    /// When non-empty, the target must descend from one of these.
    pub allowed_children_of: BTreeSet<String>,
    /// The target must not descend from any of these.
    pub disallowed_children_of: BTreeSet<String>,
    /// These exact classes are never valid targets.
    pub disallowed_classes: BTreeSet<String>,
    pub native_only: bool,
}

impl TargetFilter {
    /// Builds the filter that applies to reparenting all of `graphs` at once.
    pub fn for_blueprints(registry: &ClassRegistry, roots: &HierarchyRoots, graphs: &[&BlueprintGraph]) -> Self {
        let mut actors = 0usize;
        let mut level_scripts = 0usize;
        let mut is_component = false;
        let mut is_anim = false;
        let mut has_parent = !graphs.is_empty();
        let mut generated: BTreeSet<String> = BTreeSet::new();

        for graph in graphs {
            is_anim |= graph.kind == BlueprintKind::Animation;

            // A parent that is no longer registered is as good as missing.
            match graph.parent_class.as_deref().filter(|p| registry.contains(p)) {
                Some(parent) => {
                    if registry.is_child_of(parent, &roots.actor) {
                        actors += 1;
                        if registry.is_child_of(parent, &roots.level_script_actor) {
                            level_scripts += 1;
                        }
                    }
                    is_component |= registry.is_child_of(parent, &roots.actor_component);
                }
                None => has_parent = false,
            }
            if let Some(class) = &graph.generated_class {
                generated.insert(class.clone());
            }
        }

        let mut filter = TargetFilter::default();
        filter.disallowed_children_of.insert(roots.interface.clone());
        filter.disallowed_children_of.extend(generated.iter().cloned());

        if actors > 0 {
            // Level-script rules only when every actor in the selection is one.
            if level_scripts == actors {
                filter.allowed_children_of.insert(roots.level_script_actor.clone());
                filter.native_only = true;
            } else {
                filter.allowed_children_of.insert(roots.actor.clone());
                filter.disallowed_children_of.insert(roots.level_script_actor.clone());
            }
        } else if is_anim {
            filter.allowed_children_of.insert(roots.anim_instance.clone());
        } else if is_component {
            filter.allowed_children_of.insert(roots.actor_component.clone());
        } else if has_parent {
            filter.disallowed_children_of.insert(roots.actor.clone());
        }

        filter.disallowed_classes.extend(generated);
        filter
    }

    pub fn is_allowed(&self, registry: &ClassRegistry, class: &str) -> bool {
        self.rejection(registry, class).is_none()
    }

    /// Returns why `class` is not an acceptable target, or `None` if it is.
    pub fn rejection(&self, registry: &ClassRegistry, class: &str) -> Option<String> {
        let Some(descriptor) = registry.get(class) else {
            return Some("class is not registered".to_string());
        };

        if self.disallowed_classes.contains(class) {
            return Some("a blueprint cannot become its own parent".to_string());
        }
        if descriptor.flags.interface {
            return Some("interfaces cannot be parent classes".to_string());
        }
        if let Some(base) = self
            .disallowed_children_of
            .iter()
            .find(|base| registry.is_child_of(class, base))
        {
            return Some(format!("descends from disallowed class '{}'", base));
        }
        if !self.allowed_children_of.is_empty()
            && !self
                .allowed_children_of
                .iter()
                .any(|base| registry.is_child_of(class, base))
        {
            let allowed: Vec<&str> = self.allowed_children_of.iter().map(String::as_str).collect();
            return Some(format!("must descend from one of [{}]", allowed.join(", ")));
        }
        if descriptor.flags.deprecated {
            return Some("class is deprecated".to_string());
        }
        if self.native_only && !descriptor.flags.native {
            return Some("only native classes are allowed".to_string());
        }

        None
    }
}
