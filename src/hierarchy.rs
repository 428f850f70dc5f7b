//! # Class Hierarchy
//!
//! Registry of class descriptors supplied by the host. A class's namespace
//! is its own members plus those of every ancestor, nearest first.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::graph::PinType;
use crate::symbols::{Signature, SymbolKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFlags {
    pub native: bool,
    pub deprecated: bool,
    pub interface: bool,
}

/// Reflection data for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub flags: ClassFlags,
    #[serde(default)]
    pub functions: BTreeMap<String, Signature>,
    #[serde(default)]
    pub properties: BTreeMap<String, PinType>,
    #[serde(default)]
    pub events: BTreeMap<String, Signature>,
    #[serde(default)]
    pub interfaces: BTreeSet<String>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_function(mut self, name: impl Into<String>, params: Vec<PinType>, returns: Vec<PinType>) -> Self {
        self.functions.insert(name.into(), Signature::new(params, returns));
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, ty: PinType) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }

    pub fn with_event(mut self, name: impl Into<String>, params: Vec<PinType>) -> Self {
        self.events.insert(name.into(), Signature::new(params, Vec::new()));
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.insert(interface.into());
        self
    }

    /// Looks up a member declared directly on this class.
    pub fn own_symbol(&self, kind: SymbolKind, name: &str) -> Option<Signature> {
        match kind {
            SymbolKind::Function => self.functions.get(name).cloned(),
            SymbolKind::Property => self.properties.get(name).cloned().map(Signature::property),
            SymbolKind::Event => self.events.get(name).cloned(),
        }
    }
}

/// A symbol found in a class namespace, with the class that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundSymbol<'a> {
    pub owner: &'a str,
    pub signature: Signature,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassRegistry {
    classes: BTreeMap<String, ClassDescriptor>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class, replacing any previous descriptor with the same name.
    pub fn register(&mut self, class: ClassDescriptor) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the class itself followed by its registered ancestors, nearest
    /// first. Stops at the first unregistered parent or at a repeated class.
    pub fn lineage<'a>(&'a self, name: &str) -> Vec<&'a ClassDescriptor> {
        let mut chain: Vec<&ClassDescriptor> = Vec::new();
        let mut current = self.classes.get(name);

        while let Some(class) = current {
            if chain.iter().any(|seen| seen.name == class.name) {
                tracing::warn!("[RETARGET] Cycle in class hierarchy at '{}'", class.name);
                break;
            }
            chain.push(class);
            current = class.parent.as_deref().and_then(|p| self.classes.get(p));
        }

        chain
    }

    /// Ancestors of `name`, nearest first, excluding the class itself.
    pub fn ancestors<'a>(&'a self, name: &str) -> Vec<&'a ClassDescriptor> {
        self.lineage(name).into_iter().skip(1).collect()
    }

    /// Returns `true` if `class` is `base` or descends from it.
    pub fn is_child_of(&self, class: &str, base: &str) -> bool {
        class == base || self.lineage(class).iter().any(|c| c.name == base)
    }

    /// Returns `true` if `class` or any ancestor implements `interface`.
    pub fn implements(&self, class: &str, interface: &str) -> bool {
        self.lineage(class)
            .iter()
            .any(|c| c.interfaces.contains(interface))
    }

    /// Finds a member by kind and name in the namespace of `class`.
    pub fn find_symbol<'a>(&'a self, class: &str, kind: SymbolKind, name: &str) -> Option<FoundSymbol<'a>> {
        self.lineage(class).into_iter().find_map(|c| {
            c.own_symbol(kind, name).map(|signature| FoundSymbol {
                owner: c.name.as_str(),
                signature,
            })
        })
    }
}
