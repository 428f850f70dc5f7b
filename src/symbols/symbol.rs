//! Symbols referenced by graph nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::{Compatibility, PinType};
use crate::hierarchy::ClassRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Property,
    Event,
}

/// Where a symbol is defined, relative to the blueprint that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SymbolScope {
    /// Defined by the parent class or one of its ancestors. Must be retargeted.
    Inherited,
    /// Declared by the blueprint itself; survives reparenting as-is.
    Local,
    /// A static function library entry, independent of the parent class.
    Library,
}

/// Parameter and return types of a symbol.
///
/// A property is modelled as a signature with no params and a single return.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<PinType>,
    pub returns: Vec<PinType>,
}

impl Signature {
    pub fn new(params: Vec<PinType>, returns: Vec<PinType>) -> Self {
        Self { params, returns }
    }

    pub fn property(ty: PinType) -> Self {
        Self {
            params: Vec::new(),
            returns: vec![ty],
        }
    }

    /// Checks whether call sites written against `source` still type-check
    /// when bound to `target`.
    ///
    /// Arguments flow from the caller into the target's params; results flow
    /// out of the target's returns back into the caller's consumers.
    pub fn compatibility(source: &Signature, target: &Signature, registry: &ClassRegistry) -> Compatibility {
        if source.params.len() != target.params.len() || source.returns.len() != target.returns.len() {
            return Compatibility::Incompatible;
        }

        let params = source
            .params
            .iter()
            .zip(&target.params)
            .map(|(src, dst)| PinType::compatibility(src, dst, registry));
        let returns = source
            .returns
            .iter()
            .zip(&target.returns)
            .map(|(src, dst)| PinType::compatibility(dst, src, registry));

        params.chain(returns).fold(Compatibility::Exact, Compatibility::and)
    }

    /// Like [`Signature::compatibility`], but for a symbol of the given kind.
    /// Event params are produced by the event node, so they flow like returns.
    pub fn compatibility_for(
        kind: SymbolKind,
        source: &Signature,
        target: &Signature,
        registry: &ClassRegistry,
    ) -> Compatibility {
        match kind {
            SymbolKind::Event => Signature::compatibility(&source.as_outputs(), &target.as_outputs(), registry),
            SymbolKind::Function | SymbolKind::Property => Signature::compatibility(source, target, registry),
        }
    }

    fn as_outputs(&self) -> Signature {
        Signature {
            params: Vec::new(),
            returns: self.params.iter().chain(&self.returns).cloned().collect(),
        }
    }
}

/// A reference to a named member, as recorded on a graph node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub signature: Signature,
    pub scope: SymbolScope,
}

impl Symbol {
    pub fn function(name: impl Into<String>, params: Vec<PinType>, returns: Vec<PinType>) -> Self {
        Self {
            kind: SymbolKind::Function,
            name: name.into(),
            signature: Signature::new(params, returns),
            scope: SymbolScope::Inherited,
        }
    }

    pub fn property(name: impl Into<String>, ty: PinType) -> Self {
        Self {
            kind: SymbolKind::Property,
            name: name.into(),
            signature: Signature::property(ty),
            scope: SymbolScope::Inherited,
        }
    }

    pub fn event(name: impl Into<String>, params: Vec<PinType>) -> Self {
        Self {
            kind: SymbolKind::Event,
            name: name.into(),
            signature: Signature::new(params, Vec::new()),
            scope: SymbolScope::Inherited,
        }
    }

    pub fn with_scope(mut self, scope: SymbolScope) -> Self {
        self.scope = scope;
        self
    }

    /// The declared type of a property symbol.
    pub fn property_type(&self) -> Option<&PinType> {
        match self.kind {
            SymbolKind::Property => self.signature.returns.first(),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "Function"),
            SymbolKind::Property => write!(f, "Property"),
            SymbolKind::Event => write!(f, "Event"),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}
