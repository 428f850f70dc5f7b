//! # Symbol Resolver
//!
//! Binds symbols referenced by a graph to their counterparts in the target
//! class namespace. Resolution never fails: a missing counterpart is an
//! [`Confidence::Unresolved`] binding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::symbol::{Signature, Symbol, SymbolScope};
use crate::config::RetargetConfig;
use crate::graph::Compatibility;
use crate::hierarchy::ClassRegistry;

/// The namespace symbols are resolved against: a class and everything it
/// inherits.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub registry: &'a ClassRegistry,
    pub class: &'a str,
}

impl<'a> TargetContext<'a> {
    pub fn new(registry: &'a ClassRegistry, class: &'a str) -> Self {
        Self { registry, class }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Exact,
    Coerced,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolBinding {
    pub source: Symbol,
    /// `None` exactly when `confidence` is `Unresolved`.
    pub target: Option<Symbol>,
    pub confidence: Confidence,
}

impl SymbolBinding {
    pub fn is_resolved(&self) -> bool {
        self.confidence != Confidence::Unresolved
    }

    fn unresolved(source: &Symbol) -> Self {
        Self {
            source: source.clone(),
            target: None,
            confidence: Confidence::Unresolved,
        }
    }
}

/// Bindings keyed by the source symbol they resolve.
pub type BindingMap = BTreeMap<Symbol, SymbolBinding>;

pub struct SymbolResolver<'a> {
    config: &'a RetargetConfig,
}

impl<'a> SymbolResolver<'a> {
    pub fn new(config: &'a RetargetConfig) -> Self {
        Self { config }
    }

    /// Resolves one symbol against the target namespace.
    ///
    /// Order: same name in the target class or its ancestors, then the rename
    /// map. A match through the rename map is always reported as `Coerced`.
    pub fn resolve(&self, source: &Symbol, ctx: &TargetContext<'_>) -> SymbolBinding {
        if source.scope != SymbolScope::Inherited {
            return SymbolBinding {
                source: source.clone(),
                target: Some(source.clone()),
                confidence: Confidence::Exact,
            };
        }

        if let Some((target, compat)) = self.lookup(source, &source.name, ctx) {
            let confidence = match compat {
                Compatibility::Exact => Confidence::Exact,
                _ => Confidence::Coerced,
            };
            tracing::debug!("[RESOLVE] {} -> {} ({:?})", source, target, confidence);
            return SymbolBinding {
                source: source.clone(),
                target: Some(target),
                confidence,
            };
        }

        if let Some(renamed) = self.config.rename_for(source.kind, &source.name) {
            if let Some((target, _)) = self.lookup(source, renamed, ctx) {
                tracing::debug!("[RESOLVE] {} -> {} (renamed)", source, target);
                return SymbolBinding {
                    source: source.clone(),
                    target: Some(target),
                    confidence: Confidence::Coerced,
                };
            }
        }

        tracing::debug!("[RESOLVE] {} has no counterpart on '{}'", source, ctx.class);
        SymbolBinding::unresolved(source)
    }

    /// Resolves every symbol in `symbols`, once per distinct symbol.
    pub fn resolve_all<'s>(
        &self,
        symbols: impl IntoIterator<Item = &'s Symbol>,
        ctx: &TargetContext<'_>,
    ) -> BindingMap {
        let mut bindings = BindingMap::new();
        for symbol in symbols {
            if !bindings.contains_key(symbol) {
                bindings.insert(symbol.clone(), self.resolve(symbol, ctx));
            }
        }
        bindings
    }

    fn lookup(&self, source: &Symbol, name: &str, ctx: &TargetContext<'_>) -> Option<(Symbol, Compatibility)> {
        let found = ctx.registry.find_symbol(ctx.class, source.kind, name)?;
        let compat = Signature::compatibility_for(source.kind, &source.signature, &found.signature, ctx.registry);

        let accepted = match compat {
            Compatibility::Exact => true,
            Compatibility::Coerced => self.config.allow_coercion,
            Compatibility::Incompatible => false,
        };
        if !accepted {
            tracing::debug!(
                "[RESOLVE] {} found on '{}' as '{}' but signature is {:?}",
                source,
                found.owner,
                name,
                compat
            );
            return None;
        }

        let target = Symbol {
            kind: source.kind,
            name: name.to_string(),
            signature: found.signature,
            scope: SymbolScope::Inherited,
        };
        Some((target, compat))
    }
}
