//! # Symbols and Resolution
//!
//! Symbol references carried by graph nodes, and the resolver that binds them
//! to a target class namespace.

mod resolver;
mod symbol;

pub use resolver::{BindingMap, Confidence, SymbolBinding, SymbolResolver, TargetContext};
pub use symbol::{Signature, Symbol, SymbolKind, SymbolScope};
