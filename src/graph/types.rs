//! Pin types and connection compatibility.
//!
//! Conversion policy is conservative:
//!
//! - `Exec` pins only connect to `Exec` pins
//! - `Int -> Float` widens implicitly, `Float -> Int` never does
//! - An object reference converts to any ancestor class
//! - `Wildcard` accepts any data type, reported as a coercion

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hierarchy::ClassRegistry;

/// Declared type of a pin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PinType {
    Exec,
    Bool,
    Int,
    Float,
    String,
    Name,
    Vector,
    Rotator,
    Transform,
    /// Reference to an instance of the named class.
    Object(String),
    Struct(String),
    Wildcard,
}

/// How well a value of one pin type fits a pin of another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Compatibility {
    Exact,
    Coerced,
    Incompatible,
}

impl Compatibility {
    pub fn is_compatible(self) -> bool {
        self != Compatibility::Incompatible
    }

    /// Combines two verdicts, keeping the weaker one.
    pub fn and(self, other: Compatibility) -> Compatibility {
        self.max(other)
    }
}

impl PinType {
    pub fn is_exec(&self) -> bool {
        matches!(self, PinType::Exec)
    }

    /// Returns how a value flowing out of a `from` pin fits into a `to` pin.
    pub fn compatibility(from: &PinType, to: &PinType, registry: &ClassRegistry) -> Compatibility {
        if from == to {
            return Compatibility::Exact;
        }

        match (from, to) {
            (PinType::Exec, _) | (_, PinType::Exec) => Compatibility::Incompatible,
            (PinType::Wildcard, _) | (_, PinType::Wildcard) => Compatibility::Coerced,
            (PinType::Int, PinType::Float) => Compatibility::Coerced,
            (PinType::Object(derived), PinType::Object(base)) => {
                if registry.is_child_of(derived, base) {
                    Compatibility::Exact
                } else {
                    Compatibility::Incompatible
                }
            }
            _ => Compatibility::Incompatible,
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinType::Exec => write!(f, "exec"),
            PinType::Bool => write!(f, "bool"),
            PinType::Int => write!(f, "int"),
            PinType::Float => write!(f, "float"),
            PinType::String => write!(f, "string"),
            PinType::Name => write!(f, "name"),
            PinType::Vector => write!(f, "vector"),
            PinType::Rotator => write!(f, "rotator"),
            PinType::Transform => write!(f, "transform"),
            PinType::Object(class) => write!(f, "object<{}>", class),
            PinType::Struct(name) => write!(f, "struct<{}>", name),
            PinType::Wildcard => write!(f, "wildcard"),
        }
    }
}
