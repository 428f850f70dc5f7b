//! # Blueprint Graph Model
//!
//! Arena-backed node graph: nodes, typed pins and output → input links.

mod blueprint;
mod id;
mod node;
mod types;

pub use blueprint::{BlueprintGraph, BlueprintKind, Connection};
pub use id::{GraphId, NodeId, PinId};
pub use node::{ControlFlowOp, GraphNode, NodeKind, Pin, PinDirection};
pub use types::{Compatibility, PinType};
