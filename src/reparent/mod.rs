//! # Reparenting Rules
//!
//! Which classes a blueprint may be moved onto, and what to warn about when
//! it is.

mod filter;
mod preflight;

pub use filter::TargetFilter;
pub use preflight::{needs_retarget, preflight, ClassWarning};
