//! # Retarget Configuration
//!
//! Host-supplied settings, passed explicitly into every run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::symbols::SymbolKind;

/// Class names anchoring the reparenting rules. Defaults match Unreal's
/// engine classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyRoots {
    pub actor: String,
    pub level_script_actor: String,
    pub actor_component: String,
    pub anim_instance: String,
    pub interface: String,
}

impl Default for HierarchyRoots {
    fn default() -> Self {
        Self {
            actor: "Actor".to_string(),
            level_script_actor: "LevelScriptActor".to_string(),
            actor_component: "ActorComponent".to_string(),
            anim_instance: "AnimInstance".to_string(),
            interface: "Interface".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Fallback symbol renames. Keys are either a bare name or a
    /// kind-qualified name such as `"Property:Health"`; the qualified key wins.
    pub renames: BTreeMap<String, String>,
    /// Accept bindings whose signatures only match through implicit
    /// conversions. When off, such matches are treated as misses.
    pub allow_coercion: bool,
    /// Reject target classes that fail the reparenting filter.
    pub enforce_reparenting_rules: bool,
    pub roots: HierarchyRoots,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            renames: BTreeMap::new(),
            allow_coercion: true,
            enforce_reparenting_rules: true,
            roots: HierarchyRoots::default(),
        }
    }
}

impl RetargetConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// Looks up the rename for a symbol, preferring a kind-qualified entry.
    pub fn rename_for(&self, kind: SymbolKind, name: &str) -> Option<&str> {
        self.renames
            .get(&format!("{}:{}", kind, name))
            .or_else(|| self.renames.get(name))
            .map(String::as_str)
    }
}
