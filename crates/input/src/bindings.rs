//! Key to action bindings.

use crate::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps key names (as reported by the host, e.g. `"Mouse0"`, `"R"`) to
/// actions. Several keys may drive the same action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBindings {
    #[serde(default)]
    keys: HashMap<String, Action>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            keys: HashMap::new(),
        };
        bindings.bind("Mouse0", Action::Fire);
        bindings.bind("Mouse1", Action::Aim);
        bindings.bind("R", Action::Reload);
        bindings.bind("V", Action::Melee);
        bindings.bind("B", Action::FireMode);
        bindings.bind("E", Action::Interact);
        bindings
    }
}

impl InputBindings {
    /// Bindings with no keys at all.
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Bind a key to an action, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, action: Action) {
        self.keys.insert(key.into(), action);
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(key).copied()
    }
}
