//! Player-facing gameplay preferences the weapon consults.

use serde::{Deserialize, Serialize};

/// How the aim button behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimStyle {
    /// Aim while the button is down.
    #[default]
    Hold,
    /// Each press flips aiming on or off.
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    pub aim_style: AimStyle,
}

impl GameplaySettings {
    pub fn toggle_aim() -> Self {
        Self {
            aim_style: AimStyle::Toggle,
        }
    }
}
