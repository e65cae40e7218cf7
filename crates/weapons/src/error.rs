//! Setup errors. Runtime edge cases (empty magazine, blocked reload,
//! failed penetration) are state transitions, never errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeaponError {
    #[error("weapon profile `{weapon}`: {field} {reason}")]
    InvalidProfile {
        weapon: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("animation length `{name}` must be finite and non-negative, got {value}")]
    InvalidAnimationLength { name: &'static str, value: f32 },
}

impl WeaponError {
    pub(crate) fn profile(weapon: &str, field: &'static str, reason: &'static str) -> Self {
        WeaponError::InvalidProfile {
            weapon: weapon.to_owned(),
            field,
            reason,
        }
    }
}
