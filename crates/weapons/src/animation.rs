//! Animation lengths the weapon waits on.
//!
//! The weapon never plays animations itself; it only needs to know how long
//! each one lasts so its timed phases line up with what the viewmodel shows.

use serde::{Deserialize, Serialize};

use crate::error::WeaponError;

/// Read-only source of animation lengths, in seconds. Queried once when a
/// gun is built.
pub trait AnimationSource {
    fn draw(&self) -> f32;
    fn hide(&self) -> f32;
    /// Tactical magazine swap (rounds left in the gun).
    fn reload(&self) -> f32;
    /// Magazine swap from empty.
    fn full_reload(&self) -> f32;
    fn start_reload(&self) -> f32;
    fn insert_in_chamber(&self) -> f32;
    fn insert(&self) -> f32;
    fn stop_reload(&self) -> f32;
    fn switch_mode(&self) -> f32;
    /// Zero when the weapon has no melee animation.
    fn melee(&self) -> f32;
    /// Time from the start of the swing to the strike.
    fn melee_delay(&self) -> f32;
    fn interact(&self) -> f32;
    fn interact_delay(&self) -> f32;

    /// Whether a melee swing can be played at all.
    fn can_melee(&self) -> bool {
        self.melee() > 0.0
    }
}

/// Cached animation lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTimings {
    pub draw: f32,
    pub hide: f32,
    pub reload: f32,
    pub full_reload: f32,
    pub start_reload: f32,
    pub insert_in_chamber: f32,
    pub insert: f32,
    pub stop_reload: f32,
    pub switch_mode: f32,
    pub melee: f32,
    pub melee_delay: f32,
    pub interact: f32,
    pub interact_delay: f32,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            draw: 0.6,
            hide: 0.4,
            reload: 2.1,
            full_reload: 2.8,
            start_reload: 0.5,
            insert_in_chamber: 0.9,
            insert: 0.6,
            stop_reload: 0.4,
            switch_mode: 0.3,
            melee: 0.8,
            melee_delay: 0.2,
            interact: 0.5,
            interact_delay: 0.3,
        }
    }
}

impl AnimationTimings {
    /// Every length zero. Handy for hosts without a viewmodel.
    pub fn instant() -> Self {
        Self {
            draw: 0.0,
            hide: 0.0,
            reload: 0.0,
            full_reload: 0.0,
            start_reload: 0.0,
            insert_in_chamber: 0.0,
            insert: 0.0,
            stop_reload: 0.0,
            switch_mode: 0.0,
            melee: 0.0,
            melee_delay: 0.0,
            interact: 0.0,
            interact_delay: 0.0,
        }
    }

    /// Snapshot any source into plain values.
    pub fn capture(source: &dyn AnimationSource) -> Self {
        Self {
            draw: source.draw(),
            hide: source.hide(),
            reload: source.reload(),
            full_reload: source.full_reload(),
            start_reload: source.start_reload(),
            insert_in_chamber: source.insert_in_chamber(),
            insert: source.insert(),
            stop_reload: source.stop_reload(),
            switch_mode: source.switch_mode(),
            melee: source.melee(),
            melee_delay: source.melee_delay(),
            interact: source.interact(),
            interact_delay: source.interact_delay(),
        }
    }

    pub fn validate(&self) -> Result<(), WeaponError> {
        let lengths = [
            ("draw", self.draw),
            ("hide", self.hide),
            ("reload", self.reload),
            ("full_reload", self.full_reload),
            ("start_reload", self.start_reload),
            ("insert_in_chamber", self.insert_in_chamber),
            ("insert", self.insert),
            ("stop_reload", self.stop_reload),
            ("switch_mode", self.switch_mode),
            ("melee", self.melee),
            ("melee_delay", self.melee_delay),
            ("interact", self.interact),
            ("interact_delay", self.interact_delay),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(WeaponError::InvalidAnimationLength { name, value });
            }
        }
        if self.melee > 0.0 && self.melee_delay > self.melee {
            return Err(WeaponError::InvalidAnimationLength {
                name: "melee_delay",
                value: self.melee_delay,
            });
        }
        Ok(())
    }
}

impl AnimationSource for AnimationTimings {
    fn draw(&self) -> f32 {
        self.draw
    }
    fn hide(&self) -> f32 {
        self.hide
    }
    fn reload(&self) -> f32 {
        self.reload
    }
    fn full_reload(&self) -> f32 {
        self.full_reload
    }
    fn start_reload(&self) -> f32 {
        self.start_reload
    }
    fn insert_in_chamber(&self) -> f32 {
        self.insert_in_chamber
    }
    fn insert(&self) -> f32 {
        self.insert
    }
    fn stop_reload(&self) -> f32 {
        self.stop_reload
    }
    fn switch_mode(&self) -> f32 {
        self.switch_mode
    }
    fn melee(&self) -> f32 {
        self.melee
    }
    fn melee_delay(&self) -> f32 {
        self.melee_delay
    }
    fn interact(&self) -> f32 {
        self.interact
    }
    fn interact_delay(&self) -> f32 {
        self.interact_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timings_default_is_valid() {
        assert!(AnimationTimings::default().validate().is_ok());
        assert!(AnimationTimings::instant().validate().is_ok());
    }

    #[test]
    fn timings_reject_negative_length() {
        let timings = AnimationTimings {
            insert: -0.1,
            ..Default::default()
        };
        assert_eq!(
            timings.validate(),
            Err(WeaponError::InvalidAnimationLength {
                name: "insert",
                value: -0.1
            })
        );
    }

    #[test]
    fn timings_reject_nan() {
        let timings = AnimationTimings {
            draw: f32::NAN,
            ..Default::default()
        };
        assert!(timings.validate().is_err());
    }

    #[test]
    fn timings_reject_strike_after_swing_ends() {
        let timings = AnimationTimings {
            melee: 0.5,
            melee_delay: 0.7,
            ..Default::default()
        };
        assert!(timings.validate().is_err());
    }

    #[test]
    fn timings_capture_copies_source() {
        let timings = AnimationTimings {
            stop_reload: 1.25,
            ..Default::default()
        };
        let captured = AnimationTimings::capture(&timings);
        assert_eq!(captured, timings);
        assert!(captured.can_melee());
        assert!(!AnimationTimings::instant().can_melee());
    }

    #[test]
    fn timings_partial_ron() {
        let timings: AnimationTimings = ron::from_str("(reload: 1.5, melee: 0.0)").unwrap();
        assert_eq!(timings.reload, 1.5);
        assert_eq!(timings.draw, AnimationTimings::default().draw);
        assert!(!timings.can_melee());
    }
}
