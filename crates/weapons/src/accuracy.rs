//! Accuracy breathing: a scalar in `[base, aim]` that chases a
//! stance-dependent target every tick.

use crate::profile::WeaponProfile;

/// How long a shot keeps the "just fired" flag up, in seconds.
pub const RECENT_FIRE_WINDOW: f32 = 0.1;

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyModel {
    current: f32,
    /// Seconds left on the "just fired" flag.
    recent_fire: f32,
    base: f32,
    hip: f32,
    aim: f32,
    decay_shooting: f32,
    decay_walking: f32,
}

impl AccuracyModel {
    /// Starts at the base (worst) accuracy.
    pub fn new(profile: &WeaponProfile) -> Self {
        Self {
            current: profile.base_accuracy,
            recent_fire: 0.0,
            base: profile.base_accuracy,
            hip: profile.hip_accuracy,
            aim: profile.aim_accuracy,
            decay_shooting: profile.decay_rate_shooting,
            decay_walking: profile.decay_rate_walking,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn just_fired(&self) -> bool {
        self.recent_fire > 0.0
    }

    /// Raise the "just fired" flag.
    pub fn register_shot(&mut self) {
        self.recent_fire = RECENT_FIRE_WINDOW;
    }

    /// Run the "just fired" flag down by `dt`.
    pub fn decay_recent_fire(&mut self, dt: f32) {
        self.recent_fire = move_towards(self.recent_fire, 0.0, dt);
    }

    pub fn clear(&mut self) {
        self.recent_fire = 0.0;
    }

    /// Target for the current stance.
    ///
    /// Standing still without aiming settles at hip accuracy, not base:
    /// lowering the sights with feet planted still steadies the weapon.
    pub fn target(&self, aiming: bool, moving: bool) -> f32 {
        let fired = self.just_fired();
        match (aiming, fired, moving) {
            (true, true, _) => self.hip,
            (true, false, true) => self.hip,
            (true, false, false) => self.aim,
            (false, true, _) => self.base,
            (false, false, true) => self.base,
            (false, false, false) => self.hip,
        }
    }

    /// Advance one tick.
    pub fn update(&mut self, dt: f32, aiming: bool, moving: bool) {
        let rate = if self.just_fired() {
            self.decay_shooting
        } else {
            self.decay_walking
        };
        let target = self.target(aiming, moving);
        self.current = move_towards(self.current, target, dt * rate).clamp(self.base, self.aim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(base: f32, hip: f32, aim: f32) -> AccuracyModel {
        let mut p = WeaponProfile::assault_rifle();
        p.base_accuracy = base;
        p.hip_accuracy = hip;
        p.aim_accuracy = aim;
        p.decay_rate_shooting = 2.0;
        p.decay_rate_walking = 0.5;
        AccuracyModel::new(&p)
    }

    #[test]
    fn move_towards_stops_at_target() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(1.0, 0.0, 0.25), 0.75);
    }

    #[test]
    fn accuracy_idle_aiming_rises_monotonically_to_aim() {
        let mut acc = model(0.5, 0.7, 0.9);
        let mut last = acc.current();
        for _ in 0..120 {
            acc.update(1.0 / 60.0, true, false);
            let now = acc.current();
            assert!(now >= last);
            assert!((0.5..=0.9).contains(&now));
            last = now;
        }
        assert!((acc.current() - 0.9).abs() < 1e-5);
    }

    #[test]
    fn accuracy_target_table() {
        let mut acc = model(0.5, 0.7, 0.9);
        assert_eq!(acc.target(true, false), 0.9);
        assert_eq!(acc.target(true, true), 0.7);
        assert_eq!(acc.target(false, true), 0.5);
        // idle hip-fire settles at hip accuracy rather than base
        assert_eq!(acc.target(false, false), 0.7);

        acc.register_shot();
        assert_eq!(acc.target(true, false), 0.7);
        assert_eq!(acc.target(false, false), 0.5);
    }

    #[test]
    fn accuracy_uses_shooting_rate_while_flag_is_up() {
        let mut acc = model(0.5, 0.7, 0.9);
        acc.current = 0.9;
        acc.register_shot();
        acc.update(0.05, false, false);
        // 0.05 s at rate 2.0 toward base
        assert!((acc.current() - 0.8).abs() < 1e-5);

        acc.decay_recent_fire(0.2);
        assert!(!acc.just_fired());
        acc.update(0.1, false, true);
        // 0.1 s at walking rate 0.5 toward base
        assert!((acc.current() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn accuracy_clamped_even_when_hip_exceeds_aim() {
        let mut acc = model(0.5, 0.95, 0.9);
        for _ in 0..600 {
            acc.update(1.0 / 60.0, false, false);
        }
        assert!(acc.current() <= 0.9);
    }
}
