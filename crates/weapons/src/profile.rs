//! Immutable weapon configuration.

use serde::{Deserialize, Serialize};

use crate::curve::FalloffCurve;
use crate::error::WeaponError;
use crate::world::LayerMask;

/// Trigger-response behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireMode {
    /// One round per press.
    Single,
    /// Fires while held.
    FullAuto,
    /// A fixed number of rounds per press.
    Burst,
    /// One shell (several pellets) per press.
    ShotgunSingle,
    /// Shells while held.
    ShotgunAuto,
}

impl FireMode {
    /// Automatic modes fire on "held"; the rest need a fresh press.
    pub fn is_automatic(self) -> bool {
        matches!(self, FireMode::FullAuto | FireMode::ShotgunAuto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageMode {
    Constant,
    /// `damage * falloff(distance / range)`.
    DecreaseByDistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadMode {
    /// Whole magazine swap.
    Magazines,
    /// One round at a time, cancellable.
    BulletByBullet,
}

/// Authoring-time weapon data, shared read-only by every instance of the
/// weapon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    pub name: String,
    /// kg
    pub weight: f32,
    /// Length of the weapon in metres; drives melee reach.
    pub size: f32,
    pub melee_damage: f32,
    pub melee_force: f32,

    pub primary_fire_mode: FireMode,
    pub secondary_fire_mode: Option<FireMode>,
    /// Seconds between shots.
    pub primary_rate_of_fire: f32,
    pub secondary_rate_of_fire: f32,
    /// Impulse magnitude applied to rigid bodies that are hit.
    pub force: f32,
    pub range: f32,
    /// Pellets per shell in shotgun modes.
    pub bullets_per_shot: u32,
    pub bullets_per_burst: u32,
    pub affected_layers: LayerMask,

    pub damage_mode: DamageMode,
    pub damage: f32,
    pub damage_falloff: FalloffCurve,

    pub penetrate_objects: bool,
    pub penetration_power: f32,

    pub reload_mode: ReloadMode,
    pub rounds_per_magazine: u32,
    pub has_chamber: bool,
    pub initial_magazines: u32,
    pub max_magazines: u32,

    /// Spread cone scale at zero accuracy.
    pub maximum_spread: f32,
    pub base_accuracy: f32,
    pub hip_accuracy: f32,
    pub aim_accuracy: f32,
    pub decay_rate_shooting: f32,
    pub decay_rate_walking: f32,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::assault_rifle()
    }
}

impl WeaponProfile {
    /// Automatic rifle with a single-fire secondary mode.
    pub fn assault_rifle() -> Self {
        Self {
            name: "Assault Rifle".into(),
            weight: 3.4,
            size: 0.9,
            melee_damage: 35.0,
            melee_force: 6.0,
            primary_fire_mode: FireMode::FullAuto,
            secondary_fire_mode: Some(FireMode::Single),
            primary_rate_of_fire: 0.1,
            secondary_rate_of_fire: 0.15,
            force: 8.0,
            range: 300.0,
            bullets_per_shot: 1,
            bullets_per_burst: 3,
            affected_layers: LayerMask::ALL,
            damage_mode: DamageMode::DecreaseByDistance,
            damage: 32.0,
            damage_falloff: FalloffCurve::new(vec![(0.0, 1.0), (0.3, 1.0), (1.0, 0.45)]),
            penetrate_objects: true,
            penetration_power: 10.0,
            reload_mode: ReloadMode::Magazines,
            rounds_per_magazine: 30,
            has_chamber: true,
            initial_magazines: 3,
            max_magazines: 6,
            maximum_spread: 2.0,
            base_accuracy: 0.75,
            hip_accuracy: 0.85,
            aim_accuracy: 0.97,
            decay_rate_shooting: 1.2,
            decay_rate_walking: 0.6,
        }
    }

    /// Pump shotgun loaded shell by shell.
    pub fn pump_shotgun() -> Self {
        Self {
            name: "Pump Shotgun".into(),
            weight: 3.6,
            size: 1.05,
            melee_damage: 40.0,
            melee_force: 8.0,
            primary_fire_mode: FireMode::ShotgunSingle,
            secondary_fire_mode: None,
            primary_rate_of_fire: 0.9,
            secondary_rate_of_fire: 0.9,
            force: 4.0,
            range: 60.0,
            bullets_per_shot: 8,
            bullets_per_burst: 1,
            affected_layers: LayerMask::ALL,
            damage_mode: DamageMode::DecreaseByDistance,
            damage: 14.0,
            damage_falloff: FalloffCurve::new(vec![(0.0, 1.0), (0.15, 1.0), (0.6, 0.2), (1.0, 0.05)]),
            penetrate_objects: false,
            penetration_power: 0.0,
            reload_mode: ReloadMode::BulletByBullet,
            rounds_per_magazine: 7,
            has_chamber: true,
            initial_magazines: 4,
            max_magazines: 6,
            maximum_spread: 8.0,
            base_accuracy: 0.55,
            hip_accuracy: 0.6,
            aim_accuracy: 0.7,
            decay_rate_shooting: 0.8,
            decay_rate_walking: 0.4,
        }
    }

    /// Three-round burst carbine with a semi-automatic secondary mode.
    pub fn burst_carbine() -> Self {
        Self {
            name: "Burst Carbine".into(),
            weight: 2.9,
            size: 0.75,
            melee_damage: 30.0,
            melee_force: 5.0,
            primary_fire_mode: FireMode::Burst,
            secondary_fire_mode: Some(FireMode::Single),
            primary_rate_of_fire: 0.07,
            secondary_rate_of_fire: 0.2,
            force: 6.0,
            range: 200.0,
            bullets_per_shot: 1,
            bullets_per_burst: 3,
            affected_layers: LayerMask::ALL,
            damage_mode: DamageMode::Constant,
            damage: 28.0,
            damage_falloff: FalloffCurve::constant(1.0),
            penetrate_objects: true,
            penetration_power: 6.0,
            reload_mode: ReloadMode::Magazines,
            rounds_per_magazine: 24,
            has_chamber: false,
            initial_magazines: 3,
            max_magazines: 5,
            maximum_spread: 1.6,
            base_accuracy: 0.8,
            hip_accuracy: 0.88,
            aim_accuracy: 0.98,
            decay_rate_shooting: 1.5,
            decay_rate_walking: 0.7,
        }
    }

    /// Rounds the gun can hold: a full magazine plus the chambered round.
    pub fn capacity(&self) -> u32 {
        if self.has_chamber {
            self.rounds_per_magazine + 1
        } else {
            self.rounds_per_magazine
        }
    }

    /// Upper bound on spare rounds.
    pub fn max_reserve(&self) -> u32 {
        self.max_magazines.saturating_mul(self.capacity())
    }

    /// Spare rounds stocked the first time the weapon is selected.
    pub fn initial_reserve(&self) -> u32 {
        self.rounds_per_magazine.saturating_mul(self.initial_magazines)
    }

    pub fn has_secondary_mode(&self) -> bool {
        self.secondary_fire_mode.is_some()
    }

    /// Damage delivered by a bullet that travelled `distance`.
    pub fn damage_at(&self, distance: f32) -> f32 {
        match self.damage_mode {
            DamageMode::Constant => self.damage,
            DamageMode::DecreaseByDistance => {
                let t = if self.range > 0.0 { distance / self.range } else { 0.0 };
                self.damage * self.damage_falloff.evaluate(t)
            }
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), WeaponError> {
        let name = self.name.as_str();
        let finite = [
            ("weight", self.weight),
            ("size", self.size),
            ("melee_damage", self.melee_damage),
            ("melee_force", self.melee_force),
            ("force", self.force),
            ("damage", self.damage),
            ("penetration_power", self.penetration_power),
            ("maximum_spread", self.maximum_spread),
            ("decay_rate_shooting", self.decay_rate_shooting),
            ("decay_rate_walking", self.decay_rate_walking),
        ];
        for (field, value) in finite {
            if !value.is_finite() || value < 0.0 {
                return Err(WeaponError::profile(name, field, "must be finite and non-negative"));
            }
        }

        if !(self.primary_rate_of_fire.is_finite() && self.primary_rate_of_fire > 0.0) {
            return Err(WeaponError::profile(name, "primary_rate_of_fire", "must be positive"));
        }
        if self.secondary_fire_mode.is_some()
            && !(self.secondary_rate_of_fire.is_finite() && self.secondary_rate_of_fire > 0.0)
        {
            return Err(WeaponError::profile(name, "secondary_rate_of_fire", "must be positive"));
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(WeaponError::profile(name, "range", "must be positive"));
        }
        if self.rounds_per_magazine == 0 {
            return Err(WeaponError::profile(name, "rounds_per_magazine", "must be at least 1"));
        }
        if self.bullets_per_shot == 0 {
            return Err(WeaponError::profile(name, "bullets_per_shot", "must be at least 1"));
        }
        if self.bullets_per_burst == 0 {
            return Err(WeaponError::profile(name, "bullets_per_burst", "must be at least 1"));
        }
        if self.initial_magazines > self.max_magazines {
            return Err(WeaponError::profile(name, "initial_magazines", "exceeds max_magazines"));
        }

        for (field, value) in [
            ("base_accuracy", self.base_accuracy),
            ("hip_accuracy", self.hip_accuracy),
            ("aim_accuracy", self.aim_accuracy),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WeaponError::profile(name, field, "must lie in [0, 1]"));
            }
        }
        if self.base_accuracy > self.aim_accuracy {
            return Err(WeaponError::profile(name, "base_accuracy", "exceeds aim_accuracy"));
        }

        if self.damage_mode == DamageMode::DecreaseByDistance && self.damage_falloff.is_empty() {
            return Err(WeaponError::profile(name, "damage_falloff", "needs at least one key"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_capacity_counts_chamber() {
        let mut p = WeaponProfile::assault_rifle();
        assert_eq!(p.capacity(), 31);
        p.has_chamber = false;
        assert_eq!(p.capacity(), 30);
        assert_eq!(p.max_reserve(), 6 * 30);
    }

    #[test]
    fn profile_presets_validate() {
        WeaponProfile::assault_rifle().validate().unwrap();
        WeaponProfile::pump_shotgun().validate().unwrap();
        WeaponProfile::burst_carbine().validate().unwrap();
    }

    #[test]
    fn profile_rejects_inverted_accuracy() {
        let mut p = WeaponProfile::assault_rifle();
        p.base_accuracy = 0.99;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, WeaponError::InvalidProfile { field: "base_accuracy", .. }));
    }

    #[test]
    fn profile_rejects_zero_rate_of_fire() {
        let mut p = WeaponProfile::burst_carbine();
        p.primary_rate_of_fire = 0.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn profile_damage_falloff_by_distance() {
        let p = WeaponProfile::assault_rifle();
        assert_eq!(p.damage_at(10.0), 32.0);
        assert!((p.damage_at(p.range) - 32.0 * 0.45).abs() < 1e-4);

        let constant = WeaponProfile::burst_carbine();
        assert_eq!(constant.damage_at(constant.range), constant.damage);
    }

    #[test]
    fn profile_falloff_from_ron_uses_sorted_keys() {
        let text = r#"(
            damage: 40.0,
            range: 40.0,
            damage_mode: DecreaseByDistance,
            damage_falloff: (keys: [(1.0, 0.25), (0.0, 1.0)]),
        )"#;
        let p: WeaponProfile = ron::from_str(text).unwrap();
        assert!((p.damage_at(10.0) - 32.5).abs() < 1e-4);
        assert!((p.damage_at(40.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn profile_deserializes_partial_ron() {
        let text = r#"(name: "Test", rounds_per_magazine: 12, secondary_fire_mode: None)"#;
        let p: WeaponProfile = ron::from_str(text).unwrap();
        assert_eq!(p.name, "Test");
        assert_eq!(p.rounds_per_magazine, 12);
        assert!(!p.has_secondary_mode());
        // untouched fields come from the default profile
        assert_eq!(p.primary_fire_mode, FireMode::FullAuto);
    }
}
