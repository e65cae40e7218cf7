//! Range configuration (weapons, timings, bindings, input script). Loaded from
//! `range.ron` at startup.

use anyhow::{ensure, Context, Result};
use input::{ButtonState, InputBindings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use weapons::{AnimationTimings, GameplaySettings, WeaponProfile};

/// One timed input of the session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seconds since the session started.
    pub at: f32,
    pub input: ScriptInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptInput {
    /// Raw key event, mapped through the bindings.
    Key { key: String, state: ButtonState },
    /// Point the camera. Degrees; positive yaw turns left, positive pitch looks up.
    Look {
        yaw: f32,
        #[serde(default)]
        pitch: f32,
    },
    /// Ammo pickup.
    Refill,
}

impl ScriptStep {
    pub fn key(at: f32, key: &str, state: ButtonState) -> Self {
        Self {
            at,
            input: ScriptInput::Key {
                key: key.to_owned(),
                state,
            },
        }
    }

    /// Press and release `key`, `hold` seconds apart.
    pub fn tap(at: f32, key: &str, hold: f32) -> [Self; 2] {
        [
            Self::key(at, key, ButtonState::Pressed),
            Self::key(at + hold, key, ButtonState::Released),
        ]
    }

    pub fn look(at: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            at,
            input: ScriptInput::Look { yaw, pitch },
        }
    }
}

/// Everything a range session needs. Every field has a default, so partial
/// files are fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    /// Each weapon runs the script once, in its own fresh scene.
    #[serde(default = "default_weapons")]
    pub weapons: Vec<WeaponProfile>,
    #[serde(default)]
    pub animations: AnimationTimings,
    #[serde(default)]
    pub settings: GameplaySettings,
    #[serde(default)]
    pub bindings: InputBindings,
    /// Weapon ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Session length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Spread RNG seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_script")]
    pub script: Vec<ScriptStep>,
}

fn default_weapons() -> Vec<WeaponProfile> {
    vec![
        WeaponProfile::assault_rifle(),
        WeaponProfile::pump_shotgun(),
        WeaponProfile::burst_carbine(),
    ]
}
fn default_tick_rate() -> f64 {
    60.0
}
fn default_duration() -> f32 {
    12.0
}
fn default_seed() -> u64 {
    7
}

/// Short spray at the plywood, an aimed tap, a steel plate, a reload, a mode
/// switch and a melee swing at nothing.
fn default_script() -> Vec<ScriptStep> {
    let mut script = vec![ScriptStep::look(0.0, 0.0, 0.0)];
    script.extend(ScriptStep::tap(1.0, "Mouse0", 0.6));
    script.push(ScriptStep::key(2.0, "Mouse1", ButtonState::Pressed));
    script.extend(ScriptStep::tap(2.5, "Mouse0", 0.05));
    script.push(ScriptStep::key(3.0, "Mouse1", ButtonState::Released));
    script.push(ScriptStep::look(3.5, -20.56, 0.0));
    script.extend(ScriptStep::tap(4.0, "Mouse0", 0.3));
    script.extend(ScriptStep::tap(5.0, "R", 0.05));
    script.extend(ScriptStep::tap(8.0, "B", 0.05));
    script.push(ScriptStep::look(8.5, 23.2, -8.2));
    script.extend(ScriptStep::tap(9.0, "Mouse0", 0.05));
    script.extend(ScriptStep::tap(10.0, "V", 0.05));
    script
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            weapons: default_weapons(),
            animations: AnimationTimings::default(),
            settings: GameplaySettings::default(),
            bindings: InputBindings::default(),
            tick_rate: default_tick_rate(),
            duration: default_duration(),
            seed: default_seed(),
            script: default_script(),
        }
    }
}

impl RangeConfig {
    /// Load config from `path`. A missing file gives the defaults; an
    /// invalid one logs a warning and gives the defaults.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                log::debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path).with_context(|| format!("Could not read {:?}", path))?;
        let config = Self::parse(&data).with_context(|| format!("Invalid config at {:?}", path))?;
        Ok(Some(config))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Session-level sanity checks. Weapon data is checked when each gun is
    /// built.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tick_rate.is_finite() && self.tick_rate > 0.0,
            "tick_rate must be positive, got {}",
            self.tick_rate
        );
        ensure!(
            self.duration.is_finite() && self.duration >= 0.0,
            "duration must be finite and non-negative, got {}",
            self.duration
        );
        ensure!(
            self.script.iter().all(|step| step.at.is_finite()),
            "script times must be finite"
        );
        Ok(())
    }

    /// Script steps in time order. Steps at the same time keep file order.
    pub fn sorted_script(&self) -> Vec<ScriptStep> {
        let mut script = self.script.clone();
        script.sort_by(|a, b| a.at.total_cmp(&b.at));
        script
    }
}
