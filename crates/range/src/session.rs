//! Drives one gun through the input script at a fixed tick.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use engine_core::{Time, Transform, Vec3};
use input::InputState;
use weapons::{CharacterState, Gun, WeaponEvent, WeaponProfile};

use crate::config::{RangeConfig, ScriptInput};
use crate::scene::{RangeScene, TargetReport, EYE_HEIGHT};

/// Outcome of one weapon's session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub weapon: String,
    /// Trigger pulls that fired a round.
    pub shots: u32,
    pub pellets_hit: u32,
    pub dry_fires: u32,
    pub reloads: u32,
    pub mode_switches: u32,
    pub melee_hits: u32,
    pub decals: usize,
    pub targets: Vec<TargetReport>,
    pub rounds: u32,
    pub magazines: u32,
}

impl SessionReport {
    fn new(weapon: &str) -> Self {
        Self {
            weapon: weapon.to_owned(),
            shots: 0,
            pellets_hit: 0,
            dry_fires: 0,
            reloads: 0,
            mode_switches: 0,
            melee_hits: 0,
            decals: 0,
            targets: Vec::new(),
            rounds: 0,
            magazines: 0,
        }
    }

    fn record(&mut self, event: &WeaponEvent) {
        match event {
            WeaponEvent::Fired { session } => {
                self.shots += 1;
                self.pellets_hit += session.pellets.iter().filter(|p| !p.hits.is_empty()).count() as u32;
            }
            WeaponEvent::DryFire => self.dry_fires += 1,
            WeaponEvent::ReloadStarted { .. } => self.reloads += 1,
            WeaponEvent::FireModeSwitched { .. } => self.mode_switches += 1,
            WeaponEvent::MeleeHit { .. } => self.melee_hits += 1,
            _ => {}
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ──", self.weapon)?;
        writeln!(
            f,
            "  shots {:>3}   pellets on target {:>3}   dry fires {}",
            self.shots, self.pellets_hit, self.dry_fires
        )?;
        writeln!(
            f,
            "  reloads {}   mode switches {}   melee hits {}   decals {}",
            self.reloads, self.mode_switches, self.melee_hits, self.decals
        )?;
        for target in &self.targets {
            writeln!(
                f,
                "  {:<22} {:>2} hits {:>6.1} damage ({:.0} hp left)",
                target.name, target.hits, target.damage, target.health
            )?;
        }
        write!(f, "  ammo {} / {}", self.rounds, self.magazines)
    }
}

/// Run the script once with `profile` in a fresh scene.
pub fn run(config: &RangeConfig, profile: &WeaponProfile) -> Result<SessionReport> {
    let mut scene = RangeScene::build();
    let mut gun = Gun::new(
        Arc::new(profile.clone()),
        &config.animations,
        config.settings,
        scene.shooter(),
    )
    .with_context(|| format!("Could not build weapon `{}`", profile.name))?
    .with_seed(config.seed);

    let mut time = Time::fixed(config.tick_rate);
    scene.physics.set_timestep(time.step_seconds());

    let script = config.sorted_script();
    let mut pending = script.iter().peekable();
    let mut input = InputState::new();
    let mut camera = Transform::from_position(Vec3::new(0.0, EYE_HEIGHT, 0.0));
    let character = CharacterState::default();
    let mut report = SessionReport::new(&profile.name);

    log::info!("Session start: {}", profile.name);
    gun.select();

    while time.elapsed_seconds() < config.duration {
        let dt = time.tick();
        let now = time.elapsed_seconds();

        input.begin_frame();
        while let Some(entry) = pending.next_if(|s| s.at <= now) {
            match &entry.input {
                ScriptInput::Key { key, state } => input.process_key(&config.bindings, key, *state),
                ScriptInput::Look { yaw, pitch } => camera.set_yaw_pitch(yaw.to_radians(), pitch.to_radians()),
                ScriptInput::Refill => gun.refill(),
            }
        }

        gun.tick(dt, &input.snapshot(), &character, &camera, &mut scene);
        scene.step();

        for event in gun.drain_events() {
            report.record(&event);
            match &event {
                WeaponEvent::Fired { session } => log::debug!(
                    "[{:6.3}] fired {:?}: {} hit(s), {:.1} damage",
                    now,
                    session.mode,
                    session.hits().count(),
                    session.total_damage()
                ),
                other => log::info!("[{:6.3}] {:?}", now, other),
            }
        }
    }

    report.decals = scene.decals().len();
    report.targets = scene.target_reports();
    report.rounds = gun.current_rounds();
    report.magazines = gun.magazines();
    log::info!(
        "Session end: {} after {} ticks",
        profile.name,
        time.frame_count()
    );
    Ok(report)
}
