//! The weapon state machine.
//!
//! A [`Gun`] owns its ammo, fire mode, accuracy, reload and melee state and
//! advances all of them from a single [`Gun::tick`] per frame. Timed
//! behaviour is kept as absolute deadlines on the gun's own clock; a gate is
//! open once `now` reaches its deadline.

use std::sync::Arc;

use engine_core::Transform;
use input::ActionSnapshot;

use crate::accuracy::AccuracyModel;
use crate::ammo::AmmoState;
use crate::animation::{AnimationSource, AnimationTimings};
use crate::character::CharacterState;
use crate::error::WeaponError;
use crate::events::WeaponEvent;
use crate::fire_mode::{BurstSchedule, FireModeController, FireSlot, TriggerPull};
use crate::melee::{self, MeleeSwing};
use crate::profile::{FireMode, ReloadMode, WeaponProfile};
use crate::reload::ReloadSequencer;
use crate::settings::{AimStyle, GameplaySettings};
use crate::shot::{ShotContext, ShotResolver};
use crate::world::{RootId, ShotWorld};

pub struct Gun {
    profile: Arc<WeaponProfile>,
    timings: AnimationTimings,
    settings: GameplaySettings,
    shooter: RootId,

    ammo: AmmoState,
    stocked: bool,
    fire_mode: FireModeController,
    accuracy: AccuracyModel,
    resolver: ShotResolver,
    reload: ReloadSequencer,
    burst: Option<BurstSchedule>,
    melee: Option<MeleeSwing>,

    now: f32,
    active: bool,
    drawn_at: Option<f32>,
    holstered_at: Option<f32>,
    aiming: bool,
    next_interact_time: f32,
    character: CharacterState,

    events: Vec<WeaponEvent>,
}

impl Gun {
    /// Build a holstered gun. Fails once, here, on bad configuration.
    pub fn new(
        profile: Arc<WeaponProfile>,
        animations: &dyn AnimationSource,
        settings: GameplaySettings,
        shooter: RootId,
    ) -> Result<Self, WeaponError> {
        profile.validate()?;
        let timings = AnimationTimings::capture(animations);
        timings.validate()?;

        Ok(Self {
            ammo: AmmoState::empty(&profile),
            stocked: false,
            fire_mode: FireModeController::new(&profile),
            accuracy: AccuracyModel::new(&profile),
            resolver: ShotResolver::default(),
            reload: ReloadSequencer::new(profile.reload_mode, &timings),
            burst: None,
            melee: None,
            now: 0.0,
            active: false,
            drawn_at: None,
            holstered_at: None,
            aiming: false,
            next_interact_time: 0.0,
            character: CharacterState::default(),
            events: Vec::new(),
            profile,
            timings,
            settings,
            shooter,
        })
    }

    /// Reproducible spread.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.resolver = ShotResolver::with_seed(seed);
        self
    }

    pub fn profile(&self) -> &WeaponProfile {
        &self.profile
    }

    /// Seconds on the gun's clock.
    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn ammo(&self) -> &AmmoState {
        &self.ammo
    }

    pub fn current_rounds(&self) -> u32 {
        self.ammo.current()
    }

    pub fn magazines(&self) -> u32 {
        self.ammo.magazines()
    }

    pub fn fire_mode(&self) -> FireMode {
        self.fire_mode.mode()
    }

    pub fn fire_slot(&self) -> FireSlot {
        self.fire_mode.slot()
    }

    pub fn accuracy(&self) -> f32 {
        self.accuracy.current()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    /// Take the events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<WeaponEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Start drawing the weapon. The first draw stocks an empty gun.
    pub fn select(&mut self) {
        if self.active || self.drawn_at.is_some() {
            return;
        }
        if !self.stocked && self.ammo.is_empty() {
            self.ammo = AmmoState::stocked(&self.profile);
        }
        self.stocked = true;
        self.holstered_at = None;
        self.drawn_at = Some(self.now + self.timings.draw);
        log::debug!("Drawing {}", self.profile.name);
    }

    /// Put the weapon away. `Holstered` is raised once the hide animation
    /// has played.
    pub fn deselect(&mut self) {
        let was_out = self.active || self.drawn_at.is_some();
        self.active = false;
        self.drawn_at = None;
        self.aiming = false;
        self.reload.reset();
        self.burst = None;
        self.melee = None;
        self.accuracy.clear();
        if was_out {
            log::debug!("Hiding {}", self.profile.name);
            self.holstered_at = Some(self.now + self.timings.hide);
        }
    }

    /// Block the weapon while the character interacts with something.
    pub fn interact(&mut self) {
        self.next_interact_time = self.now + self.timings.interact.max(self.timings.interact_delay);
        self.events.push(WeaponEvent::Interacted);
    }

    pub fn refill(&mut self) {
        self.ammo.refill();
    }

    /// Overwrite the counters, clamped to the weapon's limits.
    pub fn set_ammo(&mut self, current: u32, magazines: u32) {
        self.ammo.set(current, magazines);
        self.stocked = true;
    }

    /// Switch fire mode if the gate allows it.
    pub fn switch_mode(&mut self) -> bool {
        if !self.active {
            return false;
        }
        let blocked = self.switch_blocked();
        match self.fire_mode.try_switch(self.now, blocked, self.timings.switch_mode) {
            Some((slot, mode)) => {
                self.events.push(WeaponEvent::FireModeSwitched { slot, mode });
                true
            }
            None => false,
        }
    }

    /// Start a reload if the gate allows it.
    pub fn reload(&mut self) -> bool {
        self.active && self.can_reload() && self.start_reload()
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Reload session running or stop animation still playing.
    pub fn reloading(&self) -> bool {
        self.reload.is_blocking(self.now)
    }

    pub fn firing(&self) -> bool {
        !self.fire_mode.fire_ready(self.now)
    }

    pub fn melee_attacking(&self) -> bool {
        self.melee.is_some()
    }

    pub fn interacting(&self) -> bool {
        self.now < self.next_interact_time
    }

    pub fn idle(&self) -> bool {
        !self.reloading() && !self.firing() && !self.melee_attacking() && !self.interacting()
    }

    /// Hide animation still playing after `deselect`.
    pub fn holstering(&self) -> bool {
        self.holstered_at.is_some()
    }

    fn switching(&self) -> bool {
        !self.fire_mode.switch_ready(self.now)
    }

    fn running(&self) -> bool {
        self.character.is_running()
    }

    /// Whether the weapon can be swapped for another.
    pub fn can_switch(&self) -> bool {
        self.active && !self.switching() && !self.melee_attacking() && !self.interacting() && !self.firing()
    }

    pub fn can_use_items(&self) -> bool {
        self.active
            && !self.aiming
            && !self.reloading()
            && !self.running()
            && !self.firing()
            && !self.switching()
            && !self.melee_attacking()
            && !self.interacting()
    }

    pub fn can_vault(&self) -> bool {
        self.active
            && !self.aiming
            && !self.reloading()
            && !self.firing()
            && !self.switching()
            && !self.melee_attacking()
            && !self.interacting()
    }

    pub fn can_refill(&self) -> bool {
        self.ammo.can_refill()
    }

    pub fn out_of_ammo(&self) -> bool {
        self.ammo.is_empty()
    }

    // ── Tick ───────────────────────────────────────────────────────────

    /// Advance by `dt` seconds and handle this frame's input.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &ActionSnapshot,
        character: &CharacterState,
        camera: &Transform,
        world: &mut dyn ShotWorld,
    ) {
        let dt = dt.max(0.0);
        self.now += dt;
        self.character = *character;

        if let Some(at) = self.holstered_at {
            if self.now >= at {
                self.holstered_at = None;
                log::debug!("Holstered {}", self.profile.name);
                self.events.push(WeaponEvent::Holstered);
            }
        }

        if let Some(at) = self.drawn_at {
            if self.now >= at {
                self.drawn_at = None;
                self.active = true;
                log::info!("{} ready", self.profile.name);
                self.events.push(WeaponEvent::Drawn);
            }
        }

        self.reload.advance(self.now, &mut self.ammo, &mut self.events);
        self.advance_burst(camera, world);
        self.advance_melee(character, camera, world);

        if self.active {
            self.accuracy.decay_recent_fire(dt);
            if character.controllable {
                self.handle_input(input, camera, world);
            }
        }

        self.accuracy.update(dt, self.aiming, character.motion.is_moving());
    }

    fn handle_input(&mut self, input: &ActionSnapshot, camera: &Transform, world: &mut dyn ShotWorld) {
        let now = self.now;

        if self.can_shoot() {
            match self.fire_mode.dispatch(now, input, &self.ammo) {
                TriggerPull::None => {}
                TriggerPull::Reload => {
                    self.start_reload();
                }
                TriggerPull::Shot { pellets } => self.shoot(pellets, camera, world),
                TriggerPull::Burst(schedule) => {
                    self.burst = Some(schedule);
                    self.advance_burst(camera, world);
                }
                TriggerPull::DryFire => {
                    log::debug!("{}: dry fire", self.profile.name);
                    self.events.push(WeaponEvent::DryFire);
                }
            }
        }

        if input.fire_pressed && self.can_cancel_reload() {
            self.reload.cancel(now, &mut self.events);
        }

        let can_aim = !self.reloading() && !self.running() && !self.melee_attacking() && !self.interacting();
        let aiming = if can_aim {
            match self.settings.aim_style {
                AimStyle::Hold => input.aim_held,
                AimStyle::Toggle if input.aim_pressed => !self.aiming,
                AimStyle::Toggle => self.aiming,
            }
        } else {
            false
        };
        if aiming != self.aiming {
            self.aiming = aiming;
            self.events.push(WeaponEvent::AimChanged { aiming });
        }

        if input.reload_pressed && self.can_reload() {
            self.start_reload();
        }

        if input.melee_pressed && self.can_melee() {
            self.melee = Some(MeleeSwing::start(now, &self.timings));
            self.events.push(WeaponEvent::MeleeStarted);
        }

        if input.fire_mode_pressed {
            self.switch_mode();
        }

        if input.interact_pressed && self.can_interact() {
            self.interact();
        }
    }

    // ── Gates ──────────────────────────────────────────────────────────

    fn can_shoot(&self) -> bool {
        !self.reloading()
            && !self.firing()
            && (!self.running() || self.character.sliding)
            && !self.melee_attacking()
            && !self.switching()
            && !self.interacting()
    }

    fn can_cancel_reload(&self) -> bool {
        let floor = u32::from(self.profile.has_chamber);
        self.profile.reload_mode == ReloadMode::BulletByBullet
            && self.reload.is_active()
            && self.reload.cooldown_ready(self.now)
            && self.ammo.current() > floor
    }

    fn can_reload(&self) -> bool {
        !self.reloading()
            && !self.ammo.is_full()
            && self.ammo.magazines() > 0
            && !self.melee_attacking()
            && !self.switching()
            && !self.interacting()
            && !self.firing()
    }

    fn can_melee(&self) -> bool {
        !self.melee_attacking()
            && !self.reloading()
            && !self.running()
            && !self.aiming
            && !self.firing()
            && self.timings.can_melee()
            && !self.switching()
            && !self.interacting()
    }

    fn can_interact(&self) -> bool {
        self.idle() && !self.switching()
    }

    fn switch_blocked(&self) -> bool {
        self.melee_attacking() || self.reloading() || self.running() || self.interacting()
    }

    // ── Actions ────────────────────────────────────────────────────────

    fn start_reload(&mut self) -> bool {
        self.reload.start(self.now, &self.ammo, &mut self.events)
    }

    fn shoot(&mut self, pellets: u32, camera: &Transform, world: &mut dyn ShotWorld) {
        if self.ammo.consume(1) == 0 {
            return;
        }
        let ctx = ShotContext {
            profile: &self.profile,
            mode: self.fire_mode.mode(),
            accuracy: self.accuracy.current(),
            camera,
            shooter: self.shooter,
            pellets,
        };
        let session = self.resolver.fire(&ctx, world);
        self.accuracy.register_shot();
        log::debug!(
            "{} fired: {} pellet(s), {} left",
            self.profile.name,
            session.pellets.len(),
            self.ammo.current()
        );
        self.events.push(WeaponEvent::Fired { session });
    }

    fn advance_burst(&mut self, camera: &Transform, world: &mut dyn ShotWorld) {
        let Some(mut burst) = self.burst.take() else {
            return;
        };
        while burst.is_due(self.now) && self.ammo.can_fire() {
            self.shoot(1, camera, world);
            burst.record_shot();
        }
        if burst.is_done() || !self.ammo.can_fire() {
            self.events.push(WeaponEvent::BurstFinished { shots: burst.fired() });
        } else {
            self.burst = Some(burst);
        }
    }

    fn advance_melee(&mut self, character: &CharacterState, camera: &Transform, world: &mut dyn ShotWorld) {
        let Some(mut swing) = self.melee.take() else {
            return;
        };
        let progress = swing.advance(self.now);
        if progress.strike {
            if let Some(point) = melee::strike(&self.profile, camera, character.radius, self.shooter, world) {
                self.events.push(WeaponEvent::MeleeHit { point });
            }
        }
        if !progress.finished {
            self.melee = Some(swing);
        }
    }
}
