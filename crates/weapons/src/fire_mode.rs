//! Fire mode selection and trigger dispatch.

use input::ActionSnapshot;

use crate::ammo::AmmoState;
use crate::profile::{FireMode, WeaponProfile};

/// Lockout after pulling the trigger on an empty gun.
pub const DRY_FIRE_LOCKOUT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireSlot {
    Primary,
    Secondary,
}

/// What an accepted trigger pull turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerPull {
    /// Trigger not engaged for the current mode.
    None,
    /// Empty gun with spare rounds: reload instead of firing.
    Reload,
    /// One round; `pellets` rays.
    Shot { pellets: u32 },
    /// Start a burst; the first shot is due immediately.
    Burst(BurstSchedule),
    DryFire,
}

/// Remaining shots of a burst in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstSchedule {
    remaining: u32,
    next_shot_at: f32,
    interval: f32,
    fired: u32,
}

impl BurstSchedule {
    pub fn new(count: u32, start: f32, interval: f32) -> Self {
        Self {
            remaining: count,
            next_shot_at: start,
            interval,
            fired: 0,
        }
    }

    pub fn is_due(&self, now: f32) -> bool {
        self.remaining > 0 && now >= self.next_shot_at
    }

    pub fn record_shot(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        self.fired += 1;
        self.next_shot_at += self.interval;
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    pub fn fired(&self) -> u32 {
        self.fired
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireModeController {
    slot: FireSlot,
    mode: FireMode,
    interval: f32,
    primary: (FireMode, f32),
    secondary: Option<(FireMode, f32)>,
    burst_size: u32,
    pellets: u32,
    next_fire_time: f32,
    next_switch_time: f32,
}

impl FireModeController {
    pub fn new(profile: &WeaponProfile) -> Self {
        let primary = (profile.primary_fire_mode, profile.primary_rate_of_fire);
        Self {
            slot: FireSlot::Primary,
            mode: primary.0,
            interval: primary.1,
            primary,
            secondary: profile
                .secondary_fire_mode
                .map(|mode| (mode, profile.secondary_rate_of_fire)),
            burst_size: profile.bullets_per_burst,
            pellets: profile.bullets_per_shot,
            next_fire_time: 0.0,
            next_switch_time: 0.0,
        }
    }

    pub fn slot(&self) -> FireSlot {
        self.slot
    }

    pub fn mode(&self) -> FireMode {
        self.mode
    }

    /// Seconds between shots in the current mode.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    pub fn fire_ready(&self, now: f32) -> bool {
        now >= self.next_fire_time
    }

    pub fn switch_ready(&self, now: f32) -> bool {
        now >= self.next_switch_time
    }

    /// Whether the trigger counts as pulled this tick: held for automatic
    /// modes, a fresh press for everything else.
    pub fn trigger_engaged(&self, input: &ActionSnapshot) -> bool {
        if self.mode.is_automatic() {
            input.fire_held
        } else {
            input.fire_pressed
        }
    }

    /// Turn an engaged trigger into an action and arm the fire cooldown.
    /// The caller has already checked that firing is allowed.
    pub fn dispatch(&mut self, now: f32, input: &ActionSnapshot, ammo: &AmmoState) -> TriggerPull {
        if !self.trigger_engaged(input) {
            return TriggerPull::None;
        }
        if ammo.current() == 0 && ammo.magazines() > 0 {
            return TriggerPull::Reload;
        }
        if !ammo.can_fire() {
            self.next_fire_time = now + DRY_FIRE_LOCKOUT;
            return TriggerPull::DryFire;
        }

        match self.mode {
            FireMode::Single | FireMode::FullAuto => {
                self.next_fire_time = now + self.interval;
                TriggerPull::Shot { pellets: 1 }
            }
            FireMode::ShotgunSingle | FireMode::ShotgunAuto => {
                self.next_fire_time = now + self.interval;
                TriggerPull::Shot {
                    pellets: self.pellets,
                }
            }
            FireMode::Burst => {
                self.next_fire_time = now + self.interval * (self.burst_size + 1) as f32;
                TriggerPull::Burst(BurstSchedule::new(self.burst_size, now, self.interval))
            }
        }
    }

    /// Flip between the primary and secondary mode. Returns the new slot and
    /// mode, or `None` when `blocked`, mid-switch, or there is no secondary.
    pub fn try_switch(&mut self, now: f32, blocked: bool, switch_length: f32) -> Option<(FireSlot, FireMode)> {
        if blocked || !self.switch_ready(now) {
            return None;
        }
        let secondary = self.secondary?;

        let (slot, (mode, interval)) = match self.slot {
            FireSlot::Primary => (FireSlot::Secondary, secondary),
            FireSlot::Secondary => (FireSlot::Primary, self.primary),
        };
        self.slot = slot;
        self.mode = mode;
        self.interval = interval;
        self.next_switch_time = now + switch_length;
        log::info!("Fire mode switched to {:?} ({:?})", mode, slot);
        Some((slot, mode))
    }
}
