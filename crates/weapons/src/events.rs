//! Notifications the gun raises for the host (viewmodel, audio, HUD).

use glam::Vec3;

use crate::fire_mode::FireSlot;
use crate::profile::FireMode;
use crate::reload::ReloadKind;
use crate::shot::FireSession;

#[derive(Debug, Clone, PartialEq)]
pub enum WeaponEvent {
    /// Draw animation finished; the gun accepts input.
    Drawn,
    Holstered,
    /// A round left the barrel.
    Fired { session: FireSession },
    /// Trigger pulled on an empty gun with no spare rounds.
    DryFire,
    BurstFinished { shots: u32 },
    ReloadStarted { kind: ReloadKind },
    /// Bullet-by-bullet reload from empty seated its first round.
    RoundChambered,
    RoundInserted,
    /// Magazine swap done.
    ReloadCompleted { moved: u32 },
    /// Bullet-by-bullet loop ended, by itself or cancelled by the trigger.
    ReloadStopped { cancelled: bool },
    FireModeSwitched { slot: FireSlot, mode: FireMode },
    AimChanged { aiming: bool },
    MeleeStarted,
    MeleeHit { point: Vec3 },
    Interacted,
}
