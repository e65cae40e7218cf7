//! Timed reload state machine.
//!
//! Magazine reloads are a single swap phase. Bullet-by-bullet reloads walk
//! `StartReload` (or a two-half `InsertChamber` from empty), then loop two
//! halves of `InsertRound` per shell, and finish with a stop animation that
//! keeps the gun busy through `next_reload_time`. Phase deadlines are chained
//! from the previous deadline, so a long tick catches up on every phase it
//! skipped.

use crate::ammo::AmmoState;
use crate::animation::AnimationTimings;
use crate::events::WeaponEvent;
use crate::profile::ReloadMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    /// Magazine swap with rounds still loaded.
    Tactical,
    /// Magazine swap from empty.
    Full,
    BulletByBullet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPhase {
    Swap { full: bool },
    StartReload,
    /// `seated` flips at the half-way point, when the round goes in.
    InsertChamber { seated: bool },
    InsertRound { seated: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ReloadDurations {
    reload: f32,
    full_reload: f32,
    start_reload: f32,
    chamber_half: f32,
    insert_half: f32,
    stop_reload: f32,
}

impl From<&AnimationTimings> for ReloadDurations {
    fn from(t: &AnimationTimings) -> Self {
        Self {
            reload: t.reload,
            full_reload: t.full_reload,
            start_reload: t.start_reload,
            chamber_half: t.insert_in_chamber / 2.0,
            insert_half: t.insert / 2.0,
            stop_reload: t.stop_reload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReloadSession {
    pub phase: ReloadPhase,
    /// Absolute time the current phase ends.
    pub phase_ends_at: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReloadSequencer {
    mode: ReloadMode,
    durations: ReloadDurations,
    session: Option<ReloadSession>,
    next_reload_time: f32,
}

impl ReloadSequencer {
    pub fn new(mode: ReloadMode, timings: &AnimationTimings) -> Self {
        Self {
            mode,
            durations: timings.into(),
            session: None,
            next_reload_time: 0.0,
        }
    }

    pub fn mode(&self) -> ReloadMode {
        self.mode
    }

    pub fn session(&self) -> Option<&ReloadSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<ReloadPhase> {
        self.session.map(|s| s.phase)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The stop animation has finished.
    pub fn cooldown_ready(&self, now: f32) -> bool {
        now >= self.next_reload_time
    }

    /// Active session or stop animation still playing.
    pub fn is_blocking(&self, now: f32) -> bool {
        self.is_active() || !self.cooldown_ready(now)
    }

    /// Begin a reload. Returns false if one is already running.
    pub fn start(&mut self, now: f32, ammo: &AmmoState, events: &mut Vec<WeaponEvent>) -> bool {
        if self.session.is_some() {
            return false;
        }

        let (phase, length, kind) = match self.mode {
            ReloadMode::Magazines => {
                let full = ammo.current() == 0;
                let length = if full {
                    self.durations.full_reload
                } else {
                    self.durations.reload
                };
                let kind = if full { ReloadKind::Full } else { ReloadKind::Tactical };
                (ReloadPhase::Swap { full }, length, kind)
            }
            ReloadMode::BulletByBullet if ammo.current() == 0 => (
                ReloadPhase::InsertChamber { seated: false },
                self.durations.chamber_half,
                ReloadKind::BulletByBullet,
            ),
            ReloadMode::BulletByBullet => (
                ReloadPhase::StartReload,
                self.durations.start_reload,
                ReloadKind::BulletByBullet,
            ),
        };

        self.session = Some(ReloadSession {
            phase,
            phase_ends_at: now + length,
        });
        log::debug!("Reload started: {:?}", kind);
        events.push(WeaponEvent::ReloadStarted { kind });
        true
    }

    /// Run every phase whose deadline has passed.
    pub fn advance(&mut self, now: f32, ammo: &mut AmmoState, events: &mut Vec<WeaponEvent>) {
        while let Some(mut session) = self.session {
            if now < session.phase_ends_at {
                return;
            }
            let deadline = session.phase_ends_at;

            match session.phase {
                ReloadPhase::Swap { .. } => {
                    let moved = ammo.transfer_to_full();
                    self.session = None;
                    log::info!("Reload complete: moved {} rounds, {} spare", moved, ammo.magazines());
                    events.push(WeaponEvent::ReloadCompleted { moved });
                    continue;
                }
                ReloadPhase::InsertChamber { seated: false } => {
                    ammo.transfer(1);
                    events.push(WeaponEvent::RoundChambered);
                    session.phase = ReloadPhase::InsertChamber { seated: true };
                    session.phase_ends_at = deadline + self.durations.chamber_half;
                }
                ReloadPhase::InsertRound { seated: false } => {
                    ammo.transfer(1);
                    events.push(WeaponEvent::RoundInserted);
                    session.phase = ReloadPhase::InsertRound { seated: true };
                    session.phase_ends_at = deadline + self.durations.insert_half;
                }
                ReloadPhase::StartReload
                | ReloadPhase::InsertChamber { seated: true }
                | ReloadPhase::InsertRound { seated: true } => {
                    if ammo.is_full() || ammo.magazines() == 0 {
                        self.stop(deadline, false, events);
                        continue;
                    }
                    session.phase = ReloadPhase::InsertRound { seated: false };
                    session.phase_ends_at = deadline + self.durations.insert_half;
                }
            }
            self.session = Some(session);
        }
    }

    /// Interrupt a bullet-by-bullet loop. A round that was not yet seated is
    /// not added.
    pub fn cancel(&mut self, now: f32, events: &mut Vec<WeaponEvent>) -> bool {
        if self.mode != ReloadMode::BulletByBullet || self.session.is_none() {
            return false;
        }
        self.stop(now, true, events);
        true
    }

    /// Drop everything, e.g. on holster.
    pub fn reset(&mut self) {
        self.session = None;
        self.next_reload_time = 0.0;
    }

    fn stop(&mut self, at: f32, cancelled: bool, events: &mut Vec<WeaponEvent>) {
        self.session = None;
        self.next_reload_time = at + self.durations.stop_reload;
        log::info!("Reload stopped (cancelled: {})", cancelled);
        events.push(WeaponEvent::ReloadStopped { cancelled });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::WeaponProfile;

    fn timings() -> AnimationTimings {
        AnimationTimings {
            reload: 2.0,
            full_reload: 3.0,
            start_reload: 0.5,
            insert_in_chamber: 1.0,
            insert: 0.5,
            stop_reload: 0.5,
            ..Default::default()
        }
    }

    fn rifle_ammo(current: u32, magazines: u32) -> AmmoState {
        let mut ammo = AmmoState::empty(&WeaponProfile::assault_rifle());
        ammo.set(current, magazines);
        ammo
    }

    fn shotgun_ammo(current: u32, magazines: u32) -> AmmoState {
        let mut ammo = AmmoState::empty(&WeaponProfile::pump_shotgun());
        ammo.set(current, magazines);
        ammo
    }

    #[test]
    fn reload_tactical_uses_short_duration() {
        let mut seq = ReloadSequencer::new(ReloadMode::Magazines, &timings());
        let mut ammo = rifle_ammo(10, 90);
        let mut events = Vec::new();
        assert!(seq.start(0.0, &ammo, &mut events));
        assert_eq!(events, vec![WeaponEvent::ReloadStarted { kind: ReloadKind::Tactical }]);

        seq.advance(1.9, &mut ammo, &mut events);
        assert!(seq.is_active());
        assert_eq!(ammo.current(), 10);

        seq.advance(2.0, &mut ammo, &mut events);
        assert!(!seq.is_active());
        assert_eq!(ammo.current(), 31);
        assert_eq!(ammo.magazines(), 69);
        assert_eq!(events.last(), Some(&WeaponEvent::ReloadCompleted { moved: 21 }));
    }

    #[test]
    fn reload_full_from_empty_uses_long_duration() {
        let mut seq = ReloadSequencer::new(ReloadMode::Magazines, &timings());
        let mut ammo = rifle_ammo(0, 90);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        assert_eq!(seq.phase(), Some(ReloadPhase::Swap { full: true }));
        seq.advance(2.5, &mut ammo, &mut events);
        assert_eq!(ammo.current(), 0);
        seq.advance(3.0, &mut ammo, &mut events);
        assert_eq!(ammo.current(), 31);
    }

    #[test]
    fn reload_conserves_rounds() {
        for (current, magazines) in [(0, 90), (5, 3), (30, 1), (0, 0), (12, 200)] {
            let mut seq = ReloadSequencer::new(ReloadMode::Magazines, &timings());
            let mut ammo = rifle_ammo(current, magazines);
            let before = ammo.current() + ammo.magazines();
            let mut events = Vec::new();
            seq.start(0.0, &ammo, &mut events);
            seq.advance(10.0, &mut ammo, &mut events);
            assert_eq!(ammo.current() + ammo.magazines(), before);
            assert!(ammo.current() <= ammo.capacity());
        }
    }

    #[test]
    fn reload_second_start_is_rejected() {
        let mut seq = ReloadSequencer::new(ReloadMode::Magazines, &timings());
        let ammo = rifle_ammo(10, 90);
        let mut events = Vec::new();
        assert!(seq.start(0.0, &ammo, &mut events));
        assert!(!seq.start(0.5, &ammo, &mut events));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn reload_magazine_cannot_be_cancelled() {
        let mut seq = ReloadSequencer::new(ReloadMode::Magazines, &timings());
        let ammo = rifle_ammo(10, 90);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        assert!(!seq.cancel(1.0, &mut events));
        assert!(seq.is_active());
    }

    #[test]
    fn reload_bullet_by_bullet_inserts_one_round_per_cycle() {
        let mut seq = ReloadSequencer::new(ReloadMode::BulletByBullet, &timings());
        // capacity 8
        let mut ammo = shotgun_ammo(6, 10);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        assert_eq!(seq.phase(), Some(ReloadPhase::StartReload));

        seq.advance(0.5, &mut ammo, &mut events);
        assert_eq!(seq.phase(), Some(ReloadPhase::InsertRound { seated: false }));
        seq.advance(0.75, &mut ammo, &mut events);
        assert_eq!(ammo.current(), 7);
        seq.advance(1.0, &mut ammo, &mut events);
        seq.advance(1.25, &mut ammo, &mut events);
        assert_eq!(ammo.current(), 8);

        // full: the next cycle boundary stops the loop
        seq.advance(1.5, &mut ammo, &mut events);
        assert!(!seq.is_active());
        assert!(seq.is_blocking(1.9));
        assert!(!seq.is_blocking(2.0));
        assert_eq!(ammo.magazines(), 8);
        assert_eq!(events.last(), Some(&WeaponEvent::ReloadStopped { cancelled: false }));
    }

    #[test]
    fn reload_bullet_by_bullet_from_empty_chambers_first() {
        let mut seq = ReloadSequencer::new(ReloadMode::BulletByBullet, &timings());
        let mut ammo = shotgun_ammo(0, 10);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        assert_eq!(seq.phase(), Some(ReloadPhase::InsertChamber { seated: false }));

        seq.advance(0.5, &mut ammo, &mut events);
        assert_eq!(ammo.current(), 1);
        assert_eq!(events.last(), Some(&WeaponEvent::RoundChambered));
        assert_eq!(seq.phase(), Some(ReloadPhase::InsertChamber { seated: true }));

        seq.advance(1.0, &mut ammo, &mut events);
        assert_eq!(seq.phase(), Some(ReloadPhase::InsertRound { seated: false }));
    }

    #[test]
    fn reload_bullet_by_bullet_stops_when_spares_run_out() {
        let mut seq = ReloadSequencer::new(ReloadMode::BulletByBullet, &timings());
        let mut ammo = shotgun_ammo(2, 2);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        seq.advance(100.0, &mut ammo, &mut events);
        assert!(!seq.is_active());
        assert_eq!(ammo.current(), 4);
        assert_eq!(ammo.magazines(), 0);
        let inserted = events
            .iter()
            .filter(|e| **e == WeaponEvent::RoundInserted)
            .count();
        assert_eq!(inserted, 2);
    }

    #[test]
    fn reload_catch_up_matches_small_steps() {
        let mut a = ReloadSequencer::new(ReloadMode::BulletByBullet, &timings());
        let mut b = a.clone();
        let mut ammo_a = shotgun_ammo(1, 20);
        let mut ammo_b = ammo_a;
        let mut events = Vec::new();
        a.start(0.0, &ammo_a, &mut events);
        b.start(0.0, &ammo_b, &mut events);

        a.advance(2.3, &mut ammo_a, &mut events);
        let mut t: f32 = 0.0;
        while t < 2.3 {
            t += 0.01;
            b.advance(t.min(2.3), &mut ammo_b, &mut events);
        }
        assert_eq!(ammo_a, ammo_b);
        assert_eq!(a.phase(), b.phase());
    }

    #[test]
    fn reload_cancel_drops_unseated_round() {
        let mut seq = ReloadSequencer::new(ReloadMode::BulletByBullet, &timings());
        let mut ammo = shotgun_ammo(3, 10);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        seq.advance(0.6, &mut ammo, &mut events);
        assert_eq!(seq.phase(), Some(ReloadPhase::InsertRound { seated: false }));

        assert!(seq.cancel(0.6, &mut events));
        seq.advance(5.0, &mut ammo, &mut events);
        assert_eq!(ammo.current(), 3);
        assert_eq!(ammo.magazines(), 10);
        assert!(seq.is_blocking(1.0));
        assert!(!seq.is_blocking(1.2));
        assert_eq!(events.last(), Some(&WeaponEvent::ReloadStopped { cancelled: true }));
    }

    #[test]
    fn reload_reset_clears_cooldown() {
        let mut seq = ReloadSequencer::new(ReloadMode::BulletByBullet, &timings());
        let ammo = shotgun_ammo(3, 10);
        let mut events = Vec::new();
        seq.start(0.0, &ammo, &mut events);
        seq.cancel(0.1, &mut events);
        assert!(seq.is_blocking(0.2));
        seq.reset();
        assert!(!seq.is_blocking(0.2));
    }
}
