//! Round bookkeeping for one weapon instance.
//!
//! Requests outside the valid range are clamped, never rejected: consuming
//! more rounds than loaded empties the gun, a reload moves only what both
//! the free capacity and the spare rounds allow.

use crate::profile::WeaponProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoState {
    current: u32,
    magazines: u32,
    capacity: u32,
    max_reserve: u32,
}

impl AmmoState {
    /// Empty gun with the limits of `profile`.
    pub fn empty(profile: &WeaponProfile) -> Self {
        Self {
            current: 0,
            magazines: 0,
            capacity: profile.capacity(),
            max_reserve: profile.max_reserve(),
        }
    }

    /// Loaded gun with the profile's starting spare rounds.
    pub fn stocked(profile: &WeaponProfile) -> Self {
        let mut ammo = Self::empty(profile);
        ammo.set(profile.capacity(), profile.initial_reserve());
        ammo
    }

    /// Rounds in the gun, chamber included.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Spare rounds available for reloading.
    pub fn magazines(&self) -> u32 {
        self.magazines
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn max_reserve(&self) -> u32 {
        self.max_reserve
    }

    pub fn can_fire(&self) -> bool {
        self.current > 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0 && self.magazines == 0
    }

    /// Either counter is below its maximum.
    pub fn can_refill(&self) -> bool {
        self.current < self.capacity || self.magazines < self.max_reserve
    }

    /// Remove up to `n` loaded rounds; returns how many were removed.
    pub fn consume(&mut self, n: u32) -> u32 {
        let taken = n.min(self.current);
        self.current -= taken;
        taken
    }

    /// Move up to `request` spare rounds into the gun; returns the amount
    /// moved. Capped by free capacity and by the spare rounds left.
    pub fn transfer(&mut self, request: u32) -> u32 {
        let moved = request
            .min(self.capacity - self.current)
            .min(self.magazines);
        self.current += moved;
        self.magazines -= moved;
        moved
    }

    /// Top up a reload: as many rounds as the gun still has room for.
    pub fn transfer_to_full(&mut self) -> u32 {
        self.transfer(self.capacity - self.current)
    }

    /// Reset both counters to their maxima.
    pub fn refill(&mut self) {
        self.current = self.capacity;
        self.magazines = self.max_reserve;
    }

    /// Overwrite both counters, clamped into range.
    pub fn set(&mut self, current: u32, magazines: u32) {
        self.current = current.min(self.capacity);
        self.magazines = magazines.min(self.max_reserve);
    }
}
