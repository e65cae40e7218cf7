//! Action-level input handling for weapon controls.
//!
//! Raw key events are mapped to [`Action`]s through [`InputBindings`]; the
//! per-frame [`InputState`] tracks held / pressed / released edges and hands
//! the weapon core an immutable [`ActionSnapshot`] once per tick.

mod bindings;

pub use bindings::InputBindings;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weapon-relevant player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Fire,
    Aim,
    Reload,
    Melee,
    FireMode,
    Interact,
}

/// Whether a button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

/// Manages action state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Actions currently held down.
    held: HashSet<Action>,
    /// Actions pressed this frame.
    pressed: HashSet<Action>,
    /// Actions released this frame.
    released: HashSet<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Process an action event.
    pub fn process_action(&mut self, action: Action, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                // Key repeat must not produce a second rising edge.
                if !self.held.contains(&action) {
                    self.pressed.insert(action);
                }
                self.held.insert(action);
            }
            ButtonState::Released => {
                self.held.remove(&action);
                self.released.insert(action);
            }
        }
    }

    /// Process a raw key event through the bindings. Unbound keys are ignored.
    pub fn process_key(&mut self, bindings: &InputBindings, key: &str, state: ButtonState) {
        match bindings.action_for(key) {
            Some(action) => self.process_action(action, state),
            None => log::trace!("Ignoring unbound key {:?}", key),
        }
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for action in self.held.drain() {
            self.released.insert(action);
        }
    }

    /// Check if an action is currently held.
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was pressed this frame.
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was released this frame.
    pub fn is_released(&self, action: Action) -> bool {
        self.released.contains(&action)
    }

    /// Freeze this frame's state for the weapon tick.
    pub fn snapshot(&self) -> ActionSnapshot {
        ActionSnapshot {
            fire_held: self.is_held(Action::Fire),
            fire_pressed: self.is_pressed(Action::Fire),
            aim_held: self.is_held(Action::Aim),
            aim_pressed: self.is_pressed(Action::Aim),
            reload_pressed: self.is_pressed(Action::Reload),
            melee_pressed: self.is_pressed(Action::Melee),
            fire_mode_pressed: self.is_pressed(Action::FireMode),
            interact_pressed: self.is_pressed(Action::Interact),
        }
    }
}

/// Immutable per-tick view of the weapon controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSnapshot {
    pub fire_held: bool,
    /// Rising edge of the fire button this tick.
    pub fire_pressed: bool,
    pub aim_held: bool,
    pub aim_pressed: bool,
    pub reload_pressed: bool,
    pub melee_pressed: bool,
    pub fire_mode_pressed: bool,
    pub interact_pressed: bool,
}

impl ActionSnapshot {
    /// A snapshot for the first tick of a fire-button press.
    pub fn fire_press() -> Self {
        Self {
            fire_held: true,
            fire_pressed: true,
            ..Default::default()
        }
    }

    /// A snapshot for a fire button that stays down.
    pub fn fire_hold() -> Self {
        Self {
            fire_held: true,
            ..Default::default()
        }
    }
}
