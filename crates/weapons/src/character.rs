//! Character state the weapon reads every tick.

/// Locomotion state reported by the character controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    Walking,
    Running,
    Crouched,
    Airborne,
}

impl MotionState {
    pub fn is_moving(self) -> bool {
        self != MotionState::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterState {
    pub motion: MotionState,
    /// Sliding lets the character shoot while running.
    pub sliding: bool,
    /// False while a cutscene or menu owns the controls.
    pub controllable: bool,
    /// Capsule radius; extends melee reach.
    pub radius: f32,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            motion: MotionState::Idle,
            sliding: false,
            controllable: true,
            radius: 0.35,
        }
    }
}

impl CharacterState {
    pub fn with_motion(motion: MotionState) -> Self {
        Self {
            motion,
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.motion == MotionState::Running
    }
}
