//! Shot spread sampling.

use glam::{Vec2, Vec3};
use rand::Rng;

/// Half-width of the spread square for an accuracy value.
pub fn spread_radius(accuracy: f32, maximum_spread: f32) -> f32 {
    (1.0 - accuracy) * (maximum_spread / 10.0)
}

/// Sample a camera-local shot direction (forward is -Z, not normalised).
///
/// Both offsets are independent uniforms in `[-1, 1]` scaled by the spread
/// radius, so the pattern fills a square, not a disk. Perfect accuracy
/// returns straight ahead without drawing from `rng`.
pub fn sample_local_direction<R: Rng + ?Sized>(rng: &mut R, accuracy: f32, maximum_spread: f32) -> Vec3 {
    if (accuracy - 1.0).abs() < f32::EPSILON {
        return -Vec3::Z;
    }
    let offset = Vec2::new(rng.gen_range(-1.0f32..=1.0), rng.gen_range(-1.0f32..=1.0))
        * spread_radius(accuracy, maximum_spread);
    Vec3::new(offset.x, offset.y, -1.0)
}
