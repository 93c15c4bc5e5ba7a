pub mod transform;

use glam::Vec3;

/// Reference axis of every node frame.
pub const UP: Vec3 = Vec3::Y;

/// Direction tropism pulls young shoots towards.
pub const GRAVITY_DIR: Vec3 = Vec3::NEG_Y;

/// Squared length below which a direction is considered degenerate.
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-6;
