use glam::{Mat4, Quat, Vec3};

use super::{DEGENERATE_LENGTH_SQUARED, UP};

/// World-space placement of a rig bone at a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
	/// Rotation taking [`UP`] onto the segment direction
	pub rotation: Quat,
	/// X Y Z
	pub translation: Vec3,
}

impl Default for Frame {
	fn default() -> Self {
		Self {
			rotation: Quat::IDENTITY,
			translation: Vec3::ZERO,
		}
	}
}

impl Frame {
	/// Frame whose Y axis points along `dir`, placed at `translation`.
	pub fn aligned(dir: Vec3, translation: Vec3) -> Self {
		Self {
			rotation: rotation_from_up(dir),
			translation,
		}
	}

	pub fn to_matrix(&self) -> Mat4 {
		Mat4::from_rotation_translation(self.rotation, self.translation)
	}

	/// Segment axis in world space.
	pub fn axis(&self) -> Vec3 {
		self.rotation * UP
	}
}

/// Shortest-arc rotation taking [`UP`] onto `dir`.
///
/// Directions too short to normalize are replaced by [`UP`] itself, which yields identity.
pub fn rotation_from_up(dir: Vec3) -> Quat {
	if !dir.is_finite() || dir.length_squared() < DEGENERATE_LENGTH_SQUARED {
		tracing::trace!("Degenerate frame direction {dir}, falling back to up axis");
		return Quat::IDENTITY;
	}

	Quat::from_rotation_arc(UP, dir.normalize())
}
