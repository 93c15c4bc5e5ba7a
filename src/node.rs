mod module;

use std::fmt;
use std::sync::{Arc, Weak};

use glam::Vec3;

use crate::math::{DEGENERATE_LENGTH_SQUARED, GRAVITY_DIR, UP};
use crate::species::SpeciesCoefficients;

pub use module::AttachedModule;
pub(crate) use module::release_all;

/// Lower bound of every grown thickness.
pub const MIN_THICKNESS: f32 = 0.015;

/// Base of the exponential tropism falloff.
const TROPISM_FALLOFF: f32 = 0.95;

/// Smallest denominator of the tropism offset, keeps newborn segments finite.
const TROPISM_MIN_DENOM: f32 = 0.05;

/// One branch segment, or the root of a branch module.
///
/// Structure (parent, children) lives in the owning [`crate::GrowthTree`] arena.
pub struct GrowthNode {
	pub(crate) position: Vec3,
	pub(crate) direction: Vec3,
	pub(crate) age: f32,
	pub(crate) max_length: f32,
	pub(crate) thickness: f32,
	pub(crate) base_radius: f32,
	/// Module roots sit on their parent's end point instead of growing.
	pub(crate) root_segment: bool,
	pub(crate) rig_index: Option<u32>,
	pub(crate) species: Option<Arc<dyn SpeciesCoefficients>>,
	pub(crate) modules: Vec<Weak<dyn AttachedModule>>,
}

impl Default for GrowthNode {
	fn default() -> Self {
		Self {
			position: Vec3::ZERO,
			direction: UP,
			age: 0.0,
			max_length: 3.0,
			thickness: 0.1,
			base_radius: 0.1,
			root_segment: false,
			rig_index: None,
			species: None,
			modules: Vec::new(),
		}
	}
}

impl GrowthNode {
	pub fn new(position: Vec3, direction: Vec3, age: f32, max_length: f32, thickness: f32, root_segment: bool) -> Self {
		Self {
			position,
			direction: unit_or_up(direction),
			age,
			max_length,
			thickness,
			base_radius: thickness,
			root_segment,
			rig_index: None,
			species: None,
			modules: Vec::new(),
		}
	}

	/// Segment ending at `end`, pointing away from `start`.
	pub fn from_endpoints(start: Vec3, end: Vec3, age: f32, max_length: f32, thickness: f32, root_segment: bool) -> Self {
		Self::new(end, end - start, age, max_length, thickness, root_segment)
	}

	/// Copy of all scalar and vector state, species and rig index included.
	/// Attached modules stay with the original.
	pub fn copy_state(other: &GrowthNode) -> Self {
		Self {
			position: other.position,
			direction: other.direction,
			age: other.age,
			max_length: other.max_length,
			thickness: other.thickness,
			base_radius: other.base_radius,
			root_segment: other.root_segment,
			rig_index: other.rig_index,
			species: other.species.clone(),
			modules: Vec::new(),
		}
	}

	pub fn with_species(mut self, species: Arc<dyn SpeciesCoefficients>) -> Self {
		self.species = Some(species);
		self
	}

	pub fn set_species(&mut self, species: Arc<dyn SpeciesCoefficients>) {
		self.species = Some(species);
	}

	pub fn species(&self) -> Option<&Arc<dyn SpeciesCoefficients>> {
		self.species.as_ref()
	}

	pub fn position(&self) -> Vec3 {
		self.position
	}

	pub fn direction(&self) -> Vec3 {
		self.direction
	}

	pub fn age(&self) -> f32 {
		self.age
	}

	pub fn max_length(&self) -> f32 {
		self.max_length
	}

	pub fn thickness(&self) -> f32 {
		self.thickness
	}

	pub fn base_radius(&self) -> f32 {
		self.base_radius
	}

	pub fn is_root_segment(&self) -> bool {
		self.root_segment
	}

	pub fn rig_index(&self) -> Option<u32> {
		self.rig_index
	}

	pub fn attached_modules(&self) -> usize {
		self.modules.len()
	}

	/// Current segment length: linear in age until it reaches `max_length`.
	pub(crate) fn branch_length(&self, species: &dyn SpeciesCoefficients) -> f32 {
		self.max_length.min(self.age * species.growth_rate())
	}

	/// End point of this segment grown out of `parent_position`, bent by gravitropism.
	pub(crate) fn grown_position(&self, parent_position: Vec3, species: &dyn SpeciesCoefficients) -> Vec3 {
		let branch_length = self.branch_length(species);
		let base = parent_position + branch_length * self.direction;

		// strong on young shoots, fades as the branch lignifies
		let g1 = TROPISM_FALLOFF.powf(self.age * species.tropism_decay());
		let g2 = -species.tropism_strength();
		let offset = GRAVITY_DIR * (g1 * g2) / (self.age + g1).max(TROPISM_MIN_DENOM);

		base + offset * branch_length
	}

	pub(crate) fn grown_thickness(&self, species: &dyn SpeciesCoefficients) -> f32 {
		MIN_THICKNESS.max(self.age * self.base_radius * species.thickness_coefficient())
	}
}

impl Drop for GrowthNode {
	fn drop(&mut self) {
		release_all(&mut self.modules);
	}
}

impl fmt::Debug for GrowthNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GrowthNode")
			.field("position", &self.position)
			.field("direction", &self.direction)
			.field("age", &self.age)
			.field("max_length", &self.max_length)
			.field("thickness", &self.thickness)
			.field("base_radius", &self.base_radius)
			.field("root_segment", &self.root_segment)
			.field("rig_index", &self.rig_index)
			.field("has_species", &self.species.is_some())
			.field("attached_modules", &self.modules.len())
			.finish()
	}
}

fn unit_or_up(direction: Vec3) -> Vec3 {
	if !direction.is_finite() || direction.length_squared() < DEGENERATE_LENGTH_SQUARED {
		tracing::warn!("Degenerate node direction {direction}, using up axis instead");
		return UP;
	}
	direction.normalize()
}
