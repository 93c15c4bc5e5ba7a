/// Read-only growth coefficients of a plant species.
///
/// Nodes hold a shared reference to these and never mutate them.
pub trait SpeciesCoefficients: Send + Sync {
	/// Segment length gained per unit of age, before clamping to the segment's max length.
	fn growth_rate(&self) -> f32;
	/// How fast tropism fades as a segment ages.
	fn tropism_decay(&self) -> f32;
	/// How hard gravity pulls on young segments.
	fn tropism_strength(&self) -> f32;
	/// Thickness gained per unit of age, relative to the segment's base radius.
	fn thickness_coefficient(&self) -> f32;
	/// Age at which the plant stops growing.
	fn max_age(&self) -> f32;
	/// Plant age gained per unit of world time.
	fn aging_rate(&self) -> f32 {
		1.0
	}
}

/// Plain coefficient set, usually parsed with [`crate::formats::parse_species`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesParams {
	pub name: String,
	pub growth_rate: f32,
	pub tropism_decay: f32,
	pub tropism_strength: f32,
	pub thickness_coefficient: f32,
	pub max_age: f32,
	pub aging_rate: f32,
}

impl Default for SpeciesParams {
	fn default() -> Self {
		Self {
			name: String::from("default"),
			growth_rate: 1.0,
			tropism_decay: 1.0,
			tropism_strength: 0.2,
			thickness_coefficient: 0.1,
			max_age: 20.0,
			aging_rate: 1.0,
		}
	}
}

impl SpeciesCoefficients for SpeciesParams {
	fn growth_rate(&self) -> f32 {
		self.growth_rate
	}

	fn tropism_decay(&self) -> f32 {
		self.tropism_decay
	}

	fn tropism_strength(&self) -> f32 {
		self.tropism_strength
	}

	fn thickness_coefficient(&self) -> f32 {
		self.thickness_coefficient
	}

	fn max_age(&self) -> f32 {
		self.max_age
	}

	fn aging_rate(&self) -> f32 {
		self.aging_rate
	}
}
