use std::sync::Arc;

use indextree::NodeId;

use crate::species::SpeciesCoefficients;
use crate::tree::{GrowthError, GrowthTree};

/// A growth tree driven by world time.
///
/// Each [`Plant::update`] turns the world clock into a plant age, scaled by the
/// species aging rate and capped at its max age, and ages the tree by the difference.
pub struct Plant {
	pub tree: GrowthTree,
	species: Arc<dyn SpeciesCoefficients>,
	birthday: f32,
	age: f32,
}

impl Plant {
	/// `tree` starts at age 0 and is born at world time `birthday`.
	pub fn new(tree: GrowthTree, species: Arc<dyn SpeciesCoefficients>, birthday: f32) -> Self {
		Self {
			tree,
			species,
			birthday,
			age: 0.0,
		}
	}

	pub fn age(&self) -> f32 {
		self.age
	}

	pub fn birthday(&self) -> f32 {
		self.birthday
	}

	pub fn species(&self) -> &Arc<dyn SpeciesCoefficients> {
		&self.species
	}

	/// Plant age at `world_time`. Zero before the birthday, never above the species max age.
	pub fn weighted_age(&self, world_time: f32) -> f32 {
		let age = (world_time - self.birthday) * self.species.aging_rate();
		age.clamp(0.0, self.species.max_age().max(0.0))
	}

	/// Age difference the next [`Plant::update`] at `world_time` will apply.
	pub fn change_in_age(&self, world_time: f32) -> f32 {
		self.weighted_age(world_time) - self.age
	}

	/// Bring the tree to its age at `world_time`.
	///
	/// Moving forward is a mature pass and returns the growth tips. Moving backward
	/// decays attached modules and returns nothing.
	pub fn update(&mut self, world_time: f32) -> Result<Vec<NodeId>, GrowthError> {
		let target = self.weighted_age(world_time);
		let delta = target - self.age;

		let mut terminals = Vec::new();
		self.tree
			.advance(self.tree.root(), delta, &mut terminals, delta > 0.0, delta < 0.0)?;
		self.age = target;

		tracing::debug!("Plant aged to {target} at world time {world_time}");
		Ok(terminals)
	}
}
