use indextree::{NodeEdge, NodeId};

use super::{GrowthError, GrowthTree};
use crate::node::release_all;

impl GrowthTree {
	/// Age `id` and its whole subtree by `delta_age`, which may be negative to rewind.
	///
	/// Each node is updated before its children, so children grow out of their parent's
	/// new end point. Once a node's children are done:
	/// - with `mature`, a node without children or attached modules is pushed to `terminals`;
	/// - otherwise with `decay`, its attached modules are told to destroy themselves and dropped.
	///
	/// Every node that grows on its own needs species parameters. This is checked over the
	/// whole subtree before anything is touched.
	pub fn advance(
		&mut self,
		id: NodeId,
		delta_age: f32,
		terminals: &mut Vec<NodeId>,
		mature: bool,
		decay: bool,
	) -> Result<(), GrowthError> {
		self.check(id)?;
		self.check_species(id)?;

		let first_terminal = terminals.len();
		let edges: Vec<NodeEdge> = id.traverse(&self.arena).collect();
		for edge in edges {
			match edge {
				NodeEdge::Start(node_id) => self.grow(node_id, delta_age)?,
				NodeEdge::End(node_id) => self.settle(node_id, terminals, mature, decay),
			}
		}

		tracing::debug!(
			"Advanced subtree at {id:?} by {delta_age}, {} new terminal nodes",
			terminals.len() - first_terminal
		);
		Ok(())
	}

	fn check_species(&self, id: NodeId) -> Result<(), GrowthError> {
		for node_id in id.descendants(&self.arena) {
			let node = self.arena[node_id].get();
			let tracks_parent = node.root_segment && self.arena[node_id].parent().is_some();
			if !tracks_parent && node.species.is_none() {
				return Err(GrowthError::MissingSpecies(node_id));
			}
		}
		Ok(())
	}

	fn grow(&mut self, id: NodeId, delta_age: f32) -> Result<(), GrowthError> {
		let parent = self.arena[id].parent().map(|parent_id| {
			let parent = self.arena[parent_id].get();
			(parent.position, parent.thickness)
		});

		let node = self.arena[id].get_mut();
		node.age += delta_age;

		match parent {
			// module roots continue their parent's end point and taper
			Some((parent_position, parent_thickness)) if node.root_segment => {
				node.position = parent_position;
				node.thickness = parent_thickness;
			}
			Some((parent_position, _)) => {
				let species = node.species.clone().ok_or(GrowthError::MissingSpecies(id))?;
				node.position = node.grown_position(parent_position, species.as_ref());
				node.thickness = node.grown_thickness(species.as_ref());
			}
			// the absolute root stays where it was placed
			None => {
				let species = node.species.clone().ok_or(GrowthError::MissingSpecies(id))?;
				node.thickness = node.grown_thickness(species.as_ref());
			}
		}

		Ok(())
	}

	fn settle(&mut self, id: NodeId, terminals: &mut Vec<NodeId>, mature: bool, decay: bool) {
		let has_children = self.arena[id].first_child().is_some();
		let node = self.arena[id].get_mut();

		if mature && !has_children && node.modules.is_empty() {
			terminals.push(id);
		} else if decay && !node.modules.is_empty() {
			let attached = node.modules.len();
			let notified = release_all(&mut node.modules);
			if notified < attached {
				tracing::warn!("{} modules at {id:?} were gone before decay", attached - notified);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use glam::Vec3;

	use super::*;
	use crate::node::{GrowthNode, MIN_THICKNESS};
	use crate::tree::tests::{segment, species, CountingModule};

	fn snapshot(tree: &GrowthTree) -> Vec<(Vec3, f32, f32)> {
		tree.subtree(tree.root())
			.into_iter()
			.map(|id| {
				let node = tree.get_node(id).unwrap();
				(node.position(), node.thickness(), node.age())
			})
			.collect()
	}

	#[test]
	fn segment_grows_along_direction_with_tropism() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();

		tree.advance(tree.root(), 2.0, &mut Vec::new(), false, false).unwrap();

		// growth rate 0.5, age 2: length 1 (under the max of 2)
		let g1 = 0.95f32.powf(2.0);
		// positive strength flips the gravity pull: young shoots bend upwards
		let lift = g1 * 0.2 / (2.0 + g1);
		let expected = Vec3::new(1.0, lift, 0.0);
		let node = tree.get_node(a).unwrap();

		assert!(node.position().abs_diff_eq(expected, 1e-6), "{}", node.position());
		assert_eq!(node.age(), 2.0);
		assert!((node.thickness() - 2.0 * 0.1 * 0.1).abs() < 1e-6);
	}

	#[test]
	fn length_is_clamped_to_max() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::Y, false)).unwrap();

		tree.advance(tree.root(), 100.0, &mut Vec::new(), false, false).unwrap();

		// tropism is negligible at this age, the segment sits at its max length of 2
		let position = tree.get_node(a).unwrap().position();
		assert!(position.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-3), "{position}");
	}

	#[test]
	fn zero_delta_is_idempotent() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		let b = tree.add_child(a, segment(Vec3::new(1.0, 1.0, 0.0), false)).unwrap();
		tree.add_child(b, segment(Vec3::Z, true)).unwrap();
		tree.advance(tree.root(), 1.5, &mut Vec::new(), false, false).unwrap();

		let before = snapshot(&tree);
		tree.advance(tree.root(), 0.0, &mut Vec::new(), false, false).unwrap();

		assert_eq!(snapshot(&tree), before);
	}

	#[test]
	fn thickness_never_drops_below_floor() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		tree.add_child(a, segment(Vec3::Y, true)).unwrap();

		for delta in [0.0, 0.01, 3.0, -5.0, -100.0, 250.0] {
			tree.advance(tree.root(), delta, &mut Vec::new(), false, false).unwrap();
			for id in tree.subtree(tree.root()) {
				assert!(tree.get_node(id).unwrap().thickness() >= MIN_THICKNESS);
			}
		}
	}

	#[test]
	fn root_segment_tracks_parent() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		// module roots need no species of their own
		let module_root = tree
			.add_child(a, GrowthNode::new(Vec3::splat(9.0), Vec3::Z, 0.0, 5.0, 0.4, true))
			.unwrap();

		tree.advance(tree.root(), 3.0, &mut Vec::new(), false, false).unwrap();

		let parent = tree.get_node(a).unwrap();
		let node = tree.get_node(module_root).unwrap();
		assert_eq!(node.position(), parent.position());
		assert_eq!(node.thickness(), parent.thickness());
		assert_eq!(node.age(), 3.0);
	}

	#[test]
	fn children_grow_from_updated_parent() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		let b = tree.add_child(a, segment(Vec3::Z, false)).unwrap();

		tree.advance(tree.root(), 1.0, &mut Vec::new(), false, false).unwrap();

		let sp = species();
		let root_position = tree.get_node(tree.root()).unwrap().position();
		let node_a = tree.get_node(a).unwrap();
		let node_b = tree.get_node(b).unwrap();

		assert_eq!(node_a.position(), node_a.grown_position(root_position, sp.as_ref()));
		assert_eq!(node_b.position(), node_b.grown_position(node_a.position(), sp.as_ref()));
		// B hangs off A's new end point, not the origin A started at
		assert!(node_b.position().x > 0.4);
	}

	#[test]
	fn mature_pass_collects_leaves_in_order() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let left = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		let right = tree.add_child(tree.root(), segment(Vec3::NEG_X, false)).unwrap();

		let mut terminals = Vec::new();
		tree.advance(tree.root(), 1.0, &mut terminals, true, false).unwrap();

		assert_eq!(terminals, vec![left, right]);
	}

	#[test]
	fn leaves_with_modules_are_not_terminal() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let left = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		let right = tree.add_child(tree.root(), segment(Vec3::NEG_X, false)).unwrap();
		let module = Arc::new(CountingModule::default());
		tree.attach_module(left, &module).unwrap();

		let mut terminals = Vec::new();
		tree.advance(tree.root(), 1.0, &mut terminals, true, true).unwrap();

		assert_eq!(terminals, vec![right]);
		// a mature leaf with modules falls through to the decay branch
		assert_eq!(module.destroyed(), 1);
		assert_eq!(tree.get_node(left).unwrap().attached_modules(), 0);
	}

	#[test]
	fn decay_releases_modules() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		tree.add_child(a, segment(Vec3::Y, false)).unwrap();
		let module = Arc::new(CountingModule::default());
		tree.attach_module(tree.root(), &module).unwrap();
		tree.attach_module(a, &module).unwrap();

		let mut terminals = Vec::new();
		tree.advance(tree.root(), -1.0, &mut terminals, false, true).unwrap();

		assert!(terminals.is_empty());
		assert_eq!(module.destroyed(), 2);
		assert_eq!(tree.get_node(a).unwrap().attached_modules(), 0);

		// nothing left to release
		tree.advance(tree.root(), -1.0, &mut terminals, false, true).unwrap();
		assert_eq!(module.destroyed(), 2);
	}

	#[test]
	fn without_decay_modules_stay() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let module = Arc::new(CountingModule::default());
		tree.attach_module(tree.root(), &module).unwrap();

		tree.advance(tree.root(), -1.0, &mut Vec::new(), false, false).unwrap();

		assert_eq!(module.destroyed(), 0);
		assert_eq!(tree.get_node(tree.root()).unwrap().attached_modules(), 1);
	}

	#[test]
	fn missing_species_fails_before_mutation() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		let bare = tree
			.add_child(a, GrowthNode::new(Vec3::ZERO, Vec3::Y, 0.0, 1.0, 0.1, false))
			.unwrap();

		let err = tree.advance(tree.root(), 1.0, &mut Vec::new(), true, false).unwrap_err();

		assert_eq!(err, GrowthError::MissingSpecies(bare));
		assert_eq!(tree.get_node(tree.root()).unwrap().age(), 0.0);
		assert_eq!(tree.get_node(a).unwrap().age(), 0.0);
	}

	#[test]
	fn subtree_advance_leaves_ancestors_alone() {
		let mut tree = GrowthTree::new_with_root(segment(Vec3::Y, false));
		let a = tree.add_child(tree.root(), segment(Vec3::X, false)).unwrap();
		let b = tree.add_child(a, segment(Vec3::Y, false)).unwrap();

		tree.advance(a, 2.0, &mut Vec::new(), false, false).unwrap();

		assert_eq!(tree.get_node(tree.root()).unwrap().age(), 0.0);
		assert_eq!(tree.get_node(a).unwrap().age(), 2.0);
		assert_eq!(tree.get_node(b).unwrap().age(), 2.0);
	}
}
