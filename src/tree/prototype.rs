use std::collections::HashMap;

use glam::Quat;
use indextree::{Arena, NodeId};

use super::{GrowthError, GrowthTree};
use crate::node::GrowthNode;

/// Copies of every node under `id`, parents first, each with the source id of its parent.
fn snapshot_subtree(arena: &Arena<GrowthNode>, id: NodeId) -> Vec<(NodeId, Option<NodeId>, GrowthNode)> {
	id.descendants(arena)
		.map(|src_id| {
			let src = &arena[src_id];
			let src_parent = if src_id == id { None } else { src.parent() };
			(src_id, src_parent, GrowthNode::copy_state(src.get()))
		})
		.collect()
}

impl GrowthTree {
	/// Deep copy of the subtree at `id`, attached as the last child of `new_parent`
	/// or left detached with `None`.
	///
	/// Copies carry the species and rig index of their source, but no attached modules.
	/// Use [`GrowthTree::clear_rig_indices`] on the copy if it needs bones of its own.
	pub fn clone_subtree(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<NodeId, GrowthError> {
		self.check(id)?;
		let copies = snapshot_subtree(&self.arena, id);
		self.insert_copies(id, copies, new_parent)
	}

	/// Deep copy of the subtree at `id` in `source`, e.g. a prototype library, into this tree.
	pub fn graft_from(
		&mut self,
		source: &GrowthTree,
		id: NodeId,
		new_parent: Option<NodeId>,
	) -> Result<NodeId, GrowthError> {
		source.check(id)?;
		let copies = snapshot_subtree(&source.arena, id);
		self.insert_copies(id, copies, new_parent)
	}

	fn insert_copies(
		&mut self,
		src_root: NodeId,
		copies: Vec<(NodeId, Option<NodeId>, GrowthNode)>,
		new_parent: Option<NodeId>,
	) -> Result<NodeId, GrowthError> {
		if let Some(parent) = new_parent {
			self.check(parent)?;
		}
		// grafted nodes keep their indices, later assignments must not hand them out again
		if let Some(max_index) = copies.iter().filter_map(|(_, _, copy)| copy.rig_index).max() {
			self.reserve_rig_index(max_index)?;
		}

		let count = copies.len();
		let mut new_ids: HashMap<NodeId, NodeId> = HashMap::with_capacity(count);

		for (src_id, src_parent, copy) in copies {
			let new_id = self.arena.new_node(copy);
			let parent = match src_parent {
				Some(src_parent) => new_ids.get(&src_parent).copied(),
				None => new_parent,
			};
			if let Some(parent) = parent {
				parent.append(new_id, &mut self.arena);
			}

			new_ids.insert(src_id, new_id);
		}

		let new_root = new_ids.get(&src_root).copied().ok_or(GrowthError::NodeNotFound(src_root))?;
		tracing::debug!("Cloned {count} nodes into {new_root:?}");
		Ok(new_root)
	}

	/// Apply one perturbation uniformly to the subtree at `id`: shift ages by `delta_age`,
	/// scale base radii and max lengths, rotate directions.
	///
	/// Positions and thickness are left stale until the next [`GrowthTree::advance`].
	pub fn retransform(
		&mut self,
		id: NodeId,
		delta_age: f32,
		radius_multiplier: f32,
		length_multiplier: f32,
		rotation: Quat,
	) -> Result<(), GrowthError> {
		self.check(id)?;

		let ids: Vec<NodeId> = id.descendants(&self.arena).collect();
		for &node_id in &ids {
			let node = self.arena[node_id].get_mut();
			node.age += delta_age;
			node.base_radius *= radius_multiplier;
			node.max_length *= length_multiplier;
			node.direction = rotation * node.direction;
		}

		tracing::debug!("Retransformed {} nodes at {id:?}", ids.len());
		Ok(())
	}
}
