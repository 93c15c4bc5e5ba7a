use indextree::NodeId;

use super::{GrowthError, GrowthTree};
use crate::math::transform::Frame;

impl GrowthTree {
	/// Give `id` its rig bone index. A node keeps its first index for good.
	///
	/// `u32::MAX` is reserved: the counter must always be able to move past an index.
	pub fn set_rig_index(&mut self, id: NodeId, index: u32) -> Result<(), GrowthError> {
		let next = index.checked_add(1).ok_or(GrowthError::RigIndexOverflow)?;
		let node = self.get_node_mut(id).ok_or(GrowthError::NodeNotFound(id))?;
		if let Some(assigned) = node.rig_index {
			return Err(GrowthError::RigIndexAssigned { node: id, index: assigned });
		}

		node.rig_index = Some(index);
		self.next_rig_index = self.next_rig_index.max(next);
		Ok(())
	}

	/// Move the counter past `index`, e.g. one carried over from another tree.
	pub(crate) fn reserve_rig_index(&mut self, index: u32) -> Result<(), GrowthError> {
		let next = index.checked_add(1).ok_or(GrowthError::RigIndexOverflow)?;
		self.next_rig_index = self.next_rig_index.max(next);
		Ok(())
	}

	/// Forget the rig indices of a whole subtree, typically a fresh clone of a prototype.
	pub fn clear_rig_indices(&mut self, id: NodeId) -> Result<(), GrowthError> {
		self.check(id)?;

		let ids: Vec<NodeId> = id.descendants(&self.arena).collect();
		for node_id in ids {
			self.arena[node_id].get_mut().rig_index = None;
		}
		Ok(())
	}

	/// Number every node under `id` that has no rig index yet, in skeleton order
	/// (parents first, children in branch order). Indices are never handed out twice
	/// by the same tree.
	///
	/// Returns the whole subtree in that order.
	pub fn assign_rig_indices(&mut self, id: NodeId) -> Result<Vec<NodeId>, GrowthError> {
		self.check(id)?;

		let order: Vec<NodeId> = id.descendants(&self.arena).collect();
		let unassigned = order
			.iter()
			.filter(|&&node_id| self.arena[node_id].get().rig_index.is_none())
			.count();
		let assigned = u32::try_from(unassigned).map_err(|_| GrowthError::RigIndexOverflow)?;
		let end = self
			.next_rig_index
			.checked_add(assigned)
			.ok_or(GrowthError::RigIndexOverflow)?;

		let mut next = self.next_rig_index;
		for &node_id in &order {
			let node = self.arena[node_id].get_mut();
			if node.rig_index.is_none() {
				node.rig_index = Some(next);
				next += 1;
			}
		}
		self.next_rig_index = end;

		tracing::debug!("Assigned {assigned} rig indices under {id:?}");
		Ok(order)
	}

	/// World frames of the subtree at `id`, in skeleton order.
	pub fn rig_frames(&self, id: NodeId) -> Result<Vec<(NodeId, Frame)>, GrowthError> {
		self.check(id)?;

		id.descendants(&self.arena)
			.map(|node_id| Ok((node_id, self.world_frame(node_id)?)))
			.collect()
	}
}
