use glam::Vec3;
use indextree::NodeId;

use super::{GrowthError, GrowthTree};
use crate::math::transform::Frame;

impl GrowthTree {
	/// World-space frame for a rig bone at `id`: its Y axis follows the segment, its origin
	/// is the node position. Read-only, recomputed from current state on every call.
	pub fn world_frame(&self, id: NodeId) -> Result<Frame, GrowthError> {
		let node = self.get_node(id).ok_or(GrowthError::NodeNotFound(id))?;

		let dir = match self.parent(id) {
			None => node.direction,
			// a module root sits on its parent's end point, so its own direction means nothing
			Some(parent_id) if node.root_segment => self.effective_direction(parent_id),
			Some(parent_id) => node.position - self.arena[parent_id].get().position,
		};

		Ok(Frame::aligned(dir, node.position))
	}

	/// Direction of the segment ending at `id`, as seen from the module root below it.
	fn effective_direction(&self, id: NodeId) -> Vec3 {
		let node = self.arena[id].get();
		let parent = self.parent(id);
		let grandparent = parent.and_then(|p| self.parent(p));

		match (node.root_segment, parent, grandparent) {
			(false, Some(parent), _) => node.position - self.arena[parent].get().position,
			// a module root coincides with the end of its parent, measure from one level further up
			(true, Some(_), Some(grandparent)) => node.position - self.arena[grandparent].get().position,
			_ => node.direction,
		}
	}
}
