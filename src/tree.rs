mod frames;
mod growth;
mod prototype;
mod rig;

use std::fmt::{self, Display};
use std::sync::{Arc, Weak};

use indextree::{Arena, NodeId};

use crate::node::{release_all, AttachedModule, GrowthNode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrowthError {
	#[error("Node {0:?} does not exist in this tree")]
	NodeNotFound(NodeId),
	#[error("Node {0:?} has no species parameters to grow with")]
	MissingSpecies(NodeId),
	#[error("Node {node:?} already has rig index {index}")]
	RigIndexAssigned { node: NodeId, index: u32 },
	#[error("The root of a growth tree cannot be removed")]
	CannotRemoveRoot,
	#[error("Rig indices of this tree are exhausted")]
	RigIndexOverflow,
}

/// Arena of growth nodes.
///
/// Besides the main tree under [`GrowthTree::root`], the arena may hold detached
/// subtrees: clones kept as prototypes and children orphaned by node removal.
pub struct GrowthTree {
	root: NodeId,
	pub(crate) arena: Arena<GrowthNode>,
	next_rig_index: u32,
}

impl GrowthTree {
	pub fn new_with_root(node: GrowthNode) -> Self {
		let mut arena = Arena::new();
		let root = arena.new_node(node);

		Self {
			root,
			arena,
			next_rig_index: 0,
		}
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Number of live nodes in the arena, detached subtrees included.
	pub fn len(&self) -> usize {
		self.arena.iter().filter(|n| !n.is_removed()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.arena.get(id).is_some() && !id.is_removed(&self.arena)
	}

	pub(crate) fn check(&self, id: NodeId) -> Result<(), GrowthError> {
		match self.contains(id) {
			true => Ok(()),
			false => Err(GrowthError::NodeNotFound(id)),
		}
	}

	/// Append `node` as the last child of `parent`.
	pub fn add_child(&mut self, parent: NodeId, node: GrowthNode) -> Result<NodeId, GrowthError> {
		self.check(parent)?;

		let node_id = self.arena.new_node(node);
		parent.append(node_id, &mut self.arena);
		Ok(node_id)
	}

	/// Insert `node` without a parent.
	pub fn add_detached(&mut self, node: GrowthNode) -> NodeId {
		self.arena.new_node(node)
	}

	pub fn get_node(&self, id: NodeId) -> Option<&GrowthNode> {
		match self.contains(id) {
			true => Some(self.arena[id].get()),
			false => None,
		}
	}

	/// Only species and attachment state are meant to be edited through this.
	pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut GrowthNode> {
		match self.contains(id) {
			true => Some(self.arena[id].get_mut()),
			false => None,
		}
	}

	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		match self.contains(id) {
			true => self.arena[id].parent(),
			false => None,
		}
	}

	pub fn parent_node(&self, id: NodeId) -> Option<&GrowthNode> {
		self.get_node(self.parent(id)?)
	}

	/// Children in branch order.
	pub fn children(&self, id: NodeId) -> Vec<NodeId> {
		match self.contains(id) {
			true => id.children(&self.arena).collect(),
			false => Vec::new(),
		}
	}

	/// `id` followed by all its descendants, parents before children, children in branch order.
	pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
		match self.contains(id) {
			true => id.descendants(&self.arena).collect(),
			false => Vec::new(),
		}
	}

	/// Anchor an external module at `id`. Only a weak handle is kept.
	pub fn attach_module<M: AttachedModule + 'static>(&mut self, id: NodeId, module: &Arc<M>) -> Result<(), GrowthError> {
		let node = self.get_node_mut(id).ok_or(GrowthError::NodeNotFound(id))?;
		let module: Weak<M> = Arc::downgrade(module);
		node.modules.push(module);
		Ok(())
	}

	/// Destroy a single node.
	///
	/// Its children are detached, not deleted: their ids are returned and each of
	/// them is the root of its own subtree from then on. Attached modules are told to
	/// destroy themselves.
	pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<NodeId>, GrowthError> {
		self.check(id)?;
		if id == self.root {
			return Err(GrowthError::CannotRemoveRoot);
		}

		let orphans: Vec<NodeId> = id.children(&self.arena).collect();
		for &child in &orphans {
			child.detach(&mut self.arena);
		}

		release_all(&mut self.arena[id].get_mut().modules);
		id.remove(&mut self.arena);

		tracing::debug!("Removed node {id:?}, orphaned {} children", orphans.len());
		Ok(orphans)
	}

	/// Destroy `id` and everything below it.
	pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), GrowthError> {
		self.check(id)?;
		if id == self.root {
			return Err(GrowthError::CannotRemoveRoot);
		}

		let ids = self.subtree(id);
		for &nid in &ids {
			release_all(&mut self.arena[nid].get_mut().modules);
		}
		id.remove_subtree(&mut self.arena);

		tracing::debug!("Removed subtree of {} nodes at {id:?}", ids.len());
		Ok(())
	}
}

fn rec_fmt(indent: usize, f: &mut fmt::Formatter<'_>, node_id: NodeId, arena: &Arena<GrowthNode>) -> fmt::Result {
	let Some(node) = arena.get(node_id) else {
		return Ok(());
	};

	let node = node.get();

	let kind = if node.root_segment { "module" } else { "segment" };
	#[cfg(feature = "owo")]
	let kind = {
		use owo_colors::OwoColorize;
		kind.magenta()
	};

	writeln!(
		f,
		"{}- [{}] age {:.2} at [{:.3}, {:.3}, {:.3}] (thickness {:.3})",
		"  ".repeat(indent),
		kind,
		node.age,
		node.position.x,
		node.position.y,
		node.position.z,
		node.thickness
	)?;
	for child in node_id.children(arena) {
		rec_fmt(indent + 1, f, child, arena)?;
	}

	Ok(())
}

impl Display for GrowthTree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.contains(self.root) {
			return write!(f, "(empty)");
		}

		rec_fmt(0, f, self.root, &self.arena)
	}
}
