//! Procedural growth of botanical skeletons.
//!
//! A [`GrowthTree`] holds [`GrowthNode`] segments in an arena. Aging it with
//! [`GrowthTree::advance`] recomputes segment positions (with gravity tropism) and
//! thickness, and reports growth tips. [`GrowthTree::world_frame`] turns a grown
//! node into the rotation + translation a rig bone needs.

pub mod formats;
pub mod math;
pub mod node;
pub mod plant;
pub mod species;
pub mod tree;

pub use indextree::NodeId;

pub use math::transform::Frame;
pub use node::{AttachedModule, GrowthNode};
pub use plant::Plant;
pub use species::{SpeciesCoefficients, SpeciesParams};
pub use tree::{GrowthError, GrowthTree};
