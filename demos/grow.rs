use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use arbor::formats::parse_species;
use arbor::{AttachedModule, GrowthNode, GrowthTree, Plant, SpeciesCoefficients, SpeciesParams};
use clap::Parser;
use glam::Vec3;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[arg(long, help = "Path to a species .json file. Uses built-in coefficients otherwise.")]
	species: Option<PathBuf>,
	#[arg(long, default_value_t = 8, help = "Number of world clock ticks")]
	ticks: u32,
	#[arg(long, default_value_t = 0.5, help = "World time between ticks")]
	dt: f32,
	#[arg(long, help = "Rewind the clock to zero after growing")]
	rewind: bool,
}

struct Leaf(&'static str);

impl AttachedModule for Leaf {
	fn destroy_self(&self) {
		info!("Leaf {} dropped", self.0);
	}
}

fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(LevelFilter::INFO)
		.init();

	let species: Arc<dyn SpeciesCoefficients> = match &cli.species {
		Some(path) => {
			let params = parse_species(&fs::read_to_string(path)?)?;
			info!("Loaded species {:?}", params.name);
			Arc::new(params)
		}
		None => Arc::new(SpeciesParams {
			name: String::from("sapling"),
			..Default::default()
		}),
	};

	let node = |direction: Vec3, root_segment: bool| {
		GrowthNode::new(Vec3::ZERO, direction, 0.0, 2.0, 0.1, root_segment).with_species(species.clone())
	};

	let mut tree = GrowthTree::new_with_root(node(Vec3::Y, false));
	let trunk = tree.add_child(tree.root(), node(Vec3::Y, false))?;
	let collar = tree.add_child(trunk, node(Vec3::Y, true))?;
	let left = tree.add_child(collar, node(Vec3::new(-1.0, 1.0, 0.0), false))?;
	tree.add_child(collar, node(Vec3::new(1.0, 1.0, 0.0), false))?;

	// the leafy branch stops being a growth tip, the bare one stays one
	let leaf = Arc::new(Leaf("left"));
	tree.attach_module(left, &leaf)?;

	let mut plant = Plant::new(tree, species, 0.0);
	let mut terminals = Vec::new();
	for tick in 1..=cli.ticks {
		let world_time = tick as f32 * cli.dt;
		terminals = plant.update(world_time)?;
		info!("t = {world_time}: age {}, {} growth tips", plant.age(), terminals.len());
	}

	if cli.rewind {
		terminals = plant.update(0.0)?;
	}

	let root = plant.tree.root();
	plant.tree.assign_rig_indices(root)?;
	println!("{}", plant.tree);
	for id in &terminals {
		if let Some(node) = plant.tree.get_node(*id) {
			println!("tip {id:?} at {}", node.position());
		}
	}
	for (id, frame) in plant.tree.rig_frames(root)? {
		let index = plant.tree.get_node(id).and_then(GrowthNode::rig_index);
		println!("bone {index:?}: at {} along {}", frame.translation, frame.axis());
	}

	Ok(())
}
