use std::sync::Weak;

/// External geometry anchored at a node.
///
/// Nodes only keep a weak handle to it. They ask it to remove itself when the
/// node is destroyed or when a decay pass retracts it.
pub trait AttachedModule {
	fn destroy_self(&self);
}

/// Notify every module still alive and forget them all. Returns how many were notified.
pub(crate) fn release_all(modules: &mut Vec<Weak<dyn AttachedModule>>) -> usize {
	let mut notified = 0;
	for module in modules.drain(..) {
		if let Some(module) = module.upgrade() {
			module.destroy_self();
			notified += 1;
		}
	}
	notified
}
