//! Case-insensitive path reconstruction.
//!
//! Rebuilds a relative name one component at a time, replacing each
//! component with the on-disk spelling found in the directory listing.
//! Directory listings come back in no particular order, so when several
//! entries match a component ignoring ASCII case, the exact spelling is
//! preferred and the lowest byte-ordered spelling wins otherwise.

use std::{
	fs,
	path::{Path, PathBuf},
};

use log::trace;

use crate::name::{bytes_to_os, components, os_to_bytes};

/// Picks the on-disk spelling of `component` inside `dir`.
fn match_component(dir: &Path, component: &[u8]) -> Option<Vec<u8>> {
	let entries = fs::read_dir(dir).ok()?;
	let mut best: Option<Vec<u8>> = None;

	for entry in entries.flatten() {
		let name = os_to_bytes(&entry.file_name());
		if !name.eq_ignore_ascii_case(component) {
			continue;
		}
		if name == component {
			return Some(name);
		}
		if best.as_ref().is_none_or(|current| name < *current) {
			best = Some(name);
		}
	}

	best
}

/// Resolves `name` below `root` ignoring ASCII case in every component.
///
/// Returns the path with on-disk casing, or `None` if any component has no
/// match. The filesystem is only read.
pub fn case_insensitive(root: &Path, name: &[u8]) -> Option<PathBuf> {
	let mut path = root.to_path_buf();
	let mut any = false;

	for component in components(name) {
		let Some(found) = match_component(&path, component) else {
			trace!("no case-insensitive match for {:?} in {}", String::from_utf8_lossy(component), path.display());
			return None;
		};
		path.push(bytes_to_os(&found));
		any = true;
	}

	any.then_some(path)
}
