//! Ordered archive search paths.

use std::{
	fmt::Display,
	path::{Path, PathBuf},
};

/// Separator between entries in an archive path string
pub const PATH_LIST_SEPARATOR: char = ';';

/// Ordered list of directories searched for assets; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
	paths: Vec<PathBuf>,
}

impl Default for ArchivePaths {
	/// The current directory only.
	fn default() -> Self {
		Self {
			paths: vec![PathBuf::from(".")],
		}
	}
}

impl ArchivePaths {
	/// Creates a path set from directories in search order.
	///
	/// An empty iterator yields the current directory.
	pub fn new<I, P>(paths: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
		if paths.is_empty() {
			return Self::default();
		}

		Self {
			paths,
		}
	}

	/// Parses a `;`-separated list such as `"data;patch"`.
	///
	/// Empty segments are skipped.
	pub fn parse(list: &str) -> Self {
		Self::new(list.split(PATH_LIST_SEPARATOR).map(str::trim).filter(|s| !s.is_empty()))
	}

	/// Returns the number of search paths.
	pub fn len(&self) -> usize {
		self.paths.len()
	}

	/// Always `false`; a path set contains at least the current directory.
	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	/// Returns the path at `index`.
	pub fn get(&self, index: usize) -> Option<&Path> {
		self.paths.get(index).map(PathBuf::as_path)
	}

	/// Iterates the paths in search order.
	pub fn iter(&self) -> impl Iterator<Item = &Path> {
		self.paths.iter().map(PathBuf::as_path)
	}
}

impl Display for ArchivePaths {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (i, path) in self.paths.iter().enumerate() {
			if i > 0 {
				write!(f, "{PATH_LIST_SEPARATOR}")?;
			}
			write!(f, "{}", path.display())?;
		}
		Ok(())
	}
}
