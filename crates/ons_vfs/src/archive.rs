//! Common interface of asset sources.

use std::fmt::Display;

/// Where a file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
	/// A plain file below one of the search paths
	Direct,

	/// A member of a packed archive
	Archive,
}

impl Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Location::Direct => write!(f, "direct"),
			Location::Archive => write!(f, "archive"),
		}
	}
}

/// A source of named assets.
///
/// Names are raw script bytes (usually Shift_JIS). Lookups that fail return
/// `0` or `None` after logging a diagnostic; a missing asset is for the
/// caller to judge.
pub trait ArchiveReader {
	/// Short identifier of the backend.
	fn archive_name(&self) -> &str;

	/// Number of indexed entries. Backends without an index report `0`.
	fn num_files(&self) -> usize;

	/// Returns the logical (decoded) length of `name`, or `0` if not found.
	fn file_length(&self, name: &[u8]) -> usize;

	/// Materialises `name` into `buffer`.
	///
	/// Returns the number of bytes written and where the file came from, or
	/// `None` if it could not be found. A count smaller than
	/// [`file_length`](Self::file_length) means the content was truncated.
	fn get_file(&self, name: &[u8], buffer: &mut [u8]) -> Option<(usize, Location)>;

	/// Reads `name` into a new buffer sized by [`file_length`](Self::file_length).
	fn read_file(&self, name: &[u8]) -> Option<Vec<u8>> {
		let mut buffer = vec![0u8; self.file_length(name)];
		let (produced, _) = self.get_file(name, &mut buffer)?;
		buffer.truncate(produced);
		Some(buffer)
	}
}
