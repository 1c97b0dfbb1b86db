//! Reader for files stored directly below the archive search paths.

use std::{
	fs::File,
	io::{Seek, SeekFrom},
	path::PathBuf,
};

use log::{debug, warn};
use ons_types::file::{Compression, CompressionRegistry, KeyTable};

use crate::{
	ArchivePaths,
	archive::{ArchiveReader, Location},
	name, resolve,
};

/// Names shorter than this never get a compression kind or a length
const MIN_NAME_LENGTH: usize = 3;

/// An opened file together with its decode plan
#[derive(Debug)]
pub struct Resolved {
	/// Handle positioned at offset 0
	pub file: File,
	/// On-disk path that was opened
	pub path: PathBuf,
	/// Compression selected from the file extension
	pub compression: Compression,
	/// Logical (decoded) length
	pub length: usize,
}

/// Asset reader over plain files
#[derive(Debug, Clone)]
pub struct DirectReader {
	paths: ArchivePaths,
	key: KeyTable,
	registry: CompressionRegistry,
}

impl Default for DirectReader {
	fn default() -> Self {
		Self::new(ArchivePaths::default(), KeyTable::identity())
	}
}

impl DirectReader {
	/// Creates a reader with the default compression registrations.
	pub fn new(paths: ArchivePaths, key: KeyTable) -> Self {
		Self::with_registry(paths, key, CompressionRegistry::default())
	}

	/// Creates a reader with a custom extension table.
	pub fn with_registry(paths: ArchivePaths, key: KeyTable, registry: CompressionRegistry) -> Self {
		Self {
			paths,
			key,
			registry,
		}
	}

	/// Returns the search paths.
	pub fn paths(&self) -> &ArchivePaths {
		&self.paths
	}

	/// Returns the key table applied to compressed streams.
	pub fn key(&self) -> &KeyTable {
		&self.key
	}

	/// Returns the extension table.
	pub fn registry(&self) -> &CompressionRegistry {
		&self.registry
	}

	fn open_exact(&self, name: &[u8]) -> Option<(File, PathBuf)> {
		let relative = name::to_relative_path(name);
		for root in self.paths.iter() {
			let full = root.join(&relative);
			match File::open(&full) {
				Ok(file) if full.is_file() => {
					debug!("filename: {:?}: found", full.display());
					return Some((file, full));
				}
				_ => debug!("filename: {:?}: not found", full.display()),
			}
		}
		None
	}

	fn open_case_insensitive(&self, name: &[u8]) -> Option<(File, PathBuf)> {
		self.paths.iter().find_map(|root| {
			let full = resolve::case_insensitive(root, name)?;
			if !full.is_file() {
				return None;
			}
			let file = File::open(&full).ok()?;
			debug!("filename: {:?}: found ignoring case", full.display());
			Some((file, full))
		})
	}

	/// Locates and opens `name`.
	///
	/// Every transcoded spelling is tried against every search path before
	/// falling back to the case-insensitive scan. Returns `None` and logs a
	/// warning when nothing matches.
	pub fn resolve(&self, name: &[u8]) -> Option<Resolved> {
		let normalized = name::normalize(name);
		let candidates = name::candidates(&normalized);

		let opened = candidates
			.iter()
			.find_map(|candidate| self.open_exact(candidate))
			.or_else(|| candidates.iter().find_map(|candidate| self.open_case_insensitive(candidate)));

		let Some((mut file, path)) = opened else {
			if candidates.len() > 1 {
				warn!(
					"couldn't access {} even after transcoding the filename",
					String::from_utf8_lossy(&normalized)
				);
			} else {
				warn!("couldn't access {}", String::from_utf8_lossy(&normalized));
			}
			return None;
		};

		if normalized.len() < MIN_NAME_LENGTH {
			return Some(Resolved {
				file,
				path,
				compression: Compression::None,
				length: 0,
			});
		}

		let compression = self.registry.classify(&normalized);
		let length = match compression.decoded_length(&mut file, &self.key) {
			Ok(length) => length,
			Err(e) => {
				warn!("failed to read the {compression} header of {}: {e}", path.display());
				0
			}
		};
		if let Err(e) = file.seek(SeekFrom::Start(0)) {
			warn!("failed to rewind {}: {e}", path.display());
		}

		Some(Resolved {
			file,
			path,
			compression,
			length,
		})
	}

	/// Returns the on-disk path `name` resolves to.
	pub fn locate(&self, name: &[u8]) -> Option<PathBuf> {
		self.resolve(name).map(|resolved| resolved.path)
	}

	fn decode(&self, mut resolved: Resolved, buffer: &mut [u8]) -> usize {
		// a rejected header leaves nothing to decode
		if resolved.compression.is_compressed() && resolved.length == 0 {
			return 0;
		}

		let target = if resolved.compression.is_compressed() {
			buffer
		} else {
			let len = resolved.length.min(buffer.len());
			&mut buffer[..len]
		};

		match resolved.compression.decode_into(&mut resolved.file, &self.key, target) {
			Ok(produced) => produced,
			Err(e) => {
				warn!("failed to decode {}: {e}", resolved.path.display());
				0
			}
		}
	}
}

impl ArchiveReader for DirectReader {
	fn archive_name(&self) -> &str {
		"direct"
	}

	fn num_files(&self) -> usize {
		0
	}

	fn file_length(&self, name: &[u8]) -> usize {
		self.resolve(name).map_or(0, |resolved| resolved.length)
	}

	fn get_file(&self, name: &[u8], buffer: &mut [u8]) -> Option<(usize, Location)> {
		let resolved = self.resolve(name)?;
		Some((self.decode(resolved, buffer), Location::Direct))
	}

	fn read_file(&self, name: &[u8]) -> Option<Vec<u8>> {
		let resolved = self.resolve(name)?;
		let mut buffer = vec![0u8; resolved.length];
		let produced = self.decode(resolved, &mut buffer);
		buffer.truncate(produced);
		Some(buffer)
	}
}
