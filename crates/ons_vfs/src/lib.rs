//! Asset lookup for `ons-rs`.
//!
//! [`DirectReader`] resolves script file names against an ordered set of
//! search paths. Names are raw Shift_JIS bytes: separators are normalised,
//! UTF-8 and EUC-JP spellings are tried when the raw bytes do not exist on
//! disk, and as a last resort each path component is matched ignoring case.
//! Files with a registered extension are decoded on read.
//!
//! ```no_run
//! use ons_vfs::prelude::*;
//!
//! let reader = DirectReader::new(ArchivePaths::parse("data;patch"), KeyTable::identity());
//! if let Some(bitmap) = reader.read_file(b"bg\\title.spb") {
//! 	println!("{} bytes", bitmap.len());
//! }
//! ```

mod archive;
pub mod name;
mod paths;
mod reader;
pub mod resolve;

pub use archive::{ArchiveReader, Location};
pub use paths::{ArchivePaths, PATH_LIST_SEPARATOR};
pub use reader::{DirectReader, Resolved};

/// `use ons_vfs::prelude::*;` to import commonly used items.
pub mod prelude {
	#[doc(inline)]
	pub use crate::{ArchivePaths, ArchiveReader, DirectReader, Location, Resolved};

	#[doc(inline)]
	pub use ons_types::file::{Compression, CompressionRegistry, KeyTable};
}
