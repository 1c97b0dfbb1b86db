//! Prelude module for `ons_types`.
//!
//! ```no_run
//! use ons_types::prelude::*;
//!
//! let registry = CompressionRegistry::default();
//! assert_eq!(registry.classify(b"bg.spb"), Compression::Spb);
//! ```

#[doc(inline)]
pub use crate::file::{
	BitReader, BitmapHeader, Compression, CompressionRegistry, DecodeError, KeyTable, LzssDecoder,
	LzssDictionary, SpbFile, SpbHeader,
};

// Decoder modules
#[doc(inline)]
pub use crate::file::{lzss, nbz, spb};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
