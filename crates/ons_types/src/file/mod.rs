//! Asset decoders for files stored directly on disk.

mod error;

pub mod bmp;
pub mod codec;
pub mod compression;
pub mod lzss;
pub mod nbz;
pub mod spb;

// Re-export unified error type
pub use error::DecodeError;

// Re-export main file types
pub use bmp::BitmapHeader;
pub use codec::{BitReader, KeyTable, READ_LENGTH};
pub use compression::{Compression, CompressionRegistry, CompressionRegistryBuilder};
pub use lzss::{Decoder as LzssDecoder, Dictionary as LzssDictionary};
pub use spb::{File as SpbFile, Header as SpbHeader};
