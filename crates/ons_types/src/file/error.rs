//! Error types for asset decoding.

use thiserror::Error;

/// Errors that can occur while decoding an asset stream
#[derive(Debug, Error)]
pub enum DecodeError {
	/// The stream ended before a fixed-size field could be read
	#[error("Short read: expected {expected} bytes, got {actual} bytes")]
	ShortRead {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// The bit stream ran dry before the full output was produced
	#[error("Truncated stream: expected {expected} bytes, produced {produced} bytes")]
	Truncated {
		/// Number of bytes the header promised
		expected: usize,
		/// Number of bytes actually produced
		produced: usize,
	},

	/// The caller supplied an output buffer smaller than the decoded size
	#[error("Output buffer too small: need {required} bytes, have {available} bytes")]
	BufferTooSmall {
		/// Number of bytes required
		required: usize,
		/// Number of bytes available
		available: usize,
	},

	/// The bzip2 payload of an NBZ file could not be decompressed
	#[error("bzip2 stream error: {0}")]
	Bzip2(String),

	/// An SPB header declares more pixels than its stream could encode
	#[error("SPB header declares {width}x{height} pixels but the stream holds only {available} bytes")]
	Oversized {
		/// Declared width
		width: u16,
		/// Declared height
		height: u16,
		/// Size of the whole stream
		available: usize,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
