//! LZSS decompression with a 256-byte sliding window.
//!
//! The stream is a sequence of bit-packed tokens (MSB first, keyed):
//!
//! - `1` + 8 bits: a literal byte.
//! - `0` + 8 bits + 4 bits: a back-reference. The 8-bit field is an absolute
//!   index into the window, the 4-bit field `j` encodes a length of `j + 2`.
//!
//! Every emitted byte is also written to the window at the write cursor,
//! which starts at `WINDOW_SIZE - LOOKAHEAD` and wraps. There is no length
//! header; the caller supplies the original length from the archive index.

use std::io::Read;

use log::warn;

use super::codec::{BitReader, KeyTable};

/// Bits in a back-reference index
pub const INDEX_BITS: u32 = 8;

/// Bits in a back-reference length
pub const LENGTH_BITS: u32 = 4;

/// Matches of this length or shorter are sent as literals
pub const THRESHOLD: usize = 1;

/// Window size in bytes
pub const WINDOW_SIZE: usize = 1 << INDEX_BITS;

/// Lookahead buffer size
pub const LOOKAHEAD: usize = (1 << LENGTH_BITS) + THRESHOLD;

const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Sliding-window dictionary, owned by a single decode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
	window: [u8; WINDOW_SIZE],
	cursor: usize,
}

impl Dictionary {
	/// Creates a zero-filled dictionary with the standard write cursor.
	pub fn new() -> Self {
		Self {
			window: [0; WINDOW_SIZE],
			cursor: WINDOW_SIZE - LOOKAHEAD,
		}
	}

	/// Creates a dictionary whose window starts with `seed` (zero-padded).
	pub fn with_seed(seed: &[u8]) -> Self {
		let mut dictionary = Self::new();
		let len = seed.len().min(WINDOW_SIZE);
		dictionary.window[..len].copy_from_slice(&seed[..len]);
		dictionary
	}

	/// Returns the current write cursor.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	#[inline(always)]
	fn push(&mut self, byte: u8) {
		self.window[self.cursor] = byte;
		self.cursor = (self.cursor + 1) & WINDOW_MASK;
	}

	#[inline(always)]
	fn get(&self, index: usize) -> u8 {
		self.window[index & WINDOW_MASK]
	}
}

impl Default for Dictionary {
	fn default() -> Self {
		Self::new()
	}
}

/// LZSS decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
	dictionary: Dictionary,
}

impl Decoder {
	/// Creates a decoder with a fresh zero-filled dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a decoder over a pre-seeded dictionary.
	pub fn with_dictionary(dictionary: Dictionary) -> Self {
		Self {
			dictionary,
		}
	}

	/// Returns the dictionary state after decoding.
	pub fn dictionary(&self) -> &Dictionary {
		&self.dictionary
	}

	/// Decodes up to `out.len()` bytes and returns the number produced.
	///
	/// A count smaller than `out.len()` means the stream ended early.
	pub fn decode_into<R: Read>(&mut self, reader: R, key: &KeyTable, out: &mut [u8]) -> usize {
		let mut bits = BitReader::new(reader, key);
		let original_length = out.len();
		let mut count = 0;

		while count < original_length {
			let Some(literal) = bits.read_flag() else {
				break;
			};

			if literal {
				let Some(c) = bits.read_bits(8) else {
					break;
				};
				out[count] = c as u8;
				count += 1;
				self.dictionary.push(c as u8);
			} else {
				let Some(index) = bits.read_bits(INDEX_BITS) else {
					break;
				};
				let Some(length) = bits.read_bits(LENGTH_BITS) else {
					break;
				};

				let index = index as usize;
				for k in 0..length as usize + THRESHOLD + 1 {
					if count == original_length {
						break;
					}
					let c = self.dictionary.get(index + k);
					out[count] = c;
					count += 1;
					self.dictionary.push(c);
				}
			}
		}

		if count < original_length {
			warn!("LZSS stream ended after {count} of {original_length} bytes");
		}

		count
	}
}

/// Decodes `original_length` bytes from `reader` with a fresh dictionary.
///
/// The returned buffer is shorter than `original_length` if the stream was
/// truncated.
pub fn decode<R: Read>(reader: R, key: &KeyTable, original_length: usize) -> Vec<u8> {
	let mut out = vec![0u8; original_length];
	let produced = Decoder::new().decode_into(reader, key, &mut out);
	out.truncate(produced);
	out
}
