//! Byte and bit level readers shared by every decoder.
//!
//! All multi-byte values are big-endian. Every byte read from a stream is
//! passed through a [`KeyTable`], a 256-entry substitution cipher used by
//! some games to obfuscate their assets. Files without a key use the
//! identity table.

use std::{
	fmt,
	io::{self, Read, Write},
};

use super::DecodeError;

/// Size of the read-ahead window used by [`BitReader`]
pub const READ_LENGTH: usize = 4096;

/// 256-entry byte substitution table
#[derive(Clone, PartialEq, Eq)]
pub struct KeyTable {
	table: [u8; 256],
	keyed: bool,
}

impl KeyTable {
	/// Creates the identity table (no obfuscation).
	pub fn identity() -> Self {
		let mut table = [0u8; 256];
		for (i, entry) in table.iter_mut().enumerate() {
			*entry = i as u8;
		}

		Self {
			table,
			keyed: false,
		}
	}

	/// Creates a keyed table from a full substitution map.
	pub fn new(table: [u8; 256]) -> Self {
		Self {
			table,
			keyed: true,
		}
	}

	/// Parses a keyed table from the first 256 bytes of `data`.
	pub fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
		if data.len() < 256 {
			return Err(DecodeError::ShortRead {
				expected: 256,
				actual: data.len(),
			});
		}

		let mut table = [0u8; 256];
		table.copy_from_slice(&data[..256]);
		Ok(Self::new(table))
	}

	/// Returns `true` if this table was supplied by the caller rather than
	/// being the identity table.
	pub fn is_keyed(&self) -> bool {
		self.keyed
	}

	/// Transforms one raw byte.
	#[inline(always)]
	pub fn decode(&self, byte: u8) -> u8 {
		self.table[byte as usize]
	}
}

impl Default for KeyTable {
	fn default() -> Self {
		Self::identity()
	}
}

impl fmt::Debug for KeyTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyTable").field("keyed", &self.keyed).finish_non_exhaustive()
	}
}

/// Fills `N` bytes from `reader`, reporting how many arrived on a short read.
fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N], DecodeError> {
	let mut buf = [0u8; N];
	let mut filled = 0;

	while filled < N {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => {
				return Err(DecodeError::ShortRead {
					expected: N,
					actual: filled,
				});
			}
			Ok(n) => filled += n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
			Err(e) => return Err(e.into()),
		}
	}

	Ok(buf)
}

/// Reads one keyed byte.
pub fn read_u8<R: Read>(reader: &mut R, key: &KeyTable) -> Result<u8, DecodeError> {
	let [b0] = read_array::<1, _>(reader)?;
	Ok(key.decode(b0))
}

/// Reads a keyed big-endian `u16`.
pub fn read_u16<R: Read>(reader: &mut R, key: &KeyTable) -> Result<u16, DecodeError> {
	let [b0, b1] = read_array::<2, _>(reader)?;
	Ok(u16::from_be_bytes([key.decode(b0), key.decode(b1)]))
}

/// Reads a keyed big-endian `u32`.
pub fn read_u32<R: Read>(reader: &mut R, key: &KeyTable) -> Result<u32, DecodeError> {
	let [b0, b1, b2, b3] = read_array::<4, _>(reader)?;
	Ok(u32::from_be_bytes([key.decode(b0), key.decode(b1), key.decode(b2), key.decode(b3)]))
}

/// Writes one byte. Writers never apply a key table.
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
	writer.write_all(&[value])
}

/// Writes a big-endian `u16`.
pub fn write_u16<W: Write>(writer: &mut W, value: u16) -> io::Result<()> {
	writer.write_all(&value.to_be_bytes())
}

/// Writes a big-endian `u32`.
pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
	writer.write_all(&value.to_be_bytes())
}

/// MSB-first bit reader over a buffered, keyed byte stream.
///
/// One `BitReader` is created per decode call, so the shift register and
/// read-ahead cursor never leak from one call into the next.
pub struct BitReader<'k, R> {
	reader: R,
	key: &'k KeyTable,
	buffer: Box<[u8; READ_LENGTH]>,
	buffer_len: usize,
	buffer_pos: usize,
	current: u8,
	mask: u8,
	exhausted: bool,
}

impl<'k, R: Read> BitReader<'k, R> {
	/// Creates a reader positioned at the current offset of `reader`.
	pub fn new(reader: R, key: &'k KeyTable) -> Self {
		Self {
			reader,
			key,
			buffer: Box::new([0u8; READ_LENGTH]),
			buffer_len: 0,
			buffer_pos: 0,
			current: 0,
			mask: 0,
			exhausted: false,
		}
	}

	/// Returns `true` once the underlying stream has run dry.
	pub fn is_exhausted(&self) -> bool {
		self.exhausted
	}

	fn refill(&mut self) -> bool {
		loop {
			match self.reader.read(&mut self.buffer[..]) {
				Ok(0) => {
					self.exhausted = true;
					return false;
				}
				Ok(n) => {
					self.buffer_len = n;
					self.buffer_pos = 0;
					return true;
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
				Err(e) => {
					log::warn!("bit stream read failed: {e}");
					self.exhausted = true;
					return false;
				}
			}
		}
	}

	/// Reads `n` bits (at most 32) and assembles them MSB-first.
	///
	/// Returns `None` when the stream is exhausted before all `n` bits were
	/// available.
	pub fn read_bits(&mut self, n: u32) -> Option<u32> {
		debug_assert!(n <= 32);
		let mut value = 0u32;

		for _ in 0..n {
			if self.mask == 0 {
				if self.buffer_pos == self.buffer_len && !self.refill() {
					return None;
				}
				self.current = self.key.decode(self.buffer[self.buffer_pos]);
				self.buffer_pos += 1;
				self.mask = 0x80;
			}

			value <<= 1;
			if self.current & self.mask != 0 {
				value |= 1;
			}
			self.mask >>= 1;
		}

		Some(value)
	}

	/// Reads a single bit as a flag.
	#[inline]
	pub fn read_flag(&mut self) -> Option<bool> {
		self.read_bits(1).map(|bit| bit != 0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn xor_key() -> KeyTable {
		let mut table = [0u8; 256];
		for (i, entry) in table.iter_mut().enumerate() {
			*entry = (i as u8) ^ 0x84;
		}
		KeyTable::new(table)
	}

	#[test]
	fn test_big_endian_reads() {
		let key = KeyTable::identity();
		let mut cursor = Cursor::new(vec![0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE]);
		assert_eq!(read_u8(&mut cursor, &key).unwrap(), 0x12);
		assert_eq!(read_u16(&mut cursor, &key).unwrap(), 0x3456);
		assert!(read_u32(&mut cursor, &key).is_err());
	}

	#[test]
	fn test_keyed_reads() {
		let key = xor_key();
		let mut cursor = Cursor::new(vec![0x84 ^ 0x01, 0x84 ^ 0x02, 0x84 ^ 0x03, 0x84 ^ 0x04]);
		assert_eq!(read_u32(&mut cursor, &key).unwrap(), 0x0102_0304);
		assert!(key.is_keyed());
		assert!(!KeyTable::default().is_keyed());
	}

	#[test]
	fn test_short_read_reports_count() {
		let key = KeyTable::identity();
		let mut cursor = Cursor::new(vec![0xAA]);
		match read_u16(&mut cursor, &key) {
			Err(DecodeError::ShortRead {
				expected,
				actual,
			}) => {
				assert_eq!(expected, 2);
				assert_eq!(actual, 1);
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn test_writers_match_readers() {
		let mut out = Vec::new();
		write_u8(&mut out, 7).unwrap();
		write_u16(&mut out, 0xBEEF).unwrap();
		write_u32(&mut out, 0xDEAD_BEEF).unwrap();
		assert_eq!(out, vec![7, 0xBE, 0xEF, 0xDE, 0xAD, 0xBE, 0xEF]);
	}

	#[test]
	fn test_bits_msb_first() {
		let key = KeyTable::identity();
		let data = [0b1011_0010u8, 0b0111_1111];
		let mut bits = BitReader::new(&data[..], &key);
		assert_eq!(bits.read_bits(1), Some(1));
		assert_eq!(bits.read_bits(3), Some(0b011));
		assert_eq!(bits.read_bits(8), Some(0b0010_0111));
		assert_eq!(bits.read_bits(4), Some(0b1111));
		assert_eq!(bits.read_bits(1), None);
		assert!(bits.is_exhausted());
	}

	#[test]
	fn test_bits_apply_key_table() {
		let key = xor_key();
		let data = [0xFFu8 ^ 0x84];
		let mut bits = BitReader::new(&data[..], &key);
		assert_eq!(bits.read_bits(8), Some(0xFF));
	}

	#[test]
	fn test_bits_cross_read_ahead_boundary() {
		let key = KeyTable::identity();
		let mut data = vec![0u8; READ_LENGTH + 2];
		data[READ_LENGTH - 1] = 0x01;
		data[READ_LENGTH] = 0x80;
		let mut bits = BitReader::new(Cursor::new(data), &key);
		for _ in 0..READ_LENGTH - 1 {
			assert_eq!(bits.read_bits(8), Some(0));
		}
		assert_eq!(bits.read_bits(16), Some(0x0180));
	}

	#[test]
	fn test_zero_bits_reads_nothing() {
		let key = KeyTable::identity();
		let mut bits = BitReader::new(&[][..], &key);
		assert_eq!(bits.read_bits(0), Some(0));
		assert_eq!(bits.read_flag(), None);
	}
}
