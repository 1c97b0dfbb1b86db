//! `.NBZ` support: a big-endian `u32` original length followed by a bzip2 stream.
//!
//! Only the length prefix goes through the key table. The bzip2 payload is
//! read raw, so a keyed archive cannot carry NBZ files; this is reported as a
//! warning and decoding proceeds anyway.

use std::io::{self, Read, Seek, SeekFrom, Write};

use bzip2::{Compression, read::BzDecoder, write::BzEncoder};
use log::warn;

use super::{DecodeError, codec, codec::KeyTable};

/// Size of the length prefix in bytes
pub const HEADER_SIZE: usize = 4;

fn warn_if_keyed(key: &KeyTable) {
	if key.is_keyed() {
		warn!("may not decode NBZ with key table enabled");
	}
}

/// Reads the decoded length from the prefix at offset 0, restoring the
/// stream position afterwards.
pub fn original_length<R: Read + Seek>(reader: &mut R, key: &KeyTable) -> Result<usize, DecodeError> {
	let position = reader.stream_position()?;
	reader.seek(SeekFrom::Start(0))?;
	let length = codec::read_u32(reader, key);
	reader.seek(SeekFrom::Start(position))?;
	Ok(length? as usize)
}

fn inflate<R: Read>(reader: R, original_length: usize, out: &mut [u8]) -> Result<usize, DecodeError> {
	let target = original_length.min(out.len());
	let mut decoder = BzDecoder::new(reader);
	let mut count = 0;

	while count < target {
		match decoder.read(&mut out[count..target]) {
			Ok(0) => break,
			Ok(n) => count += n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
			Err(e) if count == 0 => return Err(DecodeError::Bzip2(e.to_string())),
			Err(e) => {
				warn!("NBZ stream failed after {count} bytes: {e}");
				break;
			}
		}
	}

	if count < original_length {
		warn!("NBZ stream produced {count} of {original_length} bytes");
	}

	Ok(count)
}

/// Decodes an NBZ stream into `out` and returns the number of bytes produced.
///
/// At most `min(original_length, out.len())` bytes are written. A bzip2
/// stream that ends early yields a short count; a stream that cannot be
/// decompressed at all is an error.
pub fn decode_into<R: Read>(reader: &mut R, key: &KeyTable, out: &mut [u8]) -> Result<usize, DecodeError> {
	warn_if_keyed(key);
	let original_length = codec::read_u32(reader, key)? as usize;
	inflate(reader, original_length, out)
}

/// Decodes a complete NBZ stream.
pub fn decode<R: Read>(reader: &mut R, key: &KeyTable) -> Result<Vec<u8>, DecodeError> {
	warn_if_keyed(key);
	let original_length = codec::read_u32(reader, key)? as usize;
	let mut out = vec![0u8; original_length];
	let produced = inflate(reader, original_length, &mut out)?;
	out.truncate(produced);
	Ok(out)
}

/// Writes `data` as an NBZ stream (block size 9) and returns the number of
/// bytes written.
pub fn encode<W: Write>(writer: &mut W, data: &[u8]) -> Result<usize, DecodeError> {
	codec::write_u32(writer, data.len() as u32)?;

	let mut encoder = BzEncoder::new(Vec::new(), Compression::best());
	encoder.write_all(data)?;
	let payload = encoder.finish()?;
	writer.write_all(&payload)?;

	Ok(HEADER_SIZE + payload.len())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn sample() -> Vec<u8> {
		(0..5000u32).map(|i| (i % 251) as u8).collect()
	}

	#[test]
	fn test_encode_then_decode() {
		let data = sample();
		let mut nbz = Vec::new();
		let written = encode(&mut nbz, &data).unwrap();
		assert_eq!(written, nbz.len());
		assert_eq!(&nbz[..4], &5000u32.to_be_bytes());

		let decoded = decode(&mut Cursor::new(nbz), &KeyTable::identity()).unwrap();
		assert_eq!(decoded, data);
	}

	#[test]
	fn test_original_length_restores_position() {
		let mut nbz = Vec::new();
		encode(&mut nbz, &sample()).unwrap();
		let mut cursor = Cursor::new(nbz);
		cursor.set_position(7);
		assert_eq!(original_length(&mut cursor, &KeyTable::identity()).unwrap(), 5000);
		assert_eq!(cursor.position(), 7);
	}

	#[test_log::test]
	fn test_decode_into_small_buffer() {
		let data = sample();
		let mut nbz = Vec::new();
		encode(&mut nbz, &data).unwrap();
		let mut out = vec![0u8; 100];
		let produced = decode_into(&mut Cursor::new(nbz), &KeyTable::identity(), &mut out).unwrap();
		assert_eq!(produced, 100);
		assert_eq!(out, data[..100]);
	}

	#[test]
	fn test_garbage_payload_is_an_error() {
		let mut nbz = Vec::new();
		codec::write_u32(&mut nbz, 16).unwrap();
		nbz.extend_from_slice(b"definitely not bzip2");
		let result = decode(&mut Cursor::new(nbz), &KeyTable::identity());
		assert!(matches!(result, Err(DecodeError::Bzip2(_))));
	}

	#[test]
	fn test_missing_prefix_is_short_read() {
		let result = decode(&mut Cursor::new(vec![0u8, 1]), &KeyTable::identity());
		assert!(matches!(result, Err(DecodeError::ShortRead { .. })));
	}
}
