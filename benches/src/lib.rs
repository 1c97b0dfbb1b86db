//! Benchmark helper utilities for ons-rs
//!
//! Generates synthetic SPB and LZSS streams and test pictures so the
//! benchmarks do not depend on game data.

use ons_fx::Surface;

/// MSB-first bit packer matching the decoders' bit order.
#[derive(Debug, Default)]
pub struct BitWriter {
	bytes: Vec<u8>,
	used: u32,
}

impl BitWriter {
	/// Appends the low `n` bits of `value`, most significant first.
	pub fn put(&mut self, value: u32, n: u32) {
		for i in (0..n).rev() {
			if self.used % 8 == 0 {
				self.bytes.push(0);
			}
			if (value >> i) & 1 != 0 {
				let last = self.bytes.len() - 1;
				self.bytes[last] |= 0x80 >> (self.used % 8);
			}
			self.used += 1;
		}
	}

	/// Returns the packed bytes; the last byte is zero-padded.
	pub fn finish(self) -> Vec<u8> {
		self.bytes
	}
}

/// Generates an unkeyed SPB image exercising repeat, delta and literal
/// groups.
pub fn generate_test_spb(width: u16, height: u16) -> Vec<u8> {
	let mut data = Vec::new();
	data.extend_from_slice(&width.to_be_bytes());
	data.extend_from_slice(&height.to_be_bytes());

	// the planes share one bit stream
	let pixels = width as usize * height as usize;
	let mut w = BitWriter::default();
	for plane in 0..3u32 {
		w.put(plane * 40, 8);
		let mut count = 1;
		let mut group = 0u32;
		while count < pixels {
			match group % 3 {
				// repeat
				0 => w.put(0, 3),
				// 5-bit deltas
				1 => {
					w.put(3, 3);
					for k in 0..4 {
						w.put((group + k) & 0x1F, 5);
					}
				}
				// literals
				_ => {
					w.put(6, 3);
					for k in 0..4 {
						w.put((group * 7 + k * 13) & 0xFF, 8);
					}
				}
			}
			count += 4;
			group += 1;
		}
	}
	data.extend(w.finish());

	data
}

/// Generates an LZSS stream decoding to `length` bytes, mixing literals
/// with back-references into recent output. Returns the stream.
pub fn generate_test_lzss(length: usize) -> Vec<u8> {
	let mut w = BitWriter::default();
	let mut produced = 0;
	let mut cursor = 256 - 17;
	while produced < length {
		if produced % 24 < 8 {
			w.put(1, 1);
			w.put((produced as u32 * 31) & 0xFF, 8);
			produced += 1;
			cursor = (cursor + 1) & 0xFF;
		} else {
			let run = 16;
			w.put(0, 1);
			w.put(((cursor + 256 - 8) & 0xFF) as u32, 8);
			w.put(run - 2, 4);
			produced += run as usize;
			cursor = (cursor + run as usize) & 0xFF;
		}
	}
	w.finish()
}

/// Returns a diagonal gradient picture.
pub fn gradient(width: i32, height: i32) -> Surface {
	let mut surface = Surface::new(width, height);
	for y in 0..height {
		for x in 0..width {
			let v = ((x + y) & 0xFF) as u32;
			surface.put(x, y, 0xFF00_0000 | (v << 16) | ((255 - v) << 8) | (v / 2));
		}
	}
	surface
}

/// Common benchmark sizes
pub mod sizes {
	/// Small asset: 64x64
	pub const TINY: (u16, u16) = (64, 64);
	/// Typical sprite sheet: 256x256
	pub const SMALL: (u16, u16) = (256, 256);
	/// Standard screen: 640x480
	pub const SCREEN: (u16, u16) = (640, 480);
	/// Wide screen: 1280x720
	pub const WIDE: (u16, u16) = (1280, 720);
}

#[cfg(test)]
mod tests {
	use super::*;
	use ons_types::file::{KeyTable, lzss, spb};

	#[test]
	fn test_generated_spb_decodes() {
		let data = generate_test_spb(33, 7);
		let image = spb::File::from_reader(&mut data.as_slice(), &KeyTable::identity()).unwrap();
		assert_eq!(image.header().width(), 33);
		assert_eq!(image.header().height(), 7);
	}

	#[test]
	fn test_generated_lzss_decodes_fully() {
		let data = generate_test_lzss(4096);
		let out = lzss::decode(&data[..], &KeyTable::identity(), 4096);
		assert_eq!(out.len(), 4096);
	}

	#[test]
	fn test_gradient_is_opaque() {
		let surface = gradient(16, 16);
		assert!(surface.pixels().iter().all(|p| p >> 24 == 0xFF));
	}
}
