//! Block-resolution reduction.

use crate::surface::Surface;

/// Largest block edge, used at level 0
pub const MOSAIC_BASE: i32 = 160;

/// Returns the block edge for `level`; each level halves it.
pub fn block_size(level: i32) -> i32 {
	(MOSAIC_BASE >> level.clamp(0, 31)).max(1)
}

/// Paints `dst` with `src` sampled once per block.
///
/// Blocks are anchored at the bottom-left corner: each takes the colour of
/// its bottom-left pixel and extends upward, so a partial row of blocks
/// lands at the top of the screen.
pub fn generate(src: &Surface, dst: &mut Surface, level: i32) {
	let block = block_size(level);
	let (w, h) = (dst.width().min(src.width()), dst.height().min(src.height()));

	let mut i = h - 1;
	while i >= 0 {
		let height = if i + 1 - block < 0 { i + 1 } else { block };
		let mut j = 0;
		while j < w {
			let width = block.min(w - j);
			let Some(color) = src.get(j, i) else {
				break;
			};
			for row in i + 1 - height..=i {
				dst.row_mut(row)[j as usize..(j + width) as usize].fill(color);
			}
			j += block;
		}
		i -= block;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn gradient(w: i32, h: i32) -> Surface {
		let pixels = (0..w * h).map(|i| 0xFF00_0000 | i as u32).collect();
		Surface::from_pixels(w, h, pixels).unwrap()
	}

	#[test]
	fn test_block_sizes() {
		assert_eq!(block_size(0), 160);
		assert_eq!(block_size(5), 5);
		assert_eq!(block_size(8), 1);
		assert_eq!(block_size(-3), 160);
	}

	#[test]
	fn test_level_with_unit_blocks_is_a_copy() {
		let src = gradient(7, 5);
		let mut dst = Surface::new(7, 5);
		generate(&src, &mut dst, 8);
		assert_eq!(dst, src);
	}

	#[test]
	fn test_blocks_anchor_bottom_left() {
		let src = gradient(7, 7);
		let mut dst = Surface::new(7, 7);
		// 160 >> 5 = 5
		generate(&src, &mut dst, 5);

		// bottom block rows 2..=6 sample (0, 6) and (5, 6)
		assert_eq!(dst.get(0, 2), src.get(0, 6));
		assert_eq!(dst.get(4, 6), src.get(0, 6));
		assert_eq!(dst.get(6, 6), src.get(5, 6));
		// the two remaining rows at the top sample row 1
		assert_eq!(dst.get(3, 0), src.get(0, 1));
		assert_eq!(dst.get(6, 1), src.get(5, 1));
	}
}
