//! Multi-cell sprite images used by the layers.
//!
//! A sprite is one image holding `cells` animation frames side by side,
//! each `width / cells` pixels wide.

use image::RgbaImage;
use log::debug;
use ons_vfs::ArchiveReader;

use crate::{
	blend,
	error::SpriteError,
	surface::{Rect, Surface},
};

/// An image split horizontally into animation cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
	surface: Surface,
	cells: i32,
}

impl Sprite {
	/// Wraps a surface. A cell count of 0 is treated as 1.
	pub fn new(surface: Surface, cells: i32) -> Self {
		Self {
			surface,
			cells: cells.max(1),
		}
	}

	/// Decodes an image file (any format `image` understands, BMP included).
	pub fn from_bytes(bytes: &[u8], cells: i32) -> Result<Self, SpriteError> {
		let image: RgbaImage = image::load_from_memory(bytes)?.to_rgba8();
		Ok(Self::new(Surface::from(&image), cells))
	}

	/// Reads and decodes `name` through an asset reader.
	pub fn load(reader: &dyn ArchiveReader, name: &str, cells: i32) -> Result<Self, SpriteError> {
		let bytes = reader
			.read_file(name.as_bytes())
			.filter(|bytes| !bytes.is_empty())
			.ok_or_else(|| SpriteError::NotFound(name.to_string()))?;
		debug!("sprite: {name}: {} bytes from {}", bytes.len(), reader.archive_name());
		Self::from_bytes(&bytes, cells)
	}

	/// Returns the backing image.
	pub fn surface(&self) -> &Surface {
		&self.surface
	}

	/// Returns the number of cells.
	pub fn cells(&self) -> i32 {
		self.cells
	}

	/// Width of one cell.
	pub fn cell_width(&self) -> i32 {
		self.surface.width() / self.cells
	}

	/// Height of one cell.
	pub fn cell_height(&self) -> i32 {
		self.surface.height()
	}

	/// Source rectangle of `cell` (taken modulo the cell count).
	pub fn cell_rect(&self, cell: i32) -> Rect {
		let w = self.cell_width();
		Rect::new(cell.rem_euclid(self.cells) * w, 0, w, self.cell_height())
	}

	/// Alpha-composites `cell` onto `dst` with its top-left corner at
	/// `(x, y)`, touching only pixels inside `clip`.
	pub fn stamp(&self, dst: &mut Surface, cell: i32, x: i32, y: i32, clip: Rect) {
		let src = self.cell_rect(cell);
		let target = Rect::new(x, y, src.w, src.h).intersect(&clip).intersect(&dst.rect());
		if target.is_empty() {
			return;
		}

		for ty in target.y..target.bottom() {
			let sy = src.y + ty - y;
			for tx in target.x..target.right() {
				let sx = src.x + tx - x;
				let (Some(s), Some(d)) = (self.surface.get(sx, sy), dst.get(tx, ty)) else {
					continue;
				};
				dst.put(tx, ty, blend::over(d, s));
			}
		}
	}
}
