//! Pixel buffers and rectangles.
//!
//! Pixels are packed `0xAARRGGBB`. Rectangles use signed coordinates so that
//! effects can describe regions partially off-screen; every drawing routine
//! clips before touching memory.

use image::RgbaImage;

/// Opaque black
pub const BLACK: u32 = 0xFF00_0000;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
	/// Left edge
	pub x: i32,
	/// Top edge
	pub y: i32,
	/// Width, empty when `<= 0`
	pub w: i32,
	/// Height, empty when `<= 0`
	pub h: i32,
}

impl Rect {
	/// Creates a rectangle.
	pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
		Self {
			x,
			y,
			w,
			h,
		}
	}

	/// Creates a rectangle at the origin.
	pub const fn from_size(w: i32, h: i32) -> Self {
		Self::new(0, 0, w, h)
	}

	/// Returns `true` if the rectangle covers no pixels.
	pub fn is_empty(&self) -> bool {
		self.w <= 0 || self.h <= 0
	}

	/// Exclusive right edge.
	pub fn right(&self) -> i32 {
		self.x + self.w
	}

	/// Exclusive bottom edge.
	pub fn bottom(&self) -> i32 {
		self.y + self.h
	}

	/// Clips `self` against `clip`.
	///
	/// Returns the clipped rectangle and how far its origin moved, or `None`
	/// when the two do not overlap.
	pub fn clip_to(&self, clip: &Rect) -> Option<(Rect, i32, i32)> {
		if self.x >= clip.right() || self.right() <= clip.x || self.y >= clip.bottom() || self.bottom() <= clip.y {
			return None;
		}

		let mut r = *self;
		let mut dx = 0;
		let mut dy = 0;

		if r.x < clip.x {
			dx = clip.x - r.x;
			r.w -= dx;
			r.x = clip.x;
		}
		if clip.right() < r.right() {
			r.w = clip.right() - r.x;
		}
		if r.y < clip.y {
			dy = clip.y - r.y;
			r.h -= dy;
			r.y = clip.y;
		}
		if clip.bottom() < r.bottom() {
			r.h = clip.bottom() - r.y;
		}

		Some((r, dx, dy))
	}

	/// Returns the overlap of two rectangles, which may be empty.
	pub fn intersect(&self, other: &Rect) -> Rect {
		let x = self.x.max(other.x);
		let y = self.y.max(other.y);
		let right = self.right().min(other.right());
		let bottom = self.bottom().min(other.bottom());
		Rect::new(x, y, (right - x).max(0), (bottom - y).max(0))
	}

	/// Returns the bounding box of two rectangles; empty inputs are ignored.
	pub fn union(&self, other: &Rect) -> Rect {
		if self.is_empty() {
			return *other;
		}
		if other.is_empty() {
			return *self;
		}
		let x = self.x.min(other.x);
		let y = self.y.min(other.y);
		Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
	}
}

/// A 32-bit ARGB pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
	width: i32,
	height: i32,
	pixels: Vec<u32>,
}

impl std::fmt::Debug for Surface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Surface").field("width", &self.width).field("height", &self.height).finish_non_exhaustive()
	}
}

impl Surface {
	/// Creates an opaque black surface. Negative sizes are treated as zero.
	pub fn new(width: i32, height: i32) -> Self {
		Self::filled(width, height, BLACK)
	}

	/// Creates a surface filled with `color`.
	pub fn filled(width: i32, height: i32, color: u32) -> Self {
		let width = width.max(0);
		let height = height.max(0);
		Self {
			width,
			height,
			pixels: vec![color; width as usize * height as usize],
		}
	}

	/// Wraps existing pixels, or returns `None` if the length does not match.
	pub fn from_pixels(width: i32, height: i32, pixels: Vec<u32>) -> Option<Self> {
		if width < 0 || height < 0 || pixels.len() != width as usize * height as usize {
			return None;
		}
		Some(Self {
			width,
			height,
			pixels,
		})
	}

	/// Returns the width in pixels.
	pub fn width(&self) -> i32 {
		self.width
	}

	/// Returns the height in pixels.
	pub fn height(&self) -> i32 {
		self.height
	}

	/// Returns the full-surface rectangle.
	pub fn rect(&self) -> Rect {
		Rect::from_size(self.width, self.height)
	}

	/// Returns all pixels, row-major.
	pub fn pixels(&self) -> &[u32] {
		&self.pixels
	}

	/// Returns all pixels mutably, row-major.
	pub fn pixels_mut(&mut self) -> &mut [u32] {
		&mut self.pixels
	}

	#[inline]
	fn index(&self, x: i32, y: i32) -> usize {
		y as usize * self.width as usize + x as usize
	}

	/// Returns the pixel at `(x, y)`, or `None` outside the surface.
	#[inline]
	pub fn get(&self, x: i32, y: i32) -> Option<u32> {
		if x < 0 || y < 0 || x >= self.width || y >= self.height {
			return None;
		}
		Some(self.pixels[self.index(x, y)])
	}

	/// Writes the pixel at `(x, y)`; writes outside the surface are ignored.
	#[inline]
	pub fn put(&mut self, x: i32, y: i32, color: u32) {
		if x < 0 || y < 0 || x >= self.width || y >= self.height {
			return;
		}
		let index = self.index(x, y);
		self.pixels[index] = color;
	}

	/// Returns row `y`.
	pub fn row(&self, y: i32) -> &[u32] {
		let start = self.index(0, y);
		&self.pixels[start..start + self.width as usize]
	}

	/// Returns row `y` mutably.
	pub fn row_mut(&mut self, y: i32) -> &mut [u32] {
		let start = self.index(0, y);
		let width = self.width as usize;
		&mut self.pixels[start..start + width]
	}

	/// Fills the whole surface.
	pub fn fill(&mut self, color: u32) {
		self.pixels.fill(color);
	}

	/// Fills the part of `rect` that lies on the surface.
	pub fn fill_rect(&mut self, rect: Rect, color: u32) {
		let r = rect.intersect(&self.rect());
		for y in r.y..r.bottom() {
			self.row_mut(y)[r.x as usize..r.right() as usize].fill(color);
		}
	}

	/// Copies `src_rect` of `src` (the whole of `src` when `None`) so that its
	/// origin lands on `(dst_x, dst_y)`.
	///
	/// The source rectangle is clipped to `src` first, then the destination
	/// is clipped to `self`, each adjustment shifting the other side.
	pub fn blit_from(&mut self, src: &Surface, src_rect: Option<Rect>, dst_x: i32, dst_y: i32) {
		let mut sr = src_rect.unwrap_or_else(|| src.rect());
		let mut dx = dst_x;
		let mut dy = dst_y;

		if sr.x < 0 {
			dx -= sr.x;
			sr.w += sr.x;
			sr.x = 0;
		}
		if sr.y < 0 {
			dy -= sr.y;
			sr.h += sr.y;
			sr.y = 0;
		}
		sr.w = sr.w.min(src.width - sr.x);
		sr.h = sr.h.min(src.height - sr.y);

		if dx < 0 {
			sr.x -= dx;
			sr.w += dx;
			dx = 0;
		}
		if dy < 0 {
			sr.y -= dy;
			sr.h += dy;
			dy = 0;
		}
		sr.w = sr.w.min(self.width - dx);
		sr.h = sr.h.min(self.height - dy);

		if sr.is_empty() {
			return;
		}

		let w = sr.w as usize;
		for row in 0..sr.h {
			let from = &src.row(sr.y + row)[sr.x as usize..sr.x as usize + w];
			self.row_mut(dy + row)[dx as usize..dx as usize + w].copy_from_slice(from);
		}
	}

	/// Copies `rect` from `src` to the same position on `self`.
	pub fn copy_rect(&mut self, src: &Surface, rect: Rect) {
		self.blit_from(src, Some(rect), rect.x, rect.y);
	}

	/// Converts to an RGBA image.
	pub fn to_rgba_image(&self) -> RgbaImage {
		RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
			let [a, r, g, b] = self.pixels[self.index(x as i32, y as i32)].to_be_bytes();
			image::Rgba([r, g, b, a])
		})
	}
}

impl From<&RgbaImage> for Surface {
	fn from(image: &RgbaImage) -> Self {
		let pixels = image.pixels().map(|p| u32::from_be_bytes([p[3], p[0], p[1], p[2]])).collect();
		Self {
			width: image.width() as i32,
			height: image.height() as i32,
			pixels,
		}
	}
}
