//! The five compositing buffers and the dirty region.

use crate::surface::{Rect, Surface};

/// Fixed role of a compositing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
	/// The composed frame shown on screen
	Accumulation = 0,
	/// Snapshot of the frame before the transition
	Source = 1,
	/// The frame the transition ends on
	Destination = 2,
	/// Scratch space
	Tmp = 3,
	/// Last fully refreshed frame
	Backup = 4,
}

/// Bounding box of everything modified since the last flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
	screen: Rect,
	bounding_box: Rect,
}

impl DirtyRect {
	/// Creates an empty region on a `width` x `height` screen.
	pub fn new(width: i32, height: i32) -> Self {
		Self {
			screen: Rect::from_size(width, height),
			bounding_box: Rect::default(),
		}
	}

	/// Returns the bounding box.
	pub fn bounding_box(&self) -> Rect {
		self.bounding_box
	}

	/// Marks the whole screen dirty.
	pub fn fill(&mut self) {
		self.bounding_box = self.screen;
	}

	/// Adds `rect`, clipped to the screen.
	pub fn add(&mut self, rect: Rect) {
		let rect = rect.intersect(&self.screen);
		self.bounding_box = self.bounding_box.union(&rect);
	}

	/// Resets to empty.
	pub fn clear(&mut self) {
		self.bounding_box = Rect::default();
	}

	/// Returns `true` if nothing is dirty.
	pub fn is_empty(&self) -> bool {
		self.bounding_box.is_empty()
	}
}

/// Same-sized buffers addressed by [`Role`]
#[derive(Debug, Clone)]
pub struct Surfaces {
	buffers: [Surface; 5],
	/// Region the current transition may touch
	pub dirty: DirtyRect,
}

impl Surfaces {
	/// Creates five black buffers with an empty dirty region.
	pub fn new(width: i32, height: i32) -> Self {
		Self {
			buffers: std::array::from_fn(|_| Surface::new(width, height)),
			dirty: DirtyRect::new(width, height),
		}
	}

	/// Screen width.
	pub fn width(&self) -> i32 {
		self.buffers[0].width()
	}

	/// Screen height.
	pub fn height(&self) -> i32 {
		self.buffers[0].height()
	}

	/// The full screen rectangle.
	pub fn screen(&self) -> Rect {
		self.buffers[0].rect()
	}

	/// Returns a buffer.
	pub fn get(&self, role: Role) -> &Surface {
		&self.buffers[role as usize]
	}

	/// Returns a buffer mutably.
	pub fn get_mut(&mut self, role: Role) -> &mut Surface {
		&mut self.buffers[role as usize]
	}

	/// Borrows one buffer for reading and another for writing.
	///
	/// Returns `None` if both roles are the same.
	pub fn pair_mut(&mut self, read: Role, write: Role) -> Option<(&Surface, &mut Surface)> {
		let [r, w] = self.buffers.get_disjoint_mut([read as usize, write as usize]).ok()?;
		Some((&*r, w))
	}

	/// Borrows two buffers for reading and a third for writing.
	///
	/// Returns `None` unless all three roles differ.
	pub fn triple_mut(&mut self, a: Role, b: Role, write: Role) -> Option<(&Surface, &Surface, &mut Surface)> {
		let [a, b, w] = self.buffers.get_disjoint_mut([a as usize, b as usize, write as usize]).ok()?;
		Some((&*a, &*b, w))
	}

	/// Copies `src_rect` of `from` (all of it when `None`) to `(x, y)` on `to`.
	pub fn blit(&mut self, from: Role, src_rect: Option<Rect>, to: Role, x: i32, y: i32) {
		if from == to {
			let copy = self.get(from).clone();
			self.get_mut(to).blit_from(&copy, src_rect, x, y);
			return;
		}
		if let Some((src, dst)) = self.pair_mut(from, to) {
			dst.blit_from(src, src_rect, x, y);
		}
	}

	/// Exchanges the contents of two buffers.
	pub fn swap(&mut self, a: Role, b: Role) {
		self.buffers.swap(a as usize, b as usize);
	}
}
