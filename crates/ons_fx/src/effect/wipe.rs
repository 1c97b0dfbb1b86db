//! Shutter, curtain and scroll wipes.

use super::{
	Direction, scale,
	surfaces::{Role, Surfaces},
};
use crate::surface::Rect;

/// Blits `src` of `from` to `dst` on the accumulation buffer, both clipped
/// to the dirty region.
pub(super) fn draw_effect(surfaces: &mut Surfaces, from: Role, dst: Rect, src: Rect) {
	let bounding_box = surfaces.dirty.bounding_box();
	let Some((clipped, dx, dy)) = dst.clip_to(&bounding_box) else {
		return;
	};
	let src = Rect::new(src.x + dx, src.y + dy, clipped.w, clipped.h);
	surfaces.blit(from, Some(src), Role::Accumulation, clipped.x, clipped.y);
}

fn reveal(surfaces: &mut Surfaces, rect: Rect) {
	draw_effect(surfaces, Role::Destination, rect, rect);
}

/// Uncovers `stripe`-wide bands of the destination, all at once.
pub(super) fn shutter(surfaces: &mut Surfaces, direction: Direction, stripe: i32, counter: i32, duration: i32) {
	let (w, h) = (surfaces.width(), surfaces.height());
	let size = scale(stripe, counter, duration);

	match direction {
		Direction::Left => {
			for i in 0..w / stripe {
				reveal(surfaces, Rect::new(i * stripe, 0, size, h));
			}
		}
		Direction::Right => {
			for i in 1..=w / stripe {
				reveal(surfaces, Rect::new(i * stripe - size - 1, 0, size, h));
			}
		}
		Direction::Top => {
			for i in 0..h / stripe {
				reveal(surfaces, Rect::new(0, i * stripe, w, size));
			}
		}
		Direction::Bottom => {
			for i in 1..=h / stripe {
				reveal(surfaces, Rect::new(0, i * stripe - size - 1, w, size));
			}
		}
	}
}

/// Like [`shutter`], but band `i` starts `stripe² * i / extent` pixels late.
pub(super) fn curtain(surfaces: &mut Surfaces, direction: Direction, stripe: i32, counter: i32, duration: i32) {
	let (w, h) = (surfaces.width(), surfaces.height());
	let size = scale(stripe * 2, counter, duration);
	let extent = match direction {
		Direction::Left | Direction::Right => w,
		Direction::Top | Direction::Bottom => h,
	};
	if extent <= 0 {
		return;
	}

	for i in 0..=extent / stripe {
		let band = size - stripe * stripe * i / extent;
		if band < 0 {
			continue;
		}

		let rect = match direction {
			Direction::Left => Rect::new(i * stripe, 0, band, h),
			Direction::Right => {
				let band = band.min(stripe);
				Rect::new(w - i * stripe - band, 0, band, h)
			}
			Direction::Top => Rect::new(0, i * stripe, w, band),
			Direction::Bottom => Rect::new(0, h - i * stripe - band, w, band),
		};
		reveal(surfaces, rect);
	}
}

/// Pushes the source off-screen while the destination slides in behind it.
pub(super) fn scroll(surfaces: &mut Surfaces, direction: Direction, counter: i32, duration: i32) {
	let (w, h) = (surfaces.width(), surfaces.height());

	match direction {
		Direction::Left => {
			let width = scale(w, counter, duration);
			draw_effect(surfaces, Role::Source, Rect::new(width, 0, w - width, h), Rect::new(0, 0, w - width, h));
			draw_effect(surfaces, Role::Destination, Rect::new(0, 0, width, h), Rect::new(w - width - 1, 0, width, h));
		}
		Direction::Right => {
			let width = scale(w, counter, duration);
			draw_effect(surfaces, Role::Source, Rect::new(0, 0, w - width, h), Rect::new(width, 0, w - width, h));
			draw_effect(surfaces, Role::Destination, Rect::new(w - width - 1, 0, width, h), Rect::new(0, 0, width, h));
		}
		Direction::Top => {
			let height = scale(h, counter, duration);
			draw_effect(surfaces, Role::Source, Rect::new(0, height, w, h - height), Rect::new(0, 0, w, h - height));
			draw_effect(surfaces, Role::Destination, Rect::new(0, 0, w, height), Rect::new(0, h - height - 1, w, height));
		}
		Direction::Bottom => {
			let height = scale(h, counter, duration);
			draw_effect(surfaces, Role::Source, Rect::new(0, 0, w, h - height), Rect::new(0, height, w, h - height));
			draw_effect(surfaces, Role::Destination, Rect::new(0, h - height - 1, w, height), Rect::new(0, 0, w, height));
		}
	}
}
