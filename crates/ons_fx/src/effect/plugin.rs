//! Effects addressed by plugin name: `cascade.dll`, `trvswave.dll` and
//! `whirl.dll`.
//!
//! The effect string is `name/params`. Anything unrecognised cross-fades.

use std::{f64::consts::PI, ops::Range};

use super::{
	Direction, scale,
	surfaces::{Role, Surfaces},
};
use crate::{
	blend::{self, BlendMode},
	surface::{BLACK, Rect, Surface},
};

/// Peak displacement of the travelling wave
const TRVSWAVE_AMPLITUDE: i32 = 9;
/// Wavelength at the start and end of the transition
const TRVSWAVE_WVLEN_START: f64 = 256.0;
/// Wavelength at the midpoint
const TRVSWAVE_WVLEN_END: f64 = 32.0;
/// Radial frequency of the whirl ripple
const WHIRL_OMEGA: f64 = PI / 64.0;

/// How a cascade moves and what it reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CascadeMode {
	/// Direction of travel
	pub direction: Direction,
	/// Cascade the new frame in rather than the old one out
	pub incoming: bool,
	/// Also cascade the old frame out and cross-fade the two
	pub cross: bool,
}

impl CascadeMode {
	/// Parses `[u|d|r|l][i|x]`. Missing or unknown characters default to
	/// left and outgoing.
	pub fn parse(params: &str) -> Self {
		let bytes = params.as_bytes();
		let direction = match bytes.first() {
			Some(b'u') => Direction::Top,
			Some(b'd') => Direction::Bottom,
			Some(b'r') => Direction::Right,
			_ => Direction::Left,
		};
		let (incoming, cross) = match bytes.get(1) {
			Some(b'i') => (true, false),
			Some(b'x') => (true, true),
			_ => (false, false),
		};

		Self {
			direction,
			incoming,
			cross,
		}
	}

	fn horizontal(&self) -> bool {
		matches!(self.direction, Direction::Left | Direction::Right)
	}

	fn forward(&self) -> bool {
		matches!(self.direction, Direction::Right | Direction::Bottom)
	}
}

/// A recognised plugin effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plugin {
	/// Smears lines of one frame across the other
	Cascade(CascadeMode),
	/// Cross-fade with a horizontal travelling wave
	Trvswave,
	/// Cross-fade twisted around the screen centre
	Whirl {
		/// Twist clockwise
		reverse: bool,
	},
}

impl Plugin {
	/// Parses `name/params`, returning `None` for unknown names.
	pub fn parse(image: &str) -> Option<Self> {
		let (name, params) = image.split_once('/').unwrap_or((image, ""));
		match name {
			"cascade.dll" => Some(Plugin::Cascade(CascadeMode::parse(params))),
			"trvswave.dll" => Some(Plugin::Trvswave),
			"whirl.dll" => Some(Plugin::Whirl {
				reverse: params.starts_with('r'),
			}),
			_ => None,
		}
	}
}

/// Constant blend of `a` and `b` into `out` over the dirty region.
pub(super) fn crossfade(surfaces: &mut Surfaces, a: Role, b: Role, out: Role, counter: i32, duration: i32) {
	let clip = surfaces.dirty.bounding_box();
	let value = scale(256, counter, duration).max(0) as u32;
	if let Some((a, b, out)) = surfaces.triple_mut(a, b, out) {
		blend::alpha_blend(a, b, out, BlendMode::Constant, value, clip);
	}
}

fn clamp_range(range: Range<i32>, extent: i32) -> Range<usize> {
	let start = range.start.clamp(0, extent) as usize;
	let end = range.end.clamp(0, extent) as usize;
	start..end.max(start)
}

/// Repeats line `line` of `surface` over `range` on the same surface.
fn smear_within(surface: &mut Surface, line: i32, range: Range<i32>, horizontal: bool) {
	if horizontal {
		if line < 0 || line >= surface.width() {
			return;
		}
		let range = clamp_range(range, surface.width());
		for y in 0..surface.height() {
			let row = surface.row_mut(y);
			let color = row[line as usize];
			row[range.clone()].fill(color);
		}
	} else {
		if line < 0 || line >= surface.height() {
			return;
		}
		let copy = surface.row(line).to_vec();
		for y in clamp_range(range, surface.height()) {
			surface.row_mut(y as i32).copy_from_slice(&copy);
		}
	}
}

/// Repeats line `line` of `src` over `range` of `dst`.
fn smear(src: &Surface, line: i32, dst: &mut Surface, range: Range<i32>, horizontal: bool) {
	let (w, h) = (src.width().min(dst.width()), src.height().min(dst.height()));
	if horizontal {
		if line < 0 || line >= w {
			return;
		}
		let range = clamp_range(range, w);
		for y in 0..h {
			let color = src.row(y)[line as usize];
			dst.row_mut(y)[range.clone()].fill(color);
		}
	} else {
		if line < 0 || line >= h {
			return;
		}
		let from = &src.row(line)[..w as usize];
		for y in clamp_range(range, h) {
			dst.row_mut(y as i32)[..w as usize].copy_from_slice(from);
		}
	}
}

/// One cascade frame. `progress` carries the extent already copied
/// between frames of an incoming cascade.
pub(super) fn cascade(surfaces: &mut Surfaces, mode: CascadeMode, progress: &mut i32, counter: i32, duration: i32) {
	let (w, h) = (surfaces.width(), surfaces.height());
	let horizontal = mode.horizontal();
	let forward = mode.forward();
	let extent = if horizontal { w } else { h };
	let from = if mode.incoming { Role::Destination } else { Role::Source };
	let to = if mode.cross { Role::Tmp } else { Role::Accumulation };

	if counter == 0 {
		*progress = 0;
	}

	let mut width = scale(extent, counter, duration);
	if !mode.incoming {
		width = extent - width;
	}

	if mode.cross && width > 0 {
		let (range, line) = if forward {
			(0..width, width)
		} else {
			(extent - width..extent, extent - width)
		};
		smear_within(surfaces.get_mut(Role::Source), line, range, horizontal);
	}

	let (range, line) = if forward {
		(width..extent, width)
	} else {
		(0..extent - width, extent - width)
	};
	if let Some((src, dst)) = surfaces.pair_mut(from, to) {
		smear(src, line, dst, range, horizontal);
	}

	if mode.incoming && width > 0 {
		let at = if forward { *progress } else { extent - width };
		let len = width - *progress;
		let rect = if horizontal {
			Rect::new(at, 0, len, h)
		} else {
			Rect::new(0, at, w, len)
		};
		surfaces.blit(from, Some(rect), to, rect.x, rect.y);
		*progress = width;
	}

	if mode.cross {
		crossfade(surfaces, Role::Source, Role::Tmp, Role::Accumulation, counter, duration);
	}
}

/// Amplitude and wavelength of the travelling wave at `counter`.
fn trvswave_shape(counter: i32, duration: i32) -> (i32, i32) {
	let phase = if i64::from(counter) * 2 < i64::from(duration) { counter } else { duration - counter };
	let amplitude = scale(TRVSWAVE_AMPLITUDE * 2, phase, duration);
	let step = (1.0 / TRVSWAVE_WVLEN_END - 1.0 / TRVSWAVE_WVLEN_START) * 2.0 * f64::from(phase) / f64::from(duration);
	let wavelength = (1.0 / (step + 1.0 / TRVSWAVE_WVLEN_START)) as i16 as i32;
	(amplitude, wavelength.max(1))
}

/// Cross-fade, then shift every scanline sideways along a sine wave.
pub(super) fn trvswave(surfaces: &mut Surfaces, counter: i32, duration: i32) {
	crossfade(surfaces, Role::Source, Role::Destination, Role::Accumulation, counter, duration);

	let (amplitude, wavelength) = trvswave_shape(counter, duration);
	let (w, h) = (surfaces.width(), surfaces.height());
	let Some((acc, tmp)) = surfaces.pair_mut(Role::Accumulation, Role::Tmp) else {
		return;
	};

	tmp.fill(BLACK);
	let mut y_offset = -h / 2;
	for y in 0..h {
		let angle = PI * 2.0 * f64::from(y_offset) / f64::from(wavelength);
		let x = (f64::from(amplitude) * angle.sin()) as i16 as i32;
		tmp.blit_from(acc, Some(Rect::new(0, y, w, 1)), x, y);
		y_offset += 1;
	}

	surfaces.swap(Role::Accumulation, Role::Tmp);
}

/// Cross-fade into the scratch buffer, then sample it through a polar
/// twist whose angle grows with `counter` and ripples with the radius.
pub(super) fn whirl(surfaces: &mut Surfaces, reverse: bool, counter: i32, duration: i32) {
	crossfade(surfaces, Role::Source, Role::Destination, Role::Tmp, counter, duration);

	let direction = if reverse { -1.0 } else { 1.0 };
	let t = (f64::from(counter) * PI / (f64::from(duration) * 2.0)) as f32;
	let one_minus_cos = (1.0 - f64::from(t).cos()) as f32;
	let rad_amp = (PI * (f64::from(t).sin() - f64::from(one_minus_cos))) as f32;
	let rad_base = (PI * 2.0 * f64::from(one_minus_cos) + f64::from(rad_amp)) as f32;

	let (w, h) = (surfaces.width(), surfaces.height());
	let center_x = (w - 1) / 2;
	let center_y = (h - 1) / 2;
	let Some((tmp, acc)) = surfaces.pair_mut(Role::Tmp, Role::Accumulation) else {
		return;
	};

	for i in 0..h {
		let row = acc.row_mut(i);
		for j in (0..w).step_by(2) {
			let x = (j - center_x) as f32;
			let y = (i - center_y) as f32;
			let mut theta = f64::from(y).atan2(f64::from(x)) as f32;
			let r = (x * x + y * y).sqrt();
			theta = (f64::from(theta)
				+ direction * (f64::from(rad_base) + f64::from(rad_amp) * (f64::from(r) * WHIRL_OMEGA).sin())) as f32;

			let jj = ((f64::from(r) * f64::from(theta).cos() + f64::from(center_x)) as i32).clamp(0, w - 1);
			let ii = ((f64::from(r) * f64::from(theta).sin() + f64::from(center_y)) as i32).clamp(0, h - 1);

			let color = tmp.row(ii)[jj as usize];
			row[j as usize] = color;
			if j + 1 < w {
				row[j as usize + 1] = color;
			}
		}
	}
}
