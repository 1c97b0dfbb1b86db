//! Per-channel pixel arithmetic and the alpha blend kernels used by
//! transitions.
//!
//! Blend factors are in `0..=256`, where 256 selects the second source
//! exactly. All channel math is integer and truncates like the rest of the
//! effect pipeline, so a frame is reproducible from its inputs alone.

use crate::surface::{Rect, Surface};

/// Full blend factor
pub const ALPHA_MAX: u32 = 256;

#[inline]
fn split(c: u32) -> [i32; 3] {
	[((c >> 16) & 0xFF) as i32, ((c >> 8) & 0xFF) as i32, (c & 0xFF) as i32]
}

#[inline]
fn join(alpha: u32, [r, g, b]: [i32; 3]) -> u32 {
	(alpha & 0xFF00_0000) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Linear interpolation `a + (b - a) * alpha / 256` on each colour channel.
///
/// The result is opaque.
#[inline]
pub fn lerp(a: u32, b: u32, alpha: u32) -> u32 {
	let alpha = alpha.min(ALPHA_MAX) as i32;
	let ca = split(a);
	let cb = split(b);
	let mut out = [0; 3];
	for i in 0..3 {
		out[i] = ca[i] + (cb[i] - ca[i]) * alpha / ALPHA_MAX as i32;
	}
	join(0xFF00_0000, out)
}

/// Per-channel mean of two pixels. Alpha is taken from `a`.
#[inline]
pub fn mean(a: u32, b: u32) -> u32 {
	let ca = split(a);
	let cb = split(b);
	join(a, [(ca[0] + cb[0]) / 2, (ca[1] + cb[1]) / 2, (ca[2] + cb[2]) / 2])
}

/// Adds `offset` to each channel, clamping to `0..=255`. Alpha is kept.
#[inline]
pub fn offset(c: u32, offset: i32) -> u32 {
	let ch = split(c);
	join(c, ch.map(|v| (v + offset).clamp(0, 255)))
}

/// Subtracts a grey level from each channel, saturating at 0.
#[inline]
pub fn sub_gray(c: u32, level: u8) -> u32 {
	let ch = split(c);
	join(c, ch.map(|v| (v - level as i32).max(0)))
}

/// Adds a grey level to each channel, saturating at 255.
#[inline]
pub fn add_gray(c: u32, level: u8) -> u32 {
	let ch = split(c);
	join(c, ch.map(|v| (v + level as i32).min(255)))
}

/// Perceptual brightness in `0..=255`.
#[inline]
pub fn luminance(c: u32) -> u32 {
	let [r, g, b] = split(c);
	((r * 77 + g * 150 + b * 29) >> 8) as u32
}

/// Source-over composite of a straight-alpha pixel onto an opaque one.
#[inline]
pub fn over(dst: u32, src: u32) -> u32 {
	let alpha = src >> 24;
	if alpha == 0xFF {
		return src | 0xFF00_0000;
	}
	if alpha == 0 {
		return dst;
	}
	let d = split(dst);
	let s = split(src);
	let a = alpha as i32;
	let mut out = [0; 3];
	for i in 0..3 {
		out[i] = d[i] + (s[i] - d[i]) * a / 255;
	}
	join(dst, out)
}

/// How a blend factor is derived per pixel
#[derive(Debug, Clone, Copy)]
pub enum BlendMode<'m> {
	/// Same factor everywhere
	Constant,

	/// A pixel switches fully to the second source once the progress
	/// exceeds the mask brightness at that pixel
	FadeMask(&'m Surface),

	/// The local factor is `progress - mask`, clamped to `0..=256`
	CrossfadeMask(&'m Surface),
}

impl BlendMode<'_> {
	#[inline]
	fn factor(&self, value: u32, x: i32, y: i32) -> u32 {
		let mask_at = |mask: &Surface| {
			if mask.width() == 0 || mask.height() == 0 {
				return 0;
			}
			mask.get(x % mask.width(), y % mask.height()).map_or(0, luminance)
		};

		match self {
			BlendMode::Constant => value.min(ALPHA_MAX),
			BlendMode::FadeMask(mask) => {
				if value > mask_at(mask) {
					ALPHA_MAX
				} else {
					0
				}
			}
			BlendMode::CrossfadeMask(mask) => value.saturating_sub(mask_at(mask)).min(ALPHA_MAX),
		}
	}
}

/// Writes `lerp(src1, src2, factor)` into `dst` over the screen area
/// clipped to `clip`. Masks smaller than the screen are tiled.
pub fn alpha_blend(src1: &Surface, src2: &Surface, dst: &mut Surface, mode: BlendMode<'_>, value: u32, clip: Rect) {
	let Some((rect, _, _)) = dst.rect().clip_to(&clip) else {
		return;
	};
	let rect = rect.intersect(&src1.rect()).intersect(&src2.rect());

	for y in rect.y..rect.bottom() {
		let a = src1.row(y);
		let b = src2.row(y);
		let out = dst.row_mut(y);
		for x in rect.x..rect.right() {
			let i = x as usize;
			out[i] = lerp(a[i], b[i], mode.factor(value, x, y));
		}
	}
}
