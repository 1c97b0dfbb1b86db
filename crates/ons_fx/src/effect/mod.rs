//! Full-screen transitions.
//!
//! A transition is requested with an [`EffectLink`] and driven by an
//! [`EffectExecutor`]: [`set_effect`](EffectExecutor::set_effect) captures
//! the current frame and prepares the target, then
//! [`do_effect`](EffectExecutor::do_effect) is called once per tick until it
//! reports [`EffectStatus::Continue`].
//!
//! Every frame is a function of `counter / duration` and the screen
//! geometry; only the random quake draws on the executor's RNG.

mod executor;
mod mosaic;
mod plugin;
mod shake;
mod surfaces;
mod wipe;

pub use executor::{
	Compositor, EffectDst, EffectExecutor, EffectStatus, FRAME_INTERVAL_MS, Geometry, RefreshMode, StaticScene,
};
pub use plugin::{CascadeMode, Plugin};
pub use surfaces::{DirtyRect, Role, Surfaces};

use crate::surface::Surface;

/// First effect number of the quake family
pub const CUSTOM_EFFECT_NO: i32 = 100;

/// Effect number that dispatches on a plugin name
pub const PLUGIN_EFFECT_NO: i32 = CUSTOM_EFFECT_NO - 1;

/// `k * counter / duration` with truncating division, computed wide so long
/// durations cannot overflow.
pub(crate) fn scale(k: i32, counter: i32, duration: i32) -> i32 {
	let value = i64::from(k) * i64::from(counter) / i64::from(duration.max(1));
	value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Edge a wipe starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// From the left edge
	Left,
	/// From the right edge
	Right,
	/// From the top edge
	Top,
	/// From the bottom edge
	Bottom,
}

/// The closed set of transitions, decoded from an effect number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
	/// 0: nothing to animate
	None,
	/// 1: instant cut
	Instant,
	/// 2-5: striped reveal
	Shutter(Direction),
	/// 6-9: striped reveal with a diagonal delay
	Curtain(Direction),
	/// 10, and every unknown number
	Crossfade,
	/// 11-14: both frames slide together
	Scroll(Direction),
	/// 15
	FadeMask,
	/// 16
	MosaicOut,
	/// 17
	MosaicIn,
	/// 18
	CrossfadeMask,
	/// 99: `name.dll/params`
	Plugin,
	/// 100: vertical shake
	QuakeY,
	/// 101: horizontal shake
	QuakeX,
	/// 102: random shake on both axes
	Quake,
}

impl EffectKind {
	/// Decodes an effect number. Unknown numbers cross-fade.
	pub fn resolve(effect: i32) -> Self {
		const DIRECTIONS: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Top, Direction::Bottom];

		match effect {
			0 => EffectKind::None,
			1 => EffectKind::Instant,
			2..=5 => EffectKind::Shutter(DIRECTIONS[(effect - 2) as usize]),
			6..=9 => EffectKind::Curtain(DIRECTIONS[(effect - 6) as usize]),
			11..=14 => EffectKind::Scroll(DIRECTIONS[(effect - 11) as usize]),
			15 => EffectKind::FadeMask,
			16 => EffectKind::MosaicOut,
			17 => EffectKind::MosaicIn,
			18 => EffectKind::CrossfadeMask,
			PLUGIN_EFFECT_NO => EffectKind::Plugin,
			CUSTOM_EFFECT_NO => EffectKind::QuakeY,
			101 => EffectKind::QuakeX,
			102 => EffectKind::Quake,
			_ => EffectKind::Crossfade,
		}
	}

	/// Returns `true` for the kinds that blend with a mask image.
	pub fn uses_mask(&self) -> bool {
		matches!(self, EffectKind::FadeMask | EffectKind::CrossfadeMask)
	}

	/// Returns `true` for the kinds that repaint the whole screen.
	pub fn is_full_screen(&self) -> bool {
		matches!(self, EffectKind::Scroll(_) | EffectKind::MosaicOut | EffectKind::MosaicIn)
	}
}

/// One requested transition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectLink {
	/// Effect number, see [`EffectKind::resolve`]
	pub effect: i32,

	/// Length in milliseconds
	pub duration: i32,

	/// Custom parameter; the quake strength
	pub no: i32,

	/// Mask image name for 15/18, or `name.dll/params` for 99
	pub image: Option<String>,

	/// Decoded mask, loaded on demand
	pub mask: Option<Surface>,
}

impl EffectLink {
	/// Creates a link without image or mask.
	pub fn new(effect: i32, duration: i32) -> Self {
		Self {
			effect,
			duration,
			..Default::default()
		}
	}

	/// Sets the custom parameter.
	pub fn with_no(mut self, no: i32) -> Self {
		self.no = no;
		self
	}

	/// Sets the image string.
	pub fn with_image(mut self, image: impl Into<String>) -> Self {
		self.image = Some(image.into());
		self
	}

	/// Attaches an already decoded mask.
	pub fn with_mask(mut self, mask: Surface) -> Self {
		self.mask = Some(mask);
		self
	}

	/// Returns the decoded effect kind.
	pub fn kind(&self) -> EffectKind {
		EffectKind::resolve(self.effect)
	}
}
