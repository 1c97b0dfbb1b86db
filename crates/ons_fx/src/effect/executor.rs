//! The per-tick transition state machine.

use log::{debug, trace, warn};
use rand::{SeedableRng, rngs::SmallRng};

use super::{
	EffectKind, EffectLink, Plugin,
	mosaic, plugin, scale, shake,
	surfaces::{Role, Surfaces},
	wipe,
};
use crate::{
	blend::{self, BlendMode},
	clock::{Clock, SystemClock},
	surface::{BLACK, Rect, Surface},
};

/// Default per-tick frame budget in milliseconds
pub const FRAME_INTERVAL_MS: u64 = 17;

/// How the engine repaints a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefreshMode {
	/// Leave the surface alone
	None,
	/// Background and sprites
	#[default]
	Normal,
	/// Background, sprites and the text window
	Text,
}

/// Where the end frame of a transition comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectDst {
	/// The caller already painted the destination buffer
	Given,
	/// Ask the [`Compositor`] to paint it
	Generate,
}

/// What the caller should do after a call into the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectStatus {
	/// The transition is finished; proceed
	Continue,
	/// Call [`EffectExecutor::do_effect`] again on the next tick
	Wait,
}

/// Engine services the executor draws on.
pub trait Compositor {
	/// The repaint mode currently in force.
	fn refresh_mode(&self) -> RefreshMode {
		RefreshMode::Normal
	}

	/// Repaints `target`, limited to `clip` when given.
	fn refresh(&mut self, target: &mut Surface, clip: Option<Rect>, mode: RefreshMode);

	/// Decodes the mask image named by `link`.
	fn load_mask(&mut self, _link: &EffectLink) -> Option<Surface> {
		None
	}

	/// Presents `region` of the composed frame.
	fn flush(&mut self, _frame: &Surface, _region: Rect) {}
}

/// A [`Compositor`] that always paints one fixed image.
#[derive(Debug, Clone)]
pub struct StaticScene {
	scene: Surface,
	mask: Option<Surface>,
	mode: RefreshMode,
	flushes: usize,
}

impl StaticScene {
	/// Creates a scene that refreshes to `scene`.
	pub fn new(scene: Surface) -> Self {
		Self {
			scene,
			mask: None,
			mode: RefreshMode::Normal,
			flushes: 0,
		}
	}

	/// Supplies the mask returned by [`Compositor::load_mask`].
	pub fn with_mask(mut self, mask: Surface) -> Self {
		self.mask = Some(mask);
		self
	}

	/// Sets the reported refresh mode.
	pub fn with_mode(mut self, mode: RefreshMode) -> Self {
		self.mode = mode;
		self
	}

	/// Number of frames presented so far.
	pub fn flushes(&self) -> usize {
		self.flushes
	}
}

impl Compositor for StaticScene {
	fn refresh_mode(&self) -> RefreshMode {
		self.mode
	}

	fn refresh(&mut self, target: &mut Surface, clip: Option<Rect>, mode: RefreshMode) {
		if mode == RefreshMode::None {
			return;
		}
		match clip {
			Some(rect) => target.copy_rect(&self.scene, rect),
			None => target.blit_from(&self.scene, None, 0, 0),
		}
	}

	fn load_mask(&mut self, _link: &EffectLink) -> Option<Surface> {
		self.mask.clone()
	}

	fn flush(&mut self, _frame: &Surface, _region: Rect) {
		self.flushes += 1;
	}
}

/// Screen-ratio scaled sizes used by the wipes and quakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
	/// Shutter band width
	pub stripe: i32,
	/// Curtain band width
	pub curtain: i32,
	/// Quake amplitude per unit of strength
	pub quake_amplitude: i32,
}

impl Geometry {
	/// Shutter band width at 1:1
	pub const STRIPE_WIDTH: i32 = 16;
	/// Curtain band width at 1:1
	pub const CURTAIN_WIDTH: i32 = 24;
	/// Quake amplitude at 1:1
	pub const QUAKE_AMPLITUDE: i32 = 12;

	/// Scales the base sizes by `ratio1 / ratio2`. Band widths never drop
	/// below one pixel.
	pub fn new(ratio1: i32, ratio2: i32) -> Self {
		let ratio2 = if ratio2 == 0 { 1 } else { ratio2 };
		Self {
			stripe: (Self::STRIPE_WIDTH * ratio1 / ratio2).max(1),
			curtain: (Self::CURTAIN_WIDTH * ratio1 / ratio2).max(1),
			quake_amplitude: Self::QUAKE_AMPLITUDE * ratio1 / ratio2,
		}
	}
}

impl Default for Geometry {
	fn default() -> Self {
		Self::new(1, 1)
	}
}

/// Drives one transition at a time.
///
/// ```
/// use ons_fx::prelude::*;
///
/// let clock = ManualClock::new(0);
/// let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
/// let mut surfaces = Surfaces::new(64, 48);
/// let mut scene = StaticScene::new(Surface::filled(64, 48, 0xFFFF_FFFF));
/// let mut link = EffectLink::new(10, 100);
///
/// surfaces.dirty.fill();
/// let mut status = executor.set_effect(&mut link, EffectDst::Generate, false, &mut surfaces, &mut scene);
/// while status == EffectStatus::Wait {
/// 	status = executor.do_effect(&link, true, &mut surfaces, &mut scene);
/// }
/// assert_eq!(surfaces.get(Role::Accumulation).get(0, 0), Some(0xFFFF_FFFF));
/// ```
#[derive(Debug)]
pub struct EffectExecutor<C: Clock = SystemClock> {
	clock: C,
	geometry: Geometry,
	frame_interval: u64,
	counter: i32,
	last_tick: u64,
	resolution: i32,
	cascade_progress: i32,
	rng: SmallRng,
	effect_cut: bool,
	skip_normal: bool,
	skip_requested: bool,
}

impl EffectExecutor<SystemClock> {
	/// Creates an executor on the wall clock.
	pub fn new(geometry: Geometry) -> Self {
		Self::with_clock(SystemClock::new(), geometry)
	}
}

impl<C: Clock> EffectExecutor<C> {
	/// Creates an executor on `clock`.
	pub fn with_clock(clock: C, geometry: Geometry) -> Self {
		Self {
			clock,
			geometry,
			frame_interval: FRAME_INTERVAL_MS,
			counter: 0,
			last_tick: 0,
			resolution: 0,
			cascade_progress: 0,
			rng: SmallRng::from_os_rng(),
			effect_cut: false,
			skip_normal: false,
			skip_requested: false,
		}
	}

	/// Reseeds the quake RNG.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = SmallRng::seed_from_u64(seed);
		self
	}

	/// Sets the per-tick frame budget.
	pub fn with_frame_interval(mut self, ms: u64) -> Self {
		self.frame_interval = ms;
		self
	}

	/// Returns the geometry.
	pub fn geometry(&self) -> &Geometry {
		&self.geometry
	}

	/// Returns the elapsed transition time in milliseconds.
	pub fn counter(&self) -> i32 {
		self.counter
	}

	/// Cut every transition to an instant switch while skipping.
	pub fn set_effect_cut(&mut self, enabled: bool) {
		self.effect_cut = enabled;
	}

	/// Enters or leaves normal skip mode.
	pub fn set_skip_normal(&mut self, enabled: bool) {
		self.skip_normal = enabled;
	}

	/// Finishes the running transition on the next tick.
	pub fn request_skip(&mut self) {
		self.skip_requested = true;
	}

	fn effective_kind(&self, link: &EffectLink) -> EffectKind {
		if self.effect_cut && self.skip_normal {
			EffectKind::Instant
		} else {
			link.kind()
		}
	}

	fn effective_duration(&self, link: &EffectLink) -> i32 {
		if self.skip_requested { 1 } else { link.duration.max(1) }
	}

	/// Starts a transition.
	///
	/// The current frame is captured as the source and, for
	/// [`EffectDst::Generate`], the destination is painted by `compositor`.
	/// Effect 0 has nothing to animate and returns
	/// [`EffectStatus::Continue`] straight away.
	pub fn set_effect(
		&mut self,
		link: &mut EffectLink,
		dst: EffectDst,
		update_backup: bool,
		surfaces: &mut Surfaces,
		compositor: &mut dyn Compositor,
	) -> EffectStatus {
		if link.effect == 0 {
			return EffectStatus::Continue;
		}

		let bounding_box = surfaces.dirty.bounding_box();
		if update_backup {
			compositor.refresh(surfaces.get_mut(Role::Backup), Some(bounding_box), RefreshMode::Normal);
		}

		let kind = self.effective_kind(link);
		surfaces.blit(Role::Accumulation, None, Role::Source, 0, 0);

		if dst == EffectDst::Generate {
			let mode = compositor.refresh_mode();
			if update_backup && mode == RefreshMode::Normal {
				surfaces.blit(Role::Backup, Some(bounding_box), Role::Destination, bounding_box.x, bounding_box.y);
			} else if kind == EffectKind::Instant {
				compositor.refresh(surfaces.get_mut(Role::Destination), Some(bounding_box), mode);
			} else {
				compositor.refresh(surfaces.get_mut(Role::Destination), None, mode);
			}
		}

		if kind.uses_mask() && link.mask.is_none() {
			link.mask = compositor.load_mask(link);
			if link.mask.is_none() {
				warn!("effect {}: mask {:?} not available, cross-fading instead", link.effect, link.image);
			}
		}
		if kind.is_full_screen() {
			surfaces.dirty.fill();
		}

		debug!("effect {} ({kind:?}) for {} ms", link.effect, link.duration);
		self.counter = 0;
		self.cascade_progress = 0;
		EffectStatus::Wait
	}

	/// Advances the running transition by one tick.
	///
	/// Draws the frame for the current counter, sleeps out the rest of the
	/// frame budget and advances the counter by the time since the previous
	/// tick. Once the counter reaches the duration the destination is
	/// copied into the accumulation buffer and [`EffectStatus::Continue`] is
	/// returned.
	pub fn do_effect(
		&mut self,
		link: &EffectLink,
		clear_dirty: bool,
		surfaces: &mut Surfaces,
		compositor: &mut dyn Compositor,
	) -> EffectStatus {
		let start = self.clock.ticks();
		// the first tick always advances by one
		self.resolution = if self.counter == 0 {
			1
		} else {
			start.saturating_sub(self.last_tick).min(i32::MAX as u64) as i32
		};
		self.last_tick = start;

		let kind = self.effective_kind(link);
		let duration = self.effective_duration(link);
		if matches!(kind, EffectKind::QuakeY | EffectKind::QuakeX) {
			self.resolution = shake::clamp_resolution(self.resolution, link.no, duration);
		}

		self.render(kind, link, self.counter, duration, surfaces);

		let elapsed = self.clock.ticks().saturating_sub(start);
		if elapsed < self.frame_interval {
			self.clock.sleep(self.frame_interval - elapsed);
		}
		self.counter = self.counter.saturating_add(self.resolution);

		let bounding_box = surfaces.dirty.bounding_box();
		if self.counter < duration && kind != EffectKind::Instant {
			if kind != EffectKind::None {
				compositor.flush(surfaces.get(Role::Accumulation), bounding_box);
			}
			return EffectStatus::Wait;
		}

		surfaces.blit(Role::Destination, Some(bounding_box), Role::Accumulation, bounding_box.x, bounding_box.y);
		if kind != EffectKind::None {
			compositor.flush(surfaces.get(Role::Accumulation), bounding_box);
			if clear_dirty {
				surfaces.dirty.clear();
			}
		}

		debug!("effect {} done", link.effect);
		self.counter = 0;
		self.skip_requested = false;
		EffectStatus::Continue
	}

	/// Draws the frame of `link` at `counter` into the accumulation buffer
	/// without touching the clock.
	pub fn render_frame(&mut self, link: &EffectLink, counter: i32, surfaces: &mut Surfaces) {
		let kind = self.effective_kind(link);
		let duration = self.effective_duration(link);
		self.render(kind, link, counter, duration, surfaces);
	}

	fn render(&mut self, kind: EffectKind, link: &EffectLink, counter: i32, duration: i32, surfaces: &mut Surfaces) {
		trace!("effect {} frame {counter}/{duration}", link.effect);
		let screen = surfaces.screen();

		match kind {
			EffectKind::None | EffectKind::Instant => {}
			EffectKind::Shutter(direction) => {
				wipe::shutter(surfaces, direction, self.geometry.stripe, counter, duration);
			}
			EffectKind::Curtain(direction) => {
				wipe::curtain(surfaces, direction, self.geometry.curtain, counter, duration);
			}
			EffectKind::Scroll(direction) => wipe::scroll(surfaces, direction, counter, duration),
			EffectKind::Crossfade => {
				plugin::crossfade(surfaces, Role::Source, Role::Destination, Role::Accumulation, counter, duration);
			}
			EffectKind::FadeMask => {
				let value = scale(256, counter, duration);
				masked_blend(surfaces, link.mask.as_ref().map(BlendMode::FadeMask), value, counter, duration);
			}
			EffectKind::CrossfadeMask => {
				let value = scale(512, counter, duration);
				masked_blend(surfaces, link.mask.as_ref().map(BlendMode::CrossfadeMask), value, counter, duration);
			}
			EffectKind::MosaicOut => {
				if let Some((src, acc)) = surfaces.pair_mut(Role::Source, Role::Accumulation) {
					mosaic::generate(src, acc, 5 - scale(6, counter, duration));
				}
			}
			EffectKind::MosaicIn => {
				if let Some((src, acc)) = surfaces.pair_mut(Role::Destination, Role::Accumulation) {
					mosaic::generate(src, acc, scale(6, counter, duration));
				}
			}
			EffectKind::Plugin => match link.image.as_deref().and_then(Plugin::parse) {
				Some(Plugin::Cascade(mode)) => {
					plugin::cascade(surfaces, mode, &mut self.cascade_progress, counter, duration);
				}
				Some(Plugin::Trvswave) => plugin::trvswave(surfaces, counter, duration),
				Some(Plugin::Whirl {
					reverse,
				}) => plugin::whirl(surfaces, reverse, counter, duration),
				None => {
					plugin::crossfade(surfaces, Role::Source, Role::Destination, Role::Accumulation, counter, duration);
				}
			},
			EffectKind::QuakeY => {
				let y = shake::sine_offset(link.no, self.geometry.quake_amplitude, counter, duration);
				surfaces.get_mut(Role::Accumulation).fill(BLACK);
				wipe::draw_effect(surfaces, Role::Destination, Rect::new(0, y, screen.w, screen.h), screen);
			}
			EffectKind::QuakeX => {
				let x = shake::sine_offset(link.no, self.geometry.quake_amplitude, counter, duration);
				wipe::draw_effect(surfaces, Role::Destination, Rect::new(x, 0, screen.w, screen.h), screen);
			}
			EffectKind::Quake => {
				let (x, y) = shake::random_offset(&mut self.rng, link.no);
				surfaces.get_mut(Role::Accumulation).fill(BLACK);
				wipe::draw_effect(surfaces, Role::Destination, Rect::new(x, y, screen.w, screen.h), screen);
			}
		}
	}
}

fn masked_blend(surfaces: &mut Surfaces, mode: Option<BlendMode<'_>>, value: i32, counter: i32, duration: i32) {
	let Some(mode) = mode else {
		plugin::crossfade(surfaces, Role::Source, Role::Destination, Role::Accumulation, counter, duration);
		return;
	};
	let clip = surfaces.dirty.bounding_box();
	if let Some((src, dst, acc)) = surfaces.triple_mut(Role::Source, Role::Destination, Role::Accumulation) {
		blend::alpha_blend(src, dst, acc, mode, value.max(0) as u32, clip);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::ManualClock;

	const OLD: u32 = 0xFF00_0000;
	const NEW: u32 = 0xFFFF_FFFF;

	fn surfaces(w: i32, h: i32) -> Surfaces {
		let mut surfaces = Surfaces::new(w, h);
		for y in 0..h {
			for x in 0..w {
				surfaces.get_mut(Role::Accumulation).put(x, y, 0xFF00_0000 | ((x * 7 + y * 13) as u32 & 0xFF));
			}
		}
		surfaces.dirty.fill();
		surfaces
	}

	fn scene(w: i32, h: i32) -> StaticScene {
		let mut image = Surface::new(w, h);
		for y in 0..h {
			for x in 0..w {
				image.put(x, y, 0xFF00_0000 | ((x * 3 + y * 5) as u32 & 0xFF) << 8);
			}
		}
		StaticScene::new(image).with_mask(Surface::filled(8, 8, 0xFF80_8080))
	}

	fn run(executor: &mut EffectExecutor<&ManualClock>, link: &mut EffectLink, s: &mut Surfaces, c: &mut StaticScene) -> usize {
		let mut ticks = 0;
		let mut status = executor.set_effect(link, EffectDst::Generate, false, s, c);
		while status == EffectStatus::Wait {
			status = executor.do_effect(link, true, s, c);
			ticks += 1;
			assert!(ticks < 10_000, "transition never finished");
		}
		ticks
	}

	#[test]
	fn test_effect_zero_continues_immediately() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(0, 1);

		assert_eq!(executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c), EffectStatus::Continue);
		assert_eq!(executor.do_effect(&link, true, &mut s, &mut c), EffectStatus::Continue);
		assert_eq!(c.flushes(), 0);
		assert!(!s.dirty.is_empty());
	}

	#[test]
	fn test_first_tick_at_clock_zero_advances() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(10, 1);

		executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
		assert_eq!(executor.do_effect(&link, true, &mut s, &mut c), EffectStatus::Continue);
		assert_eq!(s.get(Role::Accumulation), s.get(Role::Destination));
	}

	#[test]
	fn test_long_durations_do_not_overflow() {
		let mut executor = EffectExecutor::new(Geometry::default());
		let mut s = surfaces(16, 16);
		for effect in [15, 18, 16, 17, 10] {
			let link = EffectLink::new(effect, 2_100_000_000);
			executor.render_frame(&link, 2_000_000_000, &mut s);
		}
		let whirl = EffectLink::new(99, i32::MAX).with_image("whirl.dll");
		executor.render_frame(&whirl, i32::MAX - 1, &mut s);
		let trvswave = EffectLink::new(99, i32::MAX).with_image("trvswave.dll");
		executor.render_frame(&trvswave, 1_500_000_000, &mut s);
	}

	#[test]
	fn test_instant_cut_finishes_in_one_tick() {
		let clock = ManualClock::new(1000);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(1, 1);

		assert_eq!(run(&mut executor, &mut link, &mut s, &mut c), 1);
		assert_eq!(s.get(Role::Accumulation), s.get(Role::Destination));
		assert_eq!(c.flushes(), 1);
		assert!(s.dirty.is_empty());
		assert_eq!(executor.counter(), 0);
	}

	#[test]
	fn test_every_kind_ends_on_destination() {
		let clock = ManualClock::new(0);
		for effect in (0..=18).chain([99, 100, 101, 102]) {
			let mut executor = EffectExecutor::with_clock(&clock, Geometry::default()).with_seed(1);
			let mut s = surfaces(40, 30);
			let mut c = scene(40, 30);
			let mut link = EffectLink::new(effect, 200).with_no(2).with_image("whirl.dll/r");
			run(&mut executor, &mut link, &mut s, &mut c);
			if effect != 0 {
				assert_eq!(s.get(Role::Accumulation), s.get(Role::Destination), "effect {effect}");
			}
		}
	}

	#[test]
	fn test_counter_advances_by_clock() {
		let clock = ManualClock::new(500);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(10, 100);

		executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
		assert_eq!(executor.do_effect(&link, true, &mut s, &mut c), EffectStatus::Wait);
		assert_eq!(executor.counter(), 1);
		assert_eq!(executor.do_effect(&link, true, &mut s, &mut c), EffectStatus::Wait);
		assert_eq!(executor.counter(), 18);
		// 1 + 17 * 6 = 103
		let ticks = 2 + run_ticks(&mut executor, &link, &mut s, &mut c);
		assert_eq!(ticks, 7);
	}

	fn run_ticks(executor: &mut EffectExecutor<&ManualClock>, link: &EffectLink, s: &mut Surfaces, c: &mut StaticScene) -> usize {
		let mut ticks = 0;
		loop {
			ticks += 1;
			if executor.do_effect(link, true, s, c) == EffectStatus::Continue {
				return ticks;
			}
		}
	}

	#[test]
	fn test_request_skip_collapses_duration() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(10, 10_000);

		executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
		assert_eq!(executor.do_effect(&link, true, &mut s, &mut c), EffectStatus::Wait);
		executor.request_skip();
		assert_eq!(executor.do_effect(&link, true, &mut s, &mut c), EffectStatus::Continue);
	}

	#[test]
	fn test_effect_cut_in_skip_mode() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		executor.set_effect_cut(true);
		executor.set_skip_normal(true);
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(10, 10_000);
		assert_eq!(run(&mut executor, &mut link, &mut s, &mut c), 1);
	}

	#[test]
	fn test_scroll_and_mosaic_dirty_whole_screen() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut c = scene(8, 8);
		for effect in [11, 16] {
			let mut s = surfaces(8, 8);
			s.dirty.clear();
			s.dirty.add(Rect::new(1, 1, 2, 2));
			let mut link = EffectLink::new(effect, 50);
			executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
			assert_eq!(s.dirty.bounding_box(), s.screen());
		}
	}

	#[test]
	fn test_backup_reuse_limits_destination_to_dirty_region() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		s.dirty.clear();
		s.dirty.add(Rect::new(0, 0, 4, 4));
		let mut link = EffectLink::new(10, 50);

		executor.set_effect(&mut link, EffectDst::Generate, true, &mut s, &mut c);
		let dst = s.get(Role::Destination);
		assert_eq!(dst.get(1, 1), c.scene.get(1, 1));
		assert_eq!(dst.get(6, 6), Some(OLD));
	}

	#[test]
	fn test_mask_is_loaded_once() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = surfaces(8, 8);
		let mut c = scene(8, 8);
		let mut link = EffectLink::new(15, 50);
		executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
		assert!(link.mask.is_some());

		let mut link = EffectLink::new(15, 50).with_mask(Surface::filled(1, 1, NEW));
		let mut c = StaticScene::new(Surface::new(8, 8));
		executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
		assert_eq!(link.mask.as_ref().and_then(|m| m.get(0, 0)), Some(NEW));
	}

	#[test]
	fn test_replay_is_deterministic() {
		let counters = [0, 1, 18, 35, 52, 69, 86, 103, 150, 199];
		let images = [None, Some("cascade.dll/rx"), Some("cascade.dll/u"), Some("trvswave.dll"), Some("whirl.dll/l")];

		for effect in (1..=18).chain([99, 100, 101]) {
			for image in images {
				let render = || {
					let mut executor = EffectExecutor::with_clock(ManualClock::new(0), Geometry::default());
					let mut s = surfaces(33, 21);
					let mut c = scene(33, 21);
					let mut link = EffectLink::new(effect, 200).with_no(3);
					if let Some(image) = image {
						link = link.with_image(image);
					}
					executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
					let mut frames = Vec::new();
					for counter in counters {
						executor.render_frame(&link, counter, &mut s);
						frames.push(s.get(Role::Accumulation).clone());
					}
					frames
				};
				assert_eq!(render(), render(), "effect {effect} {image:?}");
			}
		}
	}

	#[test]
	fn test_crossfade_midpoint() {
		let clock = ManualClock::new(0);
		let mut executor = EffectExecutor::with_clock(&clock, Geometry::default());
		let mut s = Surfaces::new(4, 4);
		s.get_mut(Role::Accumulation).fill(OLD);
		s.dirty.fill();
		let mut c = StaticScene::new(Surface::filled(4, 4, 0xFF00_00FE));
		let mut link = EffectLink::new(10, 100);
		executor.set_effect(&mut link, EffectDst::Generate, false, &mut s, &mut c);
		executor.render_frame(&link, 50, &mut s);
		assert!(s.get(Role::Accumulation).pixels().iter().all(|&p| p == 0xFF00_007F));
	}

	#[test]
	fn test_geometry_scaling() {
		assert_eq!(
			Geometry::new(2, 1),
			Geometry {
				stripe: 32,
				curtain: 48,
				quake_amplitude: 24,
			}
		);
		assert_eq!(Geometry::new(1, 32).stripe, 1);
		assert_eq!(Geometry::new(1, 0), Geometry::default());
	}
}
