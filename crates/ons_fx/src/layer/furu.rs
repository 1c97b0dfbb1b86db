//! Falling particles: tumbling petals or snow.
//!
//! Messages:
//!
//! | message | effect |
//! |---------|--------|
//! | `s\|interval,fall,wind,amplitude,period` | set parameters and restart |
//! | `t\|d_interval,d_fall,d_wind,d_amplitude,d_period` | adjust parameters in place |
//! | `g` | reply with the parameters as an `s\|` message, value `1` if paused |
//! | `n` | reply with the live particle count |
//! | `h` | stop spawning, let existing particles fall out |
//! | `p` / `r` | pause / resume |
//! | `i\|index,path` or `i\|path,...` | load element images |

use std::rc::Rc;

use log::{debug, warn};
use ons_vfs::ArchiveReader;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::message::{self, Message, Reply};
use crate::{
	error::MessageError,
	sprite::Sprite,
	surface::{Rect, Surface},
};

/// Ring buffer size; one slot stays free to tell full from empty
pub const RING_CAPACITY: usize = 1024;

/// Number of element images
pub const MAX_ELEMENTS: usize = 3;

const RING_MASK: usize = RING_CAPACITY - 1;

/// A falling element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Particle {
	/// Left edge
	pub x: i32,
	/// Top edge
	pub y: i32,
	/// Element image index
	pub kind: usize,
	/// Animation cell
	pub cell: i32,
}

/// Fixed-capacity FIFO of particles
#[derive(Debug, Clone)]
pub struct ParticleRing {
	points: Box<[Particle]>,
	start: usize,
	end: usize,
}

impl Default for ParticleRing {
	fn default() -> Self {
		Self {
			points: vec![Particle::default(); RING_CAPACITY].into_boxed_slice(),
			start: 0,
			end: 0,
		}
	}
}

impl ParticleRing {
	/// Number of live particles.
	pub fn len(&self) -> usize {
		self.end.wrapping_sub(self.start) & RING_MASK
	}

	/// Returns `true` when no particle is live.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns `true` when another push would be dropped.
	pub fn is_full(&self) -> bool {
		(self.end + 1) & RING_MASK == self.start
	}

	/// Appends a particle. Returns `false` and drops it when full.
	pub fn push(&mut self, particle: Particle) -> bool {
		if self.is_full() {
			return false;
		}
		self.points[self.end] = particle;
		self.end = (self.end + 1) & RING_MASK;
		true
	}

	/// Removes particles from the front while `retire` holds.
	pub fn retire_while(&mut self, mut retire: impl FnMut(&Particle) -> bool) {
		while !self.is_empty() && retire(&self.points[self.start]) {
			self.start = (self.start + 1) & RING_MASK;
		}
	}

	/// Removes everything.
	pub fn clear(&mut self) {
		self.start = 0;
		self.end = 0;
	}

	/// Iterates oldest first.
	pub fn iter(&self) -> impl Iterator<Item = &Particle> {
		(0..self.len()).map(move |i| &self.points[(self.start + i) & RING_MASK])
	}

	/// Iterates oldest first, mutably.
	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
		let (start, len) = (self.start, self.len());
		let (head, tail) = self.points.split_at_mut(start);
		tail.iter_mut().chain(head.iter_mut()).take(len)
	}
}

/// Motion parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuruParams {
	/// Frames between releases, 1-10000
	pub interval: i32,
	/// Pixels per frame downward, 1 to the screen height
	pub fall_velocity: i32,
	/// Pixels per frame sideways, within half the screen width
	pub wind: i32,
	/// Sway amplitude, 0 to half the screen width
	pub amplitude: i32,
	/// Sway period in degrees per frame, 0-359
	pub period: i32,
}

impl Default for FuruParams {
	fn default() -> Self {
		Self {
			interval: 1,
			fall_velocity: 1,
			wind: 0,
			amplitude: 0,
			period: 0,
		}
	}
}

impl FuruParams {
	/// Clamps every field into range for a `width` x `height` screen.
	pub fn validated(self, width: i32, height: i32) -> Self {
		let half = (width / 2).max(0);
		Self {
			interval: self.interval.clamp(1, 10_000),
			fall_velocity: self.fall_velocity.clamp(1, height.max(1)),
			wind: self.wind.clamp(-half, half),
			amplitude: self.amplitude.clamp(0, half),
			period: self.period.clamp(0, 359),
		}
	}

	fn to_values(self) -> [i32; 5] {
		[self.interval, self.fall_velocity, self.wind, self.amplitude, self.period]
	}
}

/// The falling-particle layer
pub struct FuruLayer {
	width: i32,
	height: i32,
	tumbling: bool,
	params: FuruParams,
	elements: [Option<Sprite>; MAX_ELEMENTS],
	reader: Option<Rc<dyn ArchiveReader>>,
	ring: ParticleRing,
	window_x: i32,
	window_w: i32,
	frame_count: i32,
	paused: bool,
	halted: bool,
	initialized: bool,
	rng: SmallRng,
}

impl std::fmt::Debug for FuruLayer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FuruLayer")
			.field("width", &self.width)
			.field("height", &self.height)
			.field("tumbling", &self.tumbling)
			.field("params", &self.params)
			.field("reader", &self.reader.as_ref().map(|r| r.archive_name()))
			.field("particles", &self.ring.len())
			.field("paused", &self.paused)
			.field("halted", &self.halted)
			.finish_non_exhaustive()
	}
}

impl FuruLayer {
	/// Creates a layer. `tumbling` animates element cells (petals); snow
	/// uses a single cell.
	pub fn new(width: i32, height: i32, tumbling: bool) -> Self {
		Self {
			width,
			height,
			tumbling,
			params: FuruParams::default().validated(width, height),
			elements: [None, None, None],
			reader: None,
			ring: ParticleRing::default(),
			window_x: 0,
			window_w: width.max(1),
			frame_count: 0,
			paused: false,
			halted: false,
			initialized: false,
			rng: SmallRng::from_os_rng(),
		}
	}

	/// Loads element images named by `i|` messages through `reader`.
	pub fn with_reader(mut self, reader: Rc<dyn ArchiveReader>) -> Self {
		self.reader = Some(reader);
		self
	}

	/// Reseeds the layer's RNG.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = SmallRng::seed_from_u64(seed);
		self
	}

	/// Returns the current parameters.
	pub fn params(&self) -> &FuruParams {
		&self.params
	}

	/// Number of live particles.
	pub fn len(&self) -> usize {
		self.ring.len()
	}

	/// Returns `true` if no particle is live.
	pub fn is_empty(&self) -> bool {
		self.ring.is_empty()
	}

	/// Iterates live particles, oldest first.
	pub fn particles(&self) -> impl Iterator<Item = &Particle> {
		self.ring.iter()
	}

	/// Returns `true` while paused.
	pub fn is_paused(&self) -> bool {
		self.paused
	}

	/// Returns `true` once spawning was halted.
	pub fn is_halted(&self) -> bool {
		self.halted
	}

	/// Sets element image `index`. Tumbling elements are split into square
	/// cells.
	pub fn set_element(&mut self, index: usize, surface: Surface) {
		let Some(slot) = self.elements.get_mut(index) else {
			warn!("furu: element index {index} out of range");
			return;
		};
		let cells = if self.tumbling {
			surface.width() / surface.height().max(1)
		} else {
			1
		};
		*slot = Some(Sprite::new(surface, cells));
		self.update_window();
	}

	fn load_element(&mut self, index: usize, path: &str) {
		let Some(reader) = self.reader.clone() else {
			warn!("furu: no asset reader to load {path:?}");
			return;
		};
		match Sprite::load(reader.as_ref(), path, 1) {
			Ok(sprite) => self.set_element(index, sprite.surface().clone()),
			Err(e) => warn!("furu: element {index}: {e}"),
		}
	}

	/// Height of the tallest element cell; particles start this far above
	/// the screen.
	fn margin(&self) -> i32 {
		self.elements.iter().flatten().map(Sprite::cell_height).max().unwrap_or(0)
	}

	/// Indices of the populated element slots.
	fn loaded_kinds(&self) -> impl Iterator<Item = usize> + '_ {
		self.elements.iter().enumerate().filter_map(|(index, e)| e.as_ref().map(|_| index))
	}

	/// Widens the spawn window against the wind so that particles released
	/// off-screen drift in before reaching the bottom.
	fn update_window(&mut self) {
		let travel = (self.height + 2 * self.margin()) / self.params.fall_velocity.max(1) + 1;
		let drift = self.params.wind * travel;
		self.window_x = (-drift).min(0);
		self.window_w = (self.width + drift.abs()).max(1);
	}

	/// Returns the spawn window as `(x, width)`.
	pub fn spawn_window(&self) -> (i32, i32) {
		(self.window_x, self.window_w)
	}

	fn init(&mut self, params: FuruParams) {
		self.params = params.validated(self.width, self.height);
		self.ring.clear();
		self.frame_count = 0;
		self.paused = false;
		self.halted = false;
		self.initialized = true;
		self.update_window();
		debug!("furu: {:?}", self.params);
	}

	/// Handles a control message, returning an error instead of logging.
	pub fn try_message(&mut self, text: &str) -> Result<Reply, MessageError> {
		let message = Message::parse(text)?;
		match message.tag() {
			"s" => {
				let [interval, fall_velocity, wind, amplitude, period] = message.ints::<5>()?;
				self.init(FuruParams {
					interval,
					fall_velocity,
					wind,
					amplitude,
					period,
				});
			}
			"t" => {
				let [di, df, dw, da, dp] = message.ints::<5>()?;
				let p = self.params;
				self.params = FuruParams {
					interval: p.interval + di,
					fall_velocity: p.fall_velocity + df,
					wind: p.wind + dw,
					amplitude: p.amplitude + da,
					period: p.period + dp,
				}
				.validated(self.width, self.height);
				self.update_window();
			}
			"g" => {
				return Ok(Reply {
					text: Some(message::format("s", &self.params.to_values())),
					value: i32::from(self.paused),
				});
			}
			"n" => return Ok(Reply::value(self.ring.len() as i32)),
			"h" => self.halted = true,
			"p" => self.paused = true,
			"r" => self.paused = false,
			"i" => {
				let fields = message.fields();
				if fields.is_empty() {
					return Err(MessageError::WrongArity {
						expected: 1,
						actual: 0,
					});
				}
				if let [index, path] = fields.as_slice()
					&& let Ok(index) = index.parse::<usize>()
				{
					self.load_element(index, path);
				} else {
					for (index, path) in fields.iter().take(MAX_ELEMENTS).enumerate() {
						self.load_element(index, path);
					}
				}
			}
			_ => return Err(message.unknown()),
		}
		Ok(Reply::default())
	}

	/// Handles a control message. Malformed messages are logged and leave
	/// the layer unchanged.
	pub fn message(&mut self, text: &str) -> Reply {
		self.try_message(text).unwrap_or_else(|e| {
			warn!("furu: ignoring {text:?}: {e}");
			Reply::default()
		})
	}

	/// Advances one frame: moves, retires and releases particles.
	pub fn update(&mut self) {
		if !self.initialized || self.paused {
			return;
		}

		let (fall, wind) = (self.params.fall_velocity, self.params.wind);
		let tumbling = self.tumbling;
		let cells: [i32; MAX_ELEMENTS] = std::array::from_fn(|i| self.elements[i].as_ref().map_or(1, Sprite::cells));
		for p in self.ring.iter_mut() {
			p.y += fall;
			p.x += wind;
			if tumbling {
				p.cell = (p.cell + 1) % cells[p.kind % MAX_ELEMENTS];
			}
		}

		let bottom = self.height + self.margin();
		self.ring.retire_while(|p| p.y >= bottom);

		self.frame_count += 1;
		if !self.halted && self.frame_count >= self.params.interval {
			self.frame_count = 0;
			self.release();
		}
	}

	fn release(&mut self) {
		// slots may be sparse, so pick among the loaded ones
		let loaded = self.loaded_kinds().count();
		let kind = if loaded == 0 {
			0
		} else {
			let pick = self.rng.random_range(0..loaded);
			self.loaded_kinds().nth(pick).unwrap_or(0)
		};
		let cell = if self.tumbling {
			self.rng.random_range(0..self.elements[kind].as_ref().map_or(1, Sprite::cells))
		} else {
			0
		};
		let particle = Particle {
			x: self.window_x + self.rng.random_range(0..self.window_w),
			y: -self.margin(),
			kind,
			cell,
		};
		if !self.ring.push(particle) {
			debug!("furu: particle buffer full, dropping release");
		}
	}

	/// Stamps every live particle inside `clip`.
	pub fn refresh(&self, surface: &mut Surface, clip: Rect) {
		if !self.initialized {
			return;
		}
		for p in self.ring.iter() {
			if let Some(sprite) = self.elements.get(p.kind).and_then(Option::as_ref) {
				sprite.stamp(surface, p.cell, p.x, p.y, clip);
			}
		}
	}
}
