//! Film degradation overlay: blur jitter, grain, flicker, scratches and dust.
//!
//! Configured with `s|blur,noise,glow,scratch,dust,dust_sprite`. Nothing is
//! drawn until the first configuration arrives.

use std::rc::Rc;

use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{
	message::{Message, Reply},
	noise::{NOISE_FRAMES, NoisePool, NoiseRegistry},
};
use crate::{
	blend,
	error::MessageError,
	sprite::Sprite,
	surface::{Rect, Surface},
};

/// Number of scratch slots
pub const MAX_SCRATCHES: usize = 6;

/// Scratches visible at once
pub const MAX_VISIBLE_SCRATCHES: usize = 4;

/// Number of dust slots
pub const MAX_DUST: usize = 10;

/// Sprite indices accepted for the dust sprite
pub const MAX_SPRITE_NUM: i32 = 1000;

/// Levels set by the `s|` message, clamped to their documented ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OldMovieConfig {
	/// Blur jitter, 0-3
	pub blur: i32,
	/// Grain strength, 0-24
	pub noise: i32,
	/// Flicker strength, 0-24
	pub glow: i32,
	/// Scratch frequency, 0-400
	pub scratch: i32,
	/// Dust frequency, 0-400
	pub dust: i32,
	/// Sprite used for dust, if in range
	pub dust_sprite: Option<usize>,
}

impl OldMovieConfig {
	/// Builds a config from raw message values, clamping each level.
	pub fn from_values([blur, noise, glow, scratch, dust, sprite]: [i32; 6]) -> Self {
		Self {
			blur: blur.clamp(0, 3),
			noise: noise.clamp(0, 24),
			glow: glow.clamp(0, 24),
			scratch: scratch.clamp(0, 400),
			dust: dust.clamp(0, 400),
			dust_sprite: (0..MAX_SPRITE_NUM).contains(&sprite).then_some(sprite as usize),
		}
	}
}

/// One scratch line slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Scratch {
	/// Tint: `64` light, `-64` dark, `0` hidden
	offset: i32,
	x1: i32,
	x2: i32,
	dx: i32,
	time: i32,
}

impl Scratch {
	fn hidden() -> Self {
		Self {
			time: 1,
			..Default::default()
		}
	}

	fn visible(&self) -> bool {
		self.offset != 0
	}

	fn respawn(&mut self, rng: &mut SmallRng, level: i32, width: i32, room: bool) {
		self.time = rng.random_range(0..7) + 3;
		if rng.random_range(0..600) < level && room {
			self.offset = if rng.random_range(0..2) == 1 { 64 } else { -64 };
			self.x1 = rng.random_range(0..(width - 20).max(1)) + 10;
			self.dx = rng.random_range(0..12) - 6;
			self.x2 = self.x1 - self.dx;
		} else {
			self.offset = 0;
		}
	}

	fn update(&mut self, rng: &mut SmallRng, level: i32, width: i32, room: bool) {
		self.time -= 1;
		if self.time <= 0 {
			self.respawn(rng, level, width, room);
		} else if self.visible() {
			self.x1 += self.dx;
			self.x2 += self.dx;
		}
	}

	/// Draws the line from `x1` at the top to `x2` at the bottom.
	fn draw(&self, surface: &mut Surface, clip: Rect) {
		let crosses = (self.x1 >= clip.x || self.x2 >= clip.x) && (self.x1 < clip.right() || self.x2 < clip.right());
		if !self.visible() || !crosses {
			return;
		}

		let dx = (self.x2 - self.x1) as f32 / surface.height().max(1) as f32;
		let mut real_x = self.x1 as f32;
		for _ in 0..clip.y {
			real_x += dx;
		}

		for y in clip.y..clip.bottom() {
			let lx = (real_x + 0.5).floor() as i32;
			if lx >= clip.x
				&& lx < clip.right()
				&& let Some(c) = surface.get(lx, y)
			{
				surface.put(lx, y, blend::offset(c, self.offset));
			}
			real_x += dx;
		}
	}
}

/// One dust speck slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Dust {
	visible: bool,
	x: i32,
	y: i32,
	cell: i32,
}

/// The film degradation layer
#[derive(Debug)]
pub struct OldMovieLayer {
	width: i32,
	height: i32,
	config: OldMovieConfig,
	registry: Rc<NoiseRegistry>,
	pool: Option<Rc<NoisePool>>,
	scratches: [Scratch; MAX_SCRATCHES],
	dust: [Dust; MAX_DUST],
	dust_sprite: Option<Sprite>,
	rx: i32,
	ry: i32,
	ns: usize,
	gv: i32,
	go: i32,
	rng: SmallRng,
	backup: Surface,
}

impl OldMovieLayer {
	/// Creates a layer with its own noise registry.
	pub fn new(width: i32, height: i32) -> Self {
		Self::with_registry(width, height, NoiseRegistry::new())
	}

	/// Creates a layer sharing noise pools through `registry`.
	pub fn with_registry(width: i32, height: i32, registry: Rc<NoiseRegistry>) -> Self {
		Self {
			width,
			height,
			config: OldMovieConfig::default(),
			registry,
			pool: None,
			scratches: [Scratch::hidden(); MAX_SCRATCHES],
			dust: [Dust::default(); MAX_DUST],
			dust_sprite: None,
			rx: 0,
			ry: 0,
			ns: 0,
			gv: 0,
			go: 1,
			rng: SmallRng::from_os_rng(),
			backup: Surface::new(width, height),
		}
	}

	/// Reseeds the layer's RNG.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = SmallRng::seed_from_u64(seed);
		self
	}

	/// Supplies the sprite for dust specks.
	pub fn attach_dust(&mut self, sprite: Sprite) {
		self.dust_sprite = Some(sprite);
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &OldMovieConfig {
		&self.config
	}

	/// Returns `true` once configured.
	pub fn is_initialized(&self) -> bool {
		self.pool.is_some()
	}

	/// Current blur offset.
	pub fn blur_offset(&self) -> (i32, i32) {
		(self.rx, self.ry)
	}

	/// Index of the current noise frame.
	pub fn noise_frame(&self) -> usize {
		self.ns
	}

	/// Index into the glow triangle wave, in `0..=4`.
	pub fn glow_phase(&self) -> i32 {
		self.gv
	}

	/// Number of scratches currently drawn.
	pub fn visible_scratches(&self) -> usize {
		self.scratches.iter().filter(|s| s.visible()).count()
	}

	/// Number of dust specks currently drawn.
	pub fn visible_dust(&self) -> usize {
		self.dust.iter().filter(|d| d.visible).count()
	}

	/// Applies a configuration and (re)acquires the noise pool.
	pub fn configure(&mut self, config: OldMovieConfig) {
		self.config = config;
		self.gv = 0;
		self.go = 1;
		self.rx = 0;
		self.ry = 0;
		self.pool = None;
		self.pool = Some(self.registry.acquire(self.width, self.height, config.noise, &mut self.rng));
		debug!("old movie: {config:?}");
	}

	/// Handles a control message, returning an error instead of logging.
	pub fn try_message(&mut self, text: &str) -> Result<Reply, MessageError> {
		let message = Message::parse(text)?;
		match message.tag() {
			"s" => {
				let config = OldMovieConfig::from_values(message.ints::<6>()?);
				self.configure(config);
				Ok(Reply::default())
			}
			_ => Err(message.unknown()),
		}
	}

	/// Handles a control message. Malformed messages are logged and leave
	/// the layer unchanged.
	pub fn message(&mut self, text: &str) -> Reply {
		self.try_message(text).unwrap_or_else(|e| {
			warn!("old movie: ignoring {text:?}: {e}");
			Reply::default()
		})
	}

	/// Advances one frame.
	pub fn update(&mut self) {
		if !self.is_initialized() {
			return;
		}

		let blur = self.config.blur;
		if blur > 0 {
			let (last_x, last_y) = (self.rx, self.ry);
			loop {
				self.rx = self.rng.random_range(0..=blur) - 1;
				self.ry = self.rng.random_range(0..=blur);
				if (self.rx, self.ry) != (last_x, last_y) {
					break;
				}
			}
		}

		let last_n = self.ns;
		loop {
			self.ns = self.rng.random_range(0..NOISE_FRAMES);
			if self.ns != last_n {
				break;
			}
		}

		self.gv += self.go;
		if self.gv >= 5 {
			self.gv = 3;
			self.go = -1;
		}
		if self.gv < 0 {
			self.gv = 1;
			self.go = 1;
		}

		for i in 0..MAX_SCRATCHES {
			let others = self.scratches.iter().enumerate().filter(|&(j, s)| j != i && s.visible()).count();
			let room = others < MAX_VISIBLE_SCRATCHES;
			self.scratches[i].update(&mut self.rng, self.config.scratch, self.width, room);
		}

		let cells = self.dust_sprite.as_ref().map_or(1, Sprite::cells);
		for dust in &mut self.dust {
			dust.visible = self.rng.random_range(0..600) < self.config.dust;
			dust.x = self.rng.random_range(0..self.width.max(1));
			dust.y = self.rng.random_range(0..self.height.max(1));
			dust.cell = self.rng.random_range(0..cells);
		}
	}

	/// Applies the effect to `clip` of `surface`.
	pub fn refresh(&mut self, surface: &mut Surface, clip: Rect) {
		let Some(pool) = self.pool.clone() else {
			return;
		};
		let clip = clip.intersect(&surface.rect());
		if clip.is_empty() {
			return;
		}

		if self.rx != 0 || self.ry != 0 {
			self.blur(surface, clip);
		}

		if self.config.noise > 0 || self.config.glow > 0 {
			let noise = pool.frame(self.ns);
			let glow = pool.glow((self.gv * self.config.glow / 4) as usize);
			for y in clip.y..clip.bottom() {
				for x in clip.x..clip.right() {
					let Some(mut c) = surface.get(x, y) else {
						continue;
					};
					if self.config.noise > 0 {
						let n = noise.get(x, y).unwrap_or(0);
						c = blend::sub_gray(c, (n & 0xFF) as u8);
					}
					if self.config.glow > 0 {
						c = blend::add_gray(c, glow);
					}
					surface.put(x, y, c);
				}
			}
		}

		if self.config.scratch > 0 {
			for scratch in &self.scratches {
				scratch.draw(surface, clip);
			}
		}

		if self.config.dust > 0
			&& let Some(sprite) = &self.dust_sprite
		{
			for dust in self.dust.iter().filter(|d| d.visible) {
				sprite.stamp(surface, dust.cell, dust.x, dust.y, clip);
			}
		}
	}

	/// Averages each pixel with the one `(rx, ry)` away. Pixels whose
	/// partner lies off the surface keep their value.
	fn blur(&mut self, surface: &mut Surface, clip: Rect) {
		if self.backup.width() != surface.width() || self.backup.height() != surface.height() {
			self.backup = Surface::new(surface.width(), surface.height());
		}
		self.backup.copy_rect(surface, clip);

		for y in clip.y..clip.bottom() {
			for x in clip.x..clip.right() {
				let (Some(own), Some(other)) = (self.backup.get(x, y), self.backup.get(x - self.rx, y - self.ry)) else {
					continue;
				};
				surface.put(x, y, blend::mean(own, other));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn picture(w: i32, h: i32) -> Surface {
		let pixels = (0..w * h).map(|i| 0xFF00_0000 | ((i * 37) as u32 & 0x00FF_FFFF)).collect();
		Surface::from_pixels(w, h, pixels).unwrap()
	}

	#[test]
	fn test_config_clamps() {
		let config = OldMovieConfig::from_values([9, -1, 30, 500, 401, 1000]);
		assert_eq!(
			config,
			OldMovieConfig {
				blur: 3,
				noise: 0,
				glow: 24,
				scratch: 400,
				dust: 400,
				dust_sprite: None,
			}
		);
		assert_eq!(OldMovieConfig::from_values([0, 0, 0, 0, 0, 7]).dust_sprite, Some(7));
	}

	#[test]
	fn test_nothing_happens_before_configuration() {
		let mut layer = OldMovieLayer::new(16, 16).with_seed(1);
		layer.update();
		let mut surface = picture(16, 16);
		let clip = surface.rect();
		layer.refresh(&mut surface, clip);
		assert_eq!(surface, picture(16, 16));
		assert!(!layer.is_initialized());
	}

	#[test_log::test]
	fn test_malformed_messages_are_ignored() {
		let mut layer = OldMovieLayer::new(16, 16).with_seed(1);
		assert_eq!(layer.message("s|1,2,3"), Reply::default());
		assert!(!layer.is_initialized());
		assert!(matches!(layer.try_message("q|1"), Err(MessageError::UnknownTag(_))));
		assert!(matches!(layer.try_message("s|1,2,3,4,5,x"), Err(MessageError::InvalidNumber(_))));
		assert!(!layer.is_initialized());

		layer.message("s|1,2,3,4,5,6");
		assert!(layer.is_initialized());
		assert_eq!(layer.config().scratch, 4);
	}

	#[test]
	fn test_all_zero_levels_leave_frame_untouched() {
		let mut layer = OldMovieLayer::new(32, 24).with_seed(5);
		layer.message("s|0,0,0,0,0,-1");
		assert!(layer.is_initialized());

		for _ in 0..20 {
			layer.update();
			let mut surface = picture(32, 24);
			let clip = surface.rect();
			layer.refresh(&mut surface, clip);
			assert_eq!(surface, picture(32, 24));
		}
	}

	#[test]
	fn test_blur_offset_never_repeats() {
		for blur in 1..=3 {
			let mut layer = OldMovieLayer::new(32, 24).with_seed(blur as u64);
			layer.message(&format!("s|{blur},0,0,0,0,-1"));
			let mut last = layer.blur_offset();
			let mut last_noise = layer.noise_frame();
			for _ in 0..1000 {
				layer.update();
				let (rx, ry) = layer.blur_offset();
				assert_ne!((rx, ry), last);
				assert!((-1..blur).contains(&rx) && (0..=blur).contains(&ry));
				assert_ne!(layer.noise_frame(), last_noise);
				last = (rx, ry);
				last_noise = layer.noise_frame();
			}
		}
	}

	#[test]
	fn test_glow_bounces() {
		let mut layer = OldMovieLayer::new(8, 8).with_seed(2);
		layer.message("s|0,0,10,0,0,-1");
		let phases: Vec<i32> = (0..10)
			.map(|_| {
				layer.update();
				layer.glow_phase()
			})
			.collect();
		assert_eq!(phases, [1, 2, 3, 4, 3, 2, 1, 0, 1, 2]);
	}

	#[test]
	fn test_scratches_are_capped() {
		let mut layer = OldMovieLayer::new(64, 32).with_seed(9);
		layer.message("s|0,0,0,400,0,-1");
		let mut seen = 0;
		for _ in 0..500 {
			layer.update();
			assert!(layer.visible_scratches() <= MAX_VISIBLE_SCRATCHES);
			seen = seen.max(layer.visible_scratches());
		}
		assert!(seen > 0);
	}

	#[test]
	fn test_blur_averages_and_keeps_edges() {
		let mut layer = OldMovieLayer::new(4, 1).with_seed(1);
		layer.message("s|0,0,0,0,0,-1");
		layer.rx = -1;
		let mut surface = Surface::from_pixels(4, 1, vec![0xFF00_0000, 0xFF00_0010, 0xFF00_0020, 0xFF00_0030]).unwrap();
		let clip = surface.rect();
		layer.refresh(&mut surface, clip);
		// each pixel averages with its right neighbour; the last column has none
		assert_eq!(surface.pixels(), &[0xFF00_0008, 0xFF00_0018, 0xFF00_0028, 0xFF00_0030]);
	}

	#[test]
	fn test_noise_darkens_and_glow_brightens() {
		let mut layer = OldMovieLayer::new(16, 16).with_seed(4);
		layer.message("s|0,24,0,0,0,-1");
		layer.update();
		let mut surface = Surface::filled(16, 16, 0xFF80_8080);
		let clip = surface.rect();
		layer.refresh(&mut surface, clip);
		assert!(surface.pixels().iter().all(|&p| p & 0xFF <= 0x80 && p >> 24 == 0xFF));
		assert!(surface.pixels().iter().any(|&p| p & 0xFF < 0x80));

		let mut layer = OldMovieLayer::new(16, 16).with_seed(4);
		layer.message("s|0,0,24,0,0,-1");
		layer.update();
		let mut surface = Surface::filled(16, 16, 0xFF80_8080);
		let clip = surface.rect();
		layer.refresh(&mut surface, clip);
		// gv = 1: row 6, level 6 * 30 / 25 + 4 = 11
		assert!(surface.pixels().iter().all(|&p| p == 0xFF8B_8B8B));
	}

	#[test]
	fn test_dust_needs_a_sprite() {
		let mut layer = OldMovieLayer::new(16, 16).with_seed(4);
		layer.message("s|0,0,0,0,400,-1");
		for _ in 0..5 {
			layer.update();
		}
		let mut surface = picture(16, 16);
		let clip = surface.rect();
		layer.refresh(&mut surface, clip);
		assert_eq!(surface, picture(16, 16));

		layer.attach_dust(Sprite::new(Surface::filled(2, 2, 0xFFFF_FFFF), 1));
		while layer.visible_dust() == 0 {
			layer.update();
		}
		let clip = surface.rect();
		layer.refresh(&mut surface, clip);
		assert!(surface.pixels().contains(&0xFFFF_FFFF));
	}

	#[test]
	fn test_layers_share_noise_pools() {
		let registry = NoiseRegistry::new();
		let mut a = OldMovieLayer::with_registry(8, 8, registry.clone());
		let mut b = OldMovieLayer::with_registry(8, 8, registry.clone());
		a.message("s|0,5,0,0,0,-1");
		b.message("s|0,5,0,0,0,-1");
		assert_eq!(registry.live_pools(), 1);
		drop(a);
		assert_eq!(registry.live_pools(), 1);
		drop(b);
		assert_eq!(registry.live_pools(), 0);
	}
}
