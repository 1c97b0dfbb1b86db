//! Shared noise frames and glow levels for the old-movie layer.
//!
//! Pools are handed out as [`Rc`] handles. The registry keeps only weak
//! references, so a pool is freed when the last layer holding it is
//! dropped, and rebuilt on the next request.

use std::{
	cell::RefCell,
	collections::HashMap,
	rc::{Rc, Weak},
};

use log::debug;
use rand::{Rng, rngs::SmallRng};

use crate::surface::Surface;

/// Number of pre-rendered noise frames
pub const NOISE_FRAMES: usize = 10;

/// Number of glow levels
pub const GLOW_LEVELS: usize = 25;

/// Grey level of glow row `index`.
pub fn glow_level(index: usize) -> u8 {
	(index * 30 / GLOW_LEVELS + 4) as u8
}

/// Noise frames for one screen size and noise level
#[derive(Debug)]
pub struct NoisePool {
	frames: Vec<Surface>,
	glow: [u8; GLOW_LEVELS],
}

impl NoisePool {
	fn generate(width: i32, height: i32, level: i32, rng: &mut SmallRng) -> Self {
		let frames = (0..NOISE_FRAMES)
			.map(|_| {
				let pixels = (0..width.max(0) as usize * height.max(0) as usize)
					.map(|_| {
						let v = (rng.random_range(0..=level.max(0) as u32) * 2).min(255);
						(v << 16) | (v << 8) | v
					})
					.collect();
				Surface::from_pixels(width, height, pixels).unwrap_or_else(|| Surface::new(0, 0))
			})
			.collect();

		Self {
			frames,
			glow: std::array::from_fn(glow_level),
		}
	}

	/// Returns noise frame `index` (taken modulo the frame count).
	pub fn frame(&self, index: usize) -> &Surface {
		&self.frames[index % self.frames.len()]
	}

	/// Returns the grey level of glow row `index` (clamped).
	pub fn glow(&self, index: usize) -> u8 {
		self.glow[index.min(GLOW_LEVELS - 1)]
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PoolKey {
	width: i32,
	height: i32,
	level: i32,
}

/// Hands out shared [`NoisePool`]s
#[derive(Debug, Default)]
pub struct NoiseRegistry {
	pools: RefCell<HashMap<PoolKey, Weak<NoisePool>>>,
}

impl NoiseRegistry {
	/// Creates an empty registry.
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	/// Returns the pool for the given size and level, generating it if no
	/// live layer holds one.
	pub fn acquire(&self, width: i32, height: i32, level: i32, rng: &mut SmallRng) -> Rc<NoisePool> {
		let key = PoolKey {
			width,
			height,
			level,
		};
		let mut pools = self.pools.borrow_mut();
		pools.retain(|_, pool| pool.strong_count() > 0);

		if let Some(pool) = pools.get(&key).and_then(Weak::upgrade) {
			return pool;
		}

		debug!("generating noise pool {width}x{height} level {level}");
		let pool = Rc::new(NoisePool::generate(width, height, level, rng));
		pools.insert(key, Rc::downgrade(&pool));
		pool
	}

	/// Number of pools still held by a layer.
	pub fn live_pools(&self) -> usize {
		self.pools.borrow().values().filter(|pool| pool.strong_count() > 0).count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	#[test]
	fn test_glow_levels() {
		assert_eq!(glow_level(0), 4);
		assert_eq!(glow_level(24), 32);
	}

	#[test]
	fn test_noise_range() {
		let mut rng = SmallRng::seed_from_u64(3);
		let pool = NoisePool::generate(16, 4, 5, &mut rng);
		for i in 0..NOISE_FRAMES {
			for &p in pool.frame(i).pixels() {
				let v = p & 0xFF;
				assert!(v <= 10 && v % 2 == 0);
				assert_eq!(p >> 24, 0);
				assert_eq!((p >> 8) & 0xFF, v);
			}
		}
	}

	#[test]
	fn test_pools_are_shared_and_released() {
		let registry = NoiseRegistry::new();
		let mut rng = SmallRng::seed_from_u64(1);

		let a = registry.acquire(8, 8, 3, &mut rng);
		let b = registry.acquire(8, 8, 3, &mut rng);
		assert!(Rc::ptr_eq(&a, &b));
		assert_eq!(registry.live_pools(), 1);

		let c = registry.acquire(8, 8, 4, &mut rng);
		assert_eq!(registry.live_pools(), 2);

		drop(a);
		assert_eq!(registry.live_pools(), 2);
		drop(b);
		drop(c);
		assert_eq!(registry.live_pools(), 0);
	}
}
