//! Per-frame overlays drawn on top of the composed scene.
//!
//! A layer is advanced with `update` once per frame, steered by short text
//! messages of the form `tag|a,b,c`, and drawn with `refresh`.

mod furu;
mod message;
mod noise;
mod old_movie;

pub use furu::{FuruLayer, FuruParams, MAX_ELEMENTS, Particle, ParticleRing, RING_CAPACITY};
pub use message::{FIELD_SEPARATOR, Message, Reply, TAG_SEPARATOR};
pub use noise::{GLOW_LEVELS, NOISE_FRAMES, NoisePool, NoiseRegistry};
pub use old_movie::{MAX_DUST, MAX_SCRATCHES, MAX_VISIBLE_SCRATCHES, OldMovieConfig, OldMovieLayer};

use crate::{
	error::MessageError,
	surface::{Rect, Surface},
};

/// A layer effect
#[derive(Debug)]
pub enum Layer {
	/// Film grain, glow, scratches and dust
	OldMovie(OldMovieLayer),

	/// Falling snow or petals
	Furu(FuruLayer),
}

impl Layer {
	/// Advances the layer by one frame.
	pub fn update(&mut self) {
		match self {
			Layer::OldMovie(layer) => layer.update(),
			Layer::Furu(layer) => layer.update(),
		}
	}

	/// Sends a control message, returning an error instead of logging.
	pub fn try_message(&mut self, text: &str) -> Result<Reply, MessageError> {
		match self {
			Layer::OldMovie(layer) => layer.try_message(text),
			Layer::Furu(layer) => layer.try_message(text),
		}
	}

	/// Sends a control message. Malformed messages are logged and ignored.
	pub fn message(&mut self, text: &str) -> Reply {
		match self {
			Layer::OldMovie(layer) => layer.message(text),
			Layer::Furu(layer) => layer.message(text),
		}
	}

	/// Draws the layer into `surface` within `clip`.
	pub fn refresh(&mut self, surface: &mut Surface, clip: Rect) {
		match self {
			Layer::OldMovie(layer) => layer.refresh(surface, clip),
			Layer::Furu(layer) => layer.refresh(surface, clip),
		}
	}
}

impl From<OldMovieLayer> for Layer {
	fn from(layer: OldMovieLayer) -> Self {
		Layer::OldMovie(layer)
	}
}

impl From<FuruLayer> for Layer {
	fn from(layer: FuruLayer) -> Self {
		Layer::Furu(layer)
	}
}
