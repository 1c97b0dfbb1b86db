//! Frame compositing for `ons-rs`: full-screen transitions and overlay layers.
//!
//! Pixels are `0xAARRGGBB` words in a [`Surface`]. Transitions run on an
//! [`EffectExecutor`](effect::EffectExecutor) over a fixed set of working
//! [`Surfaces`](effect::Surfaces); overlays are [`Layer`](layer::Layer)s
//! that draw into the finished frame.
//!
//! ```
//! use ons_fx::prelude::*;
//!
//! let mut layer = FuruLayer::new(640, 480, false).with_seed(7);
//! layer.message("s|4,3,1,0,0");
//! for _ in 0..8 {
//! 	layer.update();
//! }
//! assert_eq!(layer.message("n").value, 2);
//! ```

pub mod blend;
pub mod clock;
pub mod effect;
mod error;
pub mod layer;
mod sprite;
mod surface;

pub use error::{MessageError, SpriteError};
pub use sprite::Sprite;
pub use surface::{BLACK, Rect, Surface};

/// `use ons_fx::prelude::*;` to import commonly used items.
pub mod prelude {
	#[doc(inline)]
	pub use crate::{
		MessageError, Rect, Sprite, SpriteError, Surface,
		clock::{Clock, ManualClock, SystemClock},
		effect::{
			Compositor, Direction, EffectDst, EffectExecutor, EffectKind, EffectLink, EffectStatus, Geometry,
			RefreshMode, Role, StaticScene, Surfaces,
		},
		layer::{FuruLayer, Layer, OldMovieConfig, OldMovieLayer, Reply},
	};
}
