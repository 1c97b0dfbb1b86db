//! Prelude module for `ons_internal`.
//!
//! # Examples
//!
//! ```rust
//! use ons_internal::prelude::*;
//!
//! let config = Config::default();
//! let mut surfaces = config.surfaces();
//! let mut executor = config.executor();
//! let mut scene = StaticScene::new(Surface::new(config.screen.width, config.screen.height));
//! let mut link = EffectLink::new(1, 0);
//! let status = executor.set_effect(&mut link, EffectDst::Generate, false, &mut surfaces, &mut scene);
//! assert_eq!(status, EffectStatus::Wait);
//! ```

#[doc(inline)]
pub use crate::{Config, ConfigError};

#[doc(inline)]
pub use ons_types::prelude::*;

#[doc(inline)]
pub use ons_vfs::prelude::*;

#[doc(inline)]
pub use ons_fx::prelude::*;
