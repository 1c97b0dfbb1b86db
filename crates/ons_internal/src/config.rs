//! Engine configuration.
//!
//! Settings come from a TOML file, overridden by `ONS_`-prefixed
//! environment variables with `__` between keys, e.g.
//! `ONS_SCREEN__WIDTH=800` or `ONS_READER__PATHS="data;patch"`.
//!
//! ```toml
//! [reader]
//! paths = ["data", "patch"]
//! key_table = "key.bin"
//!
//! [screen]
//! width = 640
//! height = 480
//! ratio1 = 1
//! ratio2 = 1
//!
//! [effect]
//! frame_interval_ms = 17
//! ```

use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat, builder::DefaultState};
use log::{debug, info};
use ons_fx::effect::{EffectExecutor, FRAME_INTERVAL_MS, Geometry, Surfaces};
use ons_types::file::{DecodeError, KeyTable};
use ons_vfs::{ArchivePaths, DirectReader, PATH_LIST_SEPARATOR};
use serde::Deserialize;
use thiserror::Error;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ONS";

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A source could not be read or deserialised
	#[error(transparent)]
	Source(#[from] config::ConfigError),

	/// A value is out of range
	#[error("Invalid {key}: {reason}")]
	Invalid {
		/// Dotted key of the offending value
		key: &'static str,
		/// What is wrong with it
		reason: String,
	},

	/// The key table file could not be read
	#[error("Failed to read key table {path}: {source}")]
	KeyTableIo {
		/// Path of the key table
		path: PathBuf,
		/// Underlying I/O error
		source: std::io::Error,
	},

	/// The key table file is too short
	#[error("Invalid key table {path}: {source}")]
	KeyTable {
		/// Path of the key table
		path: PathBuf,
		/// Underlying decode error
		source: DecodeError,
	},
}

/// Asset lookup settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct ReaderConfig {
	/// Search paths, in order. Empty means the current directory.
	pub paths: Vec<PathBuf>,

	/// Optional 256-byte substitution table applied to every asset byte
	pub key_table: Option<PathBuf>,
}

/// Screen geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
	/// Width in pixels
	pub width: i32,
	/// Height in pixels
	pub height: i32,
	/// Geometry scale numerator
	pub ratio1: i32,
	/// Geometry scale denominator
	pub ratio2: i32,
}

impl Default for ScreenConfig {
	fn default() -> Self {
		Self {
			width: 640,
			height: 480,
			ratio1: 1,
			ratio2: 1,
		}
	}
}

/// Transition settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
	/// Minimum time between transition frames
	pub frame_interval_ms: u64,
}

impl Default for EffectConfig {
	fn default() -> Self {
		Self {
			frame_interval_ms: FRAME_INTERVAL_MS,
		}
	}
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
	/// Asset lookup
	pub reader: ReaderConfig,
	/// Screen geometry
	pub screen: ScreenConfig,
	/// Transitions
	pub effect: EffectConfig,
}

impl Config {
	/// Loads `path` (if it exists) and applies environment overrides.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		info!("Loading configuration from {}", path.display());
		Self::build(config::Config::builder().add_source(File::from(path).required(false)), environment())
	}

	/// Parses TOML text and applies environment overrides.
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		Self::from_toml_with_env(text, environment())
	}

	/// Parses TOML text and applies overrides from `env`.
	pub fn from_toml_with_env(text: &str, env: Environment) -> Result<Self, ConfigError> {
		Self::build(config::Config::builder().add_source(File::from_str(text, FileFormat::Toml)), env)
	}

	fn build(builder: config::ConfigBuilder<DefaultState>, env: Environment) -> Result<Self, ConfigError> {
		let config: Self = builder.add_source(env).build()?.try_deserialize()?;
		config.validate()?;
		debug!("{config:?}");
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let positive = [
			("screen.width", self.screen.width),
			("screen.height", self.screen.height),
			("screen.ratio1", self.screen.ratio1),
			("screen.ratio2", self.screen.ratio2),
		];
		for (key, value) in positive {
			if value <= 0 {
				return Err(ConfigError::Invalid {
					key,
					reason: format!("must be positive, got {value}"),
				});
			}
		}
		Ok(())
	}

	/// Reads the configured key table, or the identity table if none is set.
	pub fn key_table(&self) -> Result<KeyTable, ConfigError> {
		let Some(path) = &self.reader.key_table else {
			return Ok(KeyTable::identity());
		};
		let data = std::fs::read(path).map_err(|source| ConfigError::KeyTableIo {
			path: path.clone(),
			source,
		})?;
		KeyTable::from_bytes(&data).map_err(|source| ConfigError::KeyTable {
			path: path.clone(),
			source,
		})
	}

	/// Builds a reader over the configured search paths.
	pub fn direct_reader(&self) -> Result<DirectReader, ConfigError> {
		let paths = ArchivePaths::new(self.reader.paths.iter().cloned());
		Ok(DirectReader::new(paths, self.key_table()?))
	}

	/// Allocates the compositing surfaces at screen size.
	pub fn surfaces(&self) -> Surfaces {
		Surfaces::new(self.screen.width, self.screen.height)
	}

	/// Returns the stripe and quake sizes scaled to the screen ratio.
	pub fn geometry(&self) -> Geometry {
		Geometry::new(self.screen.ratio1, self.screen.ratio2)
	}

	/// Builds a transition executor on the wall clock.
	pub fn executor(&self) -> EffectExecutor {
		EffectExecutor::new(self.geometry()).with_frame_interval(self.effect.frame_interval_ms)
	}
}

fn environment() -> Environment {
	Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("_")
		.separator("__")
		.try_parsing(true)
		.list_separator(&PATH_LIST_SEPARATOR.to_string())
		.with_list_parse_key("reader.paths")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn no_env() -> Environment {
		environment().source(Some(HashMap::new()))
	}

	#[test]
	fn test_defaults() {
		let config = Config::from_toml_with_env("", no_env()).unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.screen.width, 640);
		assert_eq!(config.effect.frame_interval_ms, 17);
		assert!(!config.key_table().unwrap().is_keyed());
	}

	#[test]
	fn test_toml_sections() {
		let text = r#"
			[reader]
			paths = ["data", "patch"]

			[screen]
			width = 800
			height = 600
			ratio1 = 2
			ratio2 = 1

			[effect]
			frame_interval_ms = 10
		"#;
		let config = Config::from_toml_with_env(text, no_env()).unwrap();
		assert_eq!(config.reader.paths, vec![PathBuf::from("data"), PathBuf::from("patch")]);
		assert_eq!(config.screen.width, 800);
		assert_eq!(config.geometry(), Geometry::new(2, 1));
		assert_eq!(config.effect.frame_interval_ms, 10);

		let surfaces = config.surfaces();
		assert_eq!((surfaces.width(), surfaces.height()), (800, 600));
	}

	#[test]
	fn test_environment_overrides_file() {
		let env = environment().source(Some(HashMap::from([
			("ONS_SCREEN__WIDTH".to_string(), "320".to_string()),
			("ONS_READER__PATHS".to_string(), "a;b".to_string()),
		])));
		let config = Config::from_toml_with_env("[screen]\nwidth = 800\nheight = 200\n", env).unwrap();
		assert_eq!(config.screen.width, 320);
		assert_eq!(config.screen.height, 200);
		assert_eq!(config.reader.paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
	}

	#[test]
	fn test_rejects_zero_size() {
		let result = Config::from_toml_with_env("[screen]\nheight = 0\n", no_env());
		assert!(matches!(
			result,
			Err(ConfigError::Invalid {
				key: "screen.height",
				..
			})
		));
	}

	#[test]
	fn test_key_table_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("key.bin");
		let table: Vec<u8> = (0..=255u8).map(|b| b ^ 0x5A).collect();
		std::fs::write(&path, &table).unwrap();

		let mut config = Config::default();
		config.reader.key_table = Some(path.clone());
		let key = config.key_table().unwrap();
		assert!(key.is_keyed());
		assert_eq!(key.decode(0), 0x5A);

		std::fs::write(&path, [0u8; 10]).unwrap();
		assert!(matches!(config.key_table(), Err(ConfigError::KeyTable { .. })));

		config.reader.key_table = Some(dir.path().join("missing.bin"));
		assert!(matches!(config.direct_reader(), Err(ConfigError::KeyTableIo { .. })));
	}

	#[test]
	fn test_load_missing_file_uses_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ons.toml");
		std::fs::write(&path, "[effect]\nframe_interval_ms = 5\n").unwrap();
		let config = Config::load(&path).unwrap();
		assert_eq!(config.effect.frame_interval_ms, 5);
		assert_eq!(config.executor().geometry(), &Geometry::default());
	}
}
