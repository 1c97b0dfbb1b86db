//! Transition and layer CLI utility
//!
//! Renders every frame of a transition, or a run of overlay frames, to PNG
//! files so the output can be inspected frame by frame.
//!
//! # Usage Examples
//!
//! ```bash
//! # Cross-fade between two pictures over 500 ms
//! cargo run --example effect_utils -- transition a.png b.png --effect 10 --duration 500 -o frames/
//!
//! # Whirl plugin
//! cargo run --example effect_utils -- transition a.png b.png --effect 99 --image whirl.dll -o frames/
//!
//! # Mask fade
//! cargo run --example effect_utils -- transition a.png b.png --effect 15 --mask mask.png -o frames/
//!
//! # Thirty frames of old film
//! cargo run --example effect_utils -- old-movie a.png --params 2,12,12,200,0,-1 -n 30 -o frames/
//!
//! # Snow with one flake image
//! cargo run --example effect_utils -- furu a.png --element flake.png --params 4,3,1,0,0 -n 120 -o frames/
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ons_rs::prelude::*;

#[derive(Parser)]
#[command(name = "effect_utils")]
#[command(author = "ons-rs project")]
#[command(version = "1.0")]
#[command(about = "Effect utility - render transitions and layers to PNG frames", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Render a transition from one picture to another
	Transition {
		/// Starting picture
		#[arg(value_name = "FROM")]
		from: PathBuf,

		/// Target picture, resized to the starting picture
		#[arg(value_name = "TO")]
		to: PathBuf,

		/// Effect number
		#[arg(short, long, default_value_t = 10)]
		effect: i32,

		/// Duration in milliseconds
		#[arg(short, long, default_value_t = 500)]
		duration: i32,

		/// Custom parameter (quake strength)
		#[arg(long, default_value_t = 0)]
		no: i32,

		/// Plugin name such as `cascade.dll/ux`
		#[arg(long, value_name = "NAME")]
		image: Option<String>,

		/// Mask picture for effects 15 and 18
		#[arg(long, value_name = "FILE")]
		mask: Option<PathBuf>,

		/// Milliseconds between rendered frames
		#[arg(long, default_value_t = 17)]
		step: u64,

		/// Output directory
		#[arg(short, long, value_name = "OUTPUT_DIR", default_value = "frames")]
		output: PathBuf,
	},

	/// Render frames of the old-movie layer over a picture
	OldMovie {
		/// Background picture
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// `blur,noise,glow,scratch,dust,dust_sprite`
		#[arg(short, long, default_value = "2,12,12,200,0,-1")]
		params: String,

		/// Dust sprite image
		#[arg(long, value_name = "FILE")]
		dust: Option<PathBuf>,

		/// Number of frames
		#[arg(short = 'n', long, default_value_t = 30)]
		frames: usize,

		/// Output directory
		#[arg(short, long, value_name = "OUTPUT_DIR", default_value = "frames")]
		output: PathBuf,
	},

	/// Render frames of falling snow or petals over a picture
	Furu {
		/// Background picture
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Element pictures (up to three)
		#[arg(short, long, value_name = "FILE")]
		element: Vec<PathBuf>,

		/// `interval,fall_velocity,wind,amplitude,period`
		#[arg(short, long, default_value = "4,3,1,0,0")]
		params: String,

		/// Split elements into square animation cells
		#[arg(short, long)]
		tumbling: bool,

		/// Number of frames
		#[arg(short = 'n', long, default_value_t = 120)]
		frames: usize,

		/// Output directory
		#[arg(short, long, value_name = "OUTPUT_DIR", default_value = "frames")]
		output: PathBuf,
	},
}

fn load_surface(path: &Path) -> Result<Surface> {
	let image = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	Ok(Surface::from(&image.to_rgba8()))
}

fn load_resized(path: &Path, width: i32, height: i32) -> Result<Surface> {
	let image = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	let image = image.resize_exact(width as u32, height as u32, image::imageops::FilterType::Triangle);
	Ok(Surface::from(&image.to_rgba8()))
}

fn save_frame(surface: &Surface, dir: &Path, index: usize) -> Result<()> {
	let path = dir.join(format!("frame_{index:04}.png"));
	surface.to_rgba_image().save(&path).with_context(|| format!("failed to write {}", path.display()))?;
	Ok(())
}

fn handle_transition(
	from: &Path,
	to: &Path,
	mut link: EffectLink,
	mask: Option<&Path>,
	step: u64,
	output: &Path,
) -> Result<()> {
	let start = load_surface(from)?;
	let (width, height) = (start.width(), start.height());
	let target = load_resized(to, width, height)?;

	let mut scene = StaticScene::new(target);
	if let Some(mask) = mask {
		scene = scene.with_mask(load_surface(mask)?);
	}

	let mut surfaces = Surfaces::new(width, height);
	*surfaces.get_mut(Role::Accumulation) = start;
	surfaces.dirty.fill();

	let clock = ManualClock::new(0);
	let mut executor = EffectExecutor::with_clock(&clock, Geometry::default()).with_frame_interval(step.max(1));
	std::fs::create_dir_all(output)?;

	let mut status = executor.set_effect(&mut link, EffectDst::Generate, false, &mut surfaces, &mut scene);
	let mut frames = 0;
	save_frame(surfaces.get(Role::Accumulation), output, frames)?;
	while status == EffectStatus::Wait {
		status = executor.do_effect(&link, false, &mut surfaces, &mut scene);
		frames += 1;
		save_frame(surfaces.get(Role::Accumulation), output, frames)?;
	}

	println!("Rendered {} frames of effect {} to {}", frames + 1, link.effect, output.display());
	Ok(())
}

fn render_layer(mut layer: Layer, background: &Surface, frames: usize, output: &Path) -> Result<()> {
	std::fs::create_dir_all(output)?;
	for index in 0..frames {
		let mut frame = background.clone();
		layer.update();
		layer.refresh(&mut frame, background.rect());
		save_frame(&frame, output, index)?;
	}
	println!("Rendered {frames} frames to {}", output.display());
	Ok(())
}

fn configure(layer: &mut Layer, params: &str) -> Result<()> {
	layer.try_message(&format!("s|{params}")).with_context(|| format!("invalid parameters {params:?}"))?;
	Ok(())
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
	let cli = Cli::parse();

	match cli.command {
		Commands::Transition {
			from,
			to,
			effect,
			duration,
			no,
			image,
			mask,
			step,
			output,
		} => {
			let mut link = EffectLink::new(effect, duration).with_no(no);
			if let Some(image) = image {
				link = link.with_image(image);
			}
			handle_transition(&from, &to, link, mask.as_deref(), step, &output)
		}

		Commands::OldMovie {
			input,
			params,
			dust,
			frames,
			output,
		} => {
			let background = load_surface(&input)?;
			let mut old_movie = OldMovieLayer::new(background.width(), background.height());
			if let Some(dust) = dust {
				old_movie.attach_dust(Sprite::new(load_surface(&dust)?, 1));
			}
			let mut layer = Layer::from(old_movie);
			configure(&mut layer, &params)?;
			render_layer(layer, &background, frames, &output)
		}

		Commands::Furu {
			input,
			element,
			params,
			tumbling,
			frames,
			output,
		} => {
			if element.len() > ons_rs::ons_fx::layer::MAX_ELEMENTS {
				bail!("at most {} elements are supported", ons_rs::ons_fx::layer::MAX_ELEMENTS);
			}
			let background = load_surface(&input)?;
			let mut furu = FuruLayer::new(background.width(), background.height(), tumbling);
			for (index, path) in element.iter().enumerate() {
				furu.set_element(index, load_surface(path)?);
			}
			let mut layer = Layer::from(furu);
			configure(&mut layer, &params)?;
			render_layer(layer, &background, frames, &output)
		}
	}
}
