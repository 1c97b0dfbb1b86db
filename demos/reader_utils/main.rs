//! Asset reader CLI utility
//!
//! Looks up files the way the player does: through an ordered list of search
//! paths, with name transcoding, case-insensitive fallback and SPB / NBZ
//! decoding.
//!
//! # Usage Examples
//!
//! ```bash
//! # Show where a name resolves and its decoded length
//! cargo run --example reader_utils -- --paths "data;patch" info bg/title.spb
//!
//! # Read a file (decoded) and write it out
//! cargo run --example reader_utils -- --paths data extract bg/title.spb -o title.bmp
//!
//! # Decode a standalone SPB file to PNG
//! cargo run --example reader_utils -- spb title.spb -o title.png
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ons_rs::{Config, prelude::*};

#[derive(Parser)]
#[command(name = "reader_utils")]
#[command(author = "ons-rs project")]
#[command(version = "1.0")]
#[command(about = "Asset reader utility - resolve, extract and decode game files", long_about = None)]
struct Cli {
	/// Configuration file
	#[arg(short, long, global = true, value_name = "FILE", default_value = "ons.toml")]
	config: PathBuf,

	/// Search paths separated by `;`, overriding the configuration
	#[arg(short, long, global = true, value_name = "PATHS", env = "ONS_PATHS")]
	paths: Option<String>,

	/// Key table file, overriding the configuration
	#[arg(short, long, global = true, value_name = "FILE")]
	key_table: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Resolve a name and print its path, compression and length
	Info {
		/// Asset names as written in the script
		#[arg(value_name = "NAMES", required = true)]
		names: Vec<String>,
	},

	/// Read an asset (decoding it) and write the bytes to a file
	Extract {
		/// Asset name as written in the script
		#[arg(value_name = "NAME")]
		name: String,

		/// Output file
		#[arg(short, long, value_name = "OUTPUT")]
		output: PathBuf,
	},

	/// Decode a standalone SPB file; the output format follows its extension
	Spb {
		/// Input SPB file
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output image (.bmp is written as decoded, anything else is converted)
		#[arg(short, long, value_name = "OUTPUT")]
		output: PathBuf,

		/// Print the header
		#[arg(short, long)]
		verbose: bool,
	},
}

/// Script names are Shift_JIS; command-line arguments arrive as UTF-8.
fn script_name(name: &str) -> Vec<u8> {
	let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(name);
	if had_errors {
		log::warn!("{name:?} has characters outside Shift_JIS, using UTF-8 bytes");
		return name.as_bytes().to_vec();
	}
	bytes.into_owned()
}

fn build_reader(cli: &Cli) -> Result<DirectReader> {
	let mut config = Config::load(&cli.config).context("failed to load configuration")?;
	if let Some(paths) = &cli.paths {
		config.reader.paths = ArchivePaths::parse(paths).iter().map(PathBuf::from).collect();
	}
	if let Some(key_table) = &cli.key_table {
		config.reader.key_table = Some(key_table.clone());
	}
	Ok(config.direct_reader()?)
}

fn handle_info(reader: &DirectReader, names: &[String]) -> Result<()> {
	println!("Search paths: {}", reader.paths());
	let mut missing = 0;
	for name in names {
		match reader.resolve(&script_name(name)) {
			Some(resolved) => println!(
				"{name}\n  path:        {}\n  compression: {}\n  length:      {} bytes",
				resolved.path.display(),
				resolved.compression,
				resolved.length
			),
			None => {
				println!("{name}\n  not found");
				missing += 1;
			}
		}
	}
	if missing > 0 {
		bail!("{missing} of {} names could not be resolved", names.len());
	}
	Ok(())
}

fn handle_extract(reader: &DirectReader, name: &str, output: &PathBuf) -> Result<()> {
	let data = reader.read_file(&script_name(name)).with_context(|| format!("{name} not found"))?;
	std::fs::write(output, &data).with_context(|| format!("failed to write {}", output.display()))?;
	println!("Wrote {} bytes to {}", data.len(), output.display());
	Ok(())
}

fn handle_spb(input: &PathBuf, output: &PathBuf, key: &KeyTable, verbose: bool) -> Result<()> {
	let mut file = std::fs::File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
	let image = SpbFile::from_reader(&mut file, key)?;
	if verbose {
		println!("{}", image.header());
	}

	let is_bmp = output.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
	if is_bmp {
		std::fs::write(output, image.bitmap())?;
	} else {
		image::load_from_memory(image.bitmap())?.save(output)?;
	}
	println!("Decoded {} to {}", input.display(), output.display());
	Ok(())
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
	let cli = Cli::parse();

	match &cli.command {
		Commands::Info {
			names,
		} => handle_info(&build_reader(&cli)?, names),
		Commands::Extract {
			name,
			output,
		} => handle_extract(&build_reader(&cli)?, name, output),
		Commands::Spb {
			input,
			output,
			verbose,
		} => {
			let key = build_reader(&cli)?.key().clone();
			handle_spb(input, output, &key, *verbose)
		}
	}
}
