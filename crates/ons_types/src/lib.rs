//! This crate provides the byte-level codecs and asset decoders used by `ons-rs`.
//!
//! # File Formats
//!
//! - **SPB**: planar delta/run-length images, decoded to an in-memory 24-bit bitmap
//! - **NBZ**: bzip2 payload behind a big-endian length prefix
//! - **LZSS**: 256-byte window back-reference compression
//!
//! Every byte read from an asset passes through a [`KeyTable`](file::KeyTable),
//! which is the identity table for unobfuscated games.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use ons_types::prelude::*;
//!
//! let image = SpbFile::open("title.spb").unwrap();
//! println!("{}", image.header());
//! ```
//!
//! Or decode from any reader:
//!
//! ```
//! use ons_types::file::{KeyTable, lzss};
//!
//! // a single literal token: flag bit 1 then 0x41
//! let data = [0b1010_0000, 0b1000_0000];
//! let out = lzss::decode(&data[..], &KeyTable::identity(), 1);
//! assert_eq!(out, b"A");
//! ```

pub mod file;

/// `use ons_types::prelude::*;` to import commonly used items.
pub mod prelude;
