#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `ons-rs` is the asset decoding and frame compositing core of a visual novel player.
//!
//! - [`ons_types`]: key table, bit reader, SPB / LZSS / NBZ decoders
//! - [`ons_vfs`]: search paths and file name resolution behind [`DirectReader`](ons_vfs::DirectReader)
//! - [`ons_fx`]: transitions and overlay layers
//! - [`Config`]: TOML and environment configuration
//!
pub use ons_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use ons_dylib;
