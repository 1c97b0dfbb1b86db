//! Logical file name handling.
//!
//! Script file names are raw Shift_JIS bytes. Separators are normalised
//! without looking inside two-byte sequences, because the trail byte of a
//! Shift_JIS character may be `0x5C` (`\`).

use std::{
	ffi::OsString,
	path::{Component, MAIN_SEPARATOR, Path, PathBuf},
};

use encoding_rs::{EUC_JP, SHIFT_JIS};

/// Names are truncated to this many bytes
pub const MAX_FILE_NAME_LENGTH: usize = 256;

/// Platform path delimiter as a byte
pub const DELIMITER: u8 = MAIN_SEPARATOR as u8;

/// Returns `true` if `byte` starts a two-byte sequence.
#[inline]
pub fn is_two_byte(byte: u8) -> bool {
	(byte & 0xE0) == 0xE0 || (byte & 0xE0) == 0x80
}

/// Truncates `name` and rewrites `/` and `\` to [`DELIMITER`].
pub fn normalize(name: &[u8]) -> Vec<u8> {
	let mut out = name[..name.len().min(MAX_FILE_NAME_LENGTH)].to_vec();

	let mut i = 0;
	while i < out.len() {
		if is_two_byte(out[i]) {
			i += 1;
		} else if out[i] == b'/' || out[i] == b'\\' {
			out[i] = DELIMITER;
		}
		i += 1;
	}

	out
}

/// Re-encodes a Shift_JIS name as UTF-8, or `None` if it is not valid
/// Shift_JIS.
pub fn sjis_to_utf8(name: &[u8]) -> Option<Vec<u8>> {
	let (decoded, had_errors) = SHIFT_JIS.decode_without_bom_handling(name);
	if had_errors {
		return None;
	}
	Some(decoded.into_owned().into_bytes())
}

/// Re-encodes a Shift_JIS name as EUC-JP, or `None` if it cannot be
/// represented.
pub fn sjis_to_euc(name: &[u8]) -> Option<Vec<u8>> {
	let (decoded, had_errors) = SHIFT_JIS.decode_without_bom_handling(name);
	if had_errors {
		return None;
	}
	let (encoded, _, had_errors) = EUC_JP.encode(&decoded);
	if had_errors {
		return None;
	}
	Some(encoded.into_owned())
}

/// Returns the byte spellings to try for a normalised name: raw, UTF-8,
/// EUC-JP. Duplicates are removed, so pure ASCII names yield one entry.
pub fn candidates(name: &[u8]) -> Vec<Vec<u8>> {
	let mut out = vec![name.to_vec()];
	for candidate in [sjis_to_utf8(name), sjis_to_euc(name)].into_iter().flatten() {
		if !out.contains(&candidate) {
			out.push(candidate);
		}
	}
	out
}

/// Converts raw name bytes to an OS string.
#[cfg(unix)]
pub fn bytes_to_os(bytes: &[u8]) -> OsString {
	use std::os::unix::ffi::OsStrExt;
	std::ffi::OsStr::from_bytes(bytes).to_os_string()
}

/// Converts raw name bytes to an OS string.
#[cfg(not(unix))]
pub fn bytes_to_os(bytes: &[u8]) -> OsString {
	String::from_utf8_lossy(bytes).into_owned().into()
}

/// Returns the raw bytes of an OS string.
#[cfg(unix)]
pub fn os_to_bytes(name: &std::ffi::OsStr) -> Vec<u8> {
	use std::os::unix::ffi::OsStrExt;
	name.as_bytes().to_vec()
}

/// Returns the raw bytes of an OS string.
#[cfg(not(unix))]
pub fn os_to_bytes(name: &std::ffi::OsStr) -> Vec<u8> {
	name.to_string_lossy().into_owned().into_bytes()
}

/// Converts a normalised name to a path relative to a search root.
///
/// Only plain components are kept: leading delimiters, drive prefixes,
/// `.` and `..` are dropped, so joining the result never leaves the root.
pub fn to_relative_path(name: &[u8]) -> PathBuf {
	components(name)
		.map(bytes_to_os)
		.filter(|c| {
			let mut parts = Path::new(c).components();
			matches!((parts.next(), parts.next()), (Some(Component::Normal(_)), None))
		})
		.collect()
}

/// Splits a normalised name into non-empty path components.
pub fn components(name: &[u8]) -> impl Iterator<Item = &[u8]> {
	name.split(|&b| b == DELIMITER).filter(|c| !c.is_empty())
}
