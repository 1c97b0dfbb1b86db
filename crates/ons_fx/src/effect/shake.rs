//! Screen-shake transitions.

use std::f64::consts::PI;

use rand::{Rng, rngs::SmallRng};

/// Offset of a sinusoidal shake at `counter`, decaying linearly to zero.
///
/// `no` is the number of oscillations over the whole duration.
pub fn sine_offset(no: i32, amplitude: i32, counter: i32, duration: i32) -> i32 {
	let no = f64::from(no);
	let phase = (PI * 2.0 * no * f64::from(counter) / f64::from(duration)).sin();
	let offset = phase * f64::from(amplitude) * no * f64::from(duration - counter) / f64::from(duration);
	offset as i16 as i32
}

/// Random offset in `{-2no, 0, 2no}` on each axis.
pub fn random_offset(rng: &mut SmallRng, no: i32) -> (i32, i32) {
	let x = no * (rng.random_range(0..3) - 1) * 2;
	let y = no * (rng.random_range(0..3) - 1) * 2;
	(x, y)
}

/// Caps the per-tick counter step so every oscillation gets at least four
/// frames.
pub fn clamp_resolution(resolution: i32, no: i32, duration: i32) -> i32 {
	if no <= 0 {
		return resolution;
	}
	resolution.min((duration / 4 / no).max(1))
}
