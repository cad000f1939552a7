//! Constants, math backend and small numeric helpers shared by every kernel.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` approximations for the two transcendental hot paths
//!   (`sin` in the sine oscillator, `exp2` in the pitch mapping)
//!
//! Conventions:
//! - Audio-role samples sit in [-1, 1]; control-role samples carry whatever the
//!   consuming node says they mean. Nothing here clamps unless it says so.
//! - Pitch control is 0.1 per octave with 0.0 == 440 Hz.

#![allow(clippy::excessive_precision)]

use core::f32::consts::PI;

use cfg_if::cfg_if;
use num_traits::float::FloatCore;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] fn m_exp2(x: f32) -> f32 { (x * core::f32::consts::LN_2).exp() }
        #[inline] fn m_log2(x: f32) -> f32 { x.log2() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] fn m_sin(x: f32) -> f32 { libm::sinf(x) }
        #[inline] fn m_exp2(x: f32) -> f32 { libm::exp2f(x) }
        #[inline] fn m_log2(x: f32) -> f32 { libm::log2f(x) }
    // std backend
    } else {
        #[inline] fn m_sin(x: f32) -> f32 { x.sin() }
        #[inline] fn m_exp2(x: f32) -> f32 { x.exp2() }
        #[inline] fn m_log2(x: f32) -> f32 { x.log2() }
    }
}

// --------------------------------- Constants -------------------------------------

/// Instantaneous signal amplitude.
pub type Sample = f32;

/// Samples per second of audio.
pub const SAMPLE_RATE: usize = 44_100;

/// Samples delivered per processing call.
pub const BLOCK_LEN: usize = 256;

/// 2π (commonly useful)
pub const TAU: f32 = 2.0 * PI;

/// Frequency produced by a control value of 0.0.
pub const PITCH_BASE_HZ: f32 = 440.0;

/// Smallest step the quantizer snaps to.
pub const QUANT_STEPS: f32 = 120.0;

// --------------------------------- Pitch mapping ---------------------------------

/// Map a control sample to Hz: `440 * 2^(10 s)`.
#[inline]
pub fn freq_of(s: Sample) -> f32 {
    PITCH_BASE_HZ * fast_exp2(s * 10.0)
}

/// Inverse of [`freq_of`]: the control value that plays `hz`.
#[inline]
pub fn pitch_of(hz: f32) -> Sample {
    m_log2(hz / PITCH_BASE_HZ) / 10.0
}

/// Caches `freq_of` and only re-evaluates it when the control sample changes.
///
/// The last seen value survives across blocks, so a constant pitch costs one
/// `exp2` for the lifetime of the node.
#[derive(Copy, Clone, Debug)]
pub struct PitchTracker {
    last: Sample,
    hz: f32,
}

impl PitchTracker {
    #[inline]
    pub fn new() -> Self {
        Self { last: 0.0, hz: freq_of(0.0) }
    }

    /// Frequency in Hz for control value `s`.
    #[inline]
    #[allow(clippy::float_cmp)]
    pub fn hz(&mut self, s: Sample) -> f32 {
        if s != self.last {
            self.last = s;
            self.hz = freq_of(s);
        }
        self.hz
    }
}

impl Default for PitchTracker {
    fn default() -> Self { Self::new() }
}

// --------------------------------- Fast math -------------------------------------

/// `2^x`. With `fast-math` a cubic fit on the fractional part scaled by the
/// exponent bits (max rel. error ~1e-4); exact backend otherwise.
#[inline]
pub fn fast_exp2(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let x = x.clamp(-126.0, 126.0);
            let xi = FloatCore::floor(x);
            let f = x - xi;
            let poly = 1.0 + f * (0.695_8 + f * (0.225_1 + f * 0.079_1));
            let scale = f32::from_bits(((xi as i32 + 127) as u32) << 23);
            scale * poly
        } else {
            m_exp2(x)
        }
    }
}

/// Fast sine with range reduction into [-π, π] and 5th-order minimax-style poly.
/// Max abs error ~1e-3 for musical uses when `fast-math` is enabled; falls back to exact otherwise.
#[inline]
pub fn fast_sin(x: f32) -> f32 {
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            let k = FloatCore::round(x / TAU);
            let xr = x - k * TAU;

            // 5th-order odd polynomial: sin(x) ≈ x * (a + b x^2 + c x^4)
            let x2 = xr * xr;
            xr * (0.999_979_313_3 + x2 * (-0.166_624_432_0 + x2 * 0.008_308_978_98))
        } else {
            m_sin(x)
        }
    }
}

// --------------------------------- Shaping ---------------------------------------

/// Hard clip into [-1, 1].
#[inline]
pub fn clip(x: Sample) -> Sample {
    if x > 1.0 {
        1.0
    } else if x < -1.0 {
        -1.0
    } else {
        x
    }
}

/// Truncate toward zero onto the 1/120 grid. Negative inputs move up, not down.
///
/// The result is the grid point farthest from zero whose `f32` rounding still
/// lies within `|x|`, so re-quantizing a quantized value returns it unchanged.
/// Non-finite inputs pass through.
#[inline]
pub fn quantize(x: Sample) -> Sample {
    if !FloatCore::is_finite(x) {
        return x;
    }
    let steps = f64::from(QUANT_STEPS);
    let grid = |k: f64| (k / steps) as Sample;
    let mag = FloatCore::abs(x);
    let dir = if x < 0.0 { -1.0 } else { 1.0 };

    // Exact: an f32 times 120 fits in an f64 mantissa.
    let mut k = FloatCore::trunc(f64::from(x) * steps);
    // Rounding k / 120 back to f32 can land one step either side of `mag`.
    for _ in 0..2 {
        if FloatCore::abs(grid(k + dir)) <= mag {
            k += dir;
        }
    }
    for _ in 0..2 {
        if FloatCore::abs(grid(k)) > mag {
            k -= dir;
        }
    }
    grid(k)
}

// --------------------------------- Tests (std only) ------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_zero_is_a440() {
        assert!((freq_of(0.0) - 440.0).abs() < 0.1);
        assert!((freq_of(0.1) - 880.0).abs() < 0.5);
        assert!((freq_of(-0.1) - 220.0).abs() < 0.1);
    }

    #[test]
    fn pitch_of_inverts_freq_of() {
        for hz in [2.0f32, 55.0, 440.0, 1234.5] {
            assert!((freq_of(pitch_of(hz)) - hz).abs() / hz < 1e-3, "hz={hz}");
        }
    }

    #[test]
    fn tracker_follows_changes() {
        let mut p = PitchTracker::new();
        let a = p.hz(0.0);
        let b = p.hz(0.1);
        assert!((a - 440.0).abs() < 0.1);
        assert!((b - 880.0).abs() < 0.5);
        assert!((p.hz(0.1) - b).abs() < f32::EPSILON);
    }

    #[test]
    fn tracker_skips_unchanged_pitch() {
        let mut p = PitchTracker::new();
        assert!((p.hz(0.1) - 880.0).abs() < 0.5);
        // Poison the cache: an unchanged control must return it untouched.
        p.hz = 1.0;
        assert_eq!(p.hz(0.1), 1.0);
        assert_eq!(p.last, 0.1);
        // A new control value recomputes.
        assert!((p.hz(-0.1) - 220.0).abs() < 0.1);
        assert_eq!(p.last, -0.1);

        let mut fresh = PitchTracker::new();
        fresh.hz = 2.0;
        assert_eq!(fresh.hz(0.0), 2.0);
    }

    #[test]
    fn clip_bounds() {
        assert_eq!(clip(3.0), 1.0);
        assert_eq!(clip(-3.0), -1.0);
        assert_eq!(clip(0.25), 0.25);
    }

    #[test]
    fn quantize_truncates_toward_zero() {
        let step = 1.0 / QUANT_STEPS;
        assert_eq!(quantize(step * 2.5), quantize(step * 2.0));
        assert!(quantize(-step * 1.5) > -step * 1.5);
        assert!((quantize(-step * 1.5) + step).abs() < 1e-6);
        assert_eq!(quantize(0.004), 0.0);
        assert_eq!(quantize(-0.004), 0.0);
    }

    #[test]
    fn quantize_never_moves_away_from_zero() {
        let step = 1.0 / QUANT_STEPS;
        let cases: [Sample; 10] = [
            10_000.005,
            -10_000.005,
            999.9993,
            -999.9993,
            0.999_999_2,
            -0.999_999_2,
            8_000.004,
            7.0 / 120.0,
            -13.0 / 120.0,
            123_456.78,
        ];
        for x in cases {
            let q = quantize(x);
            assert!(q.abs() <= x.abs(), "x={x} q={q}");
            assert!(q == 0.0 || q.signum() == x.signum(), "x={x} q={q}");
            assert!(x.abs() - q.abs() < step * 1.01 + x.abs() * f32::EPSILON, "x={x} q={q}");
            assert_eq!(quantize(q), q, "x={x}");
        }
        assert_eq!(quantize(10_000.005), 10_000.0);
        assert_eq!(quantize(-10_000.005), -10_000.0);
        assert!((quantize(999.9993) - 999.991_64).abs() < 1e-3);
        assert!(quantize(999.9993) < 1000.0);
        assert!((quantize(0.999_999_2) - 119.0 / 120.0).abs() < 1e-6);
        assert_eq!(quantize(7.0 / 120.0), 7.0 / 120.0);
    }

    #[test]
    fn quantize_passes_non_finite() {
        assert!(quantize(Sample::NAN).is_nan());
        assert_eq!(quantize(Sample::INFINITY), Sample::INFINITY);
    }

    #[test]
    fn quantize_is_idempotent() {
        let mut x = -2.0f32;
        while x < 2.0 {
            let q = quantize(x);
            assert_eq!(quantize(q), q, "x={x}");
            assert!(q.abs() <= x.abs(), "x={x} q={q}");
            x += 0.001_37;
        }
        let mut x = -20_000.0f32;
        while x < 20_000.0 {
            let q = quantize(x);
            assert_eq!(quantize(q), q, "x={x}");
            assert!(q.abs() <= x.abs(), "x={x} q={q}");
            x += 7.919_3;
        }
    }
}
