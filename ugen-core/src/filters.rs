//! Variable-window rolling average (box low-pass).
//!
//! The window follows a pitch-mapped cutoff: `n = SAMPLE_RATE / freq_of(f)`,
//! clamped to `[1, N]`. Every sample costs O(1): the incoming value is divided by
//! the window in effect *now*, added to the running sum and stored, and the
//! value it replaces is subtracted.
//!
//! `n` stays fractional for the division while the ring wraps at `trunc(n)`
//! slots, so a steady input settles at `x * trunc(n) / n`, slightly under `x`.
//!
//! Stored values keep the normalization they were written with. When `n`
//! changes the sum is not rescaled, so the output carries a bounded transient
//! until the window has been fully rewritten.

use crate::dsp::{freq_of, Sample, SAMPLE_RATE};

/// Window capacity used by the Filter generator.
pub const MAX_WINDOW: usize = 1024;

/// Fractional window for a pitch-mapped cutoff control, clamped to `[1, max]`.
/// A NaN control maps to 1.
#[inline]
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn window_size(freq: Sample, max: usize) -> Sample {
    let n = SAMPLE_RATE as f32 / freq_of(freq);
    if !(n >= 1.0) {
        1.0
    } else if n > max as f32 {
        max as f32
    } else {
        n
    }
}

/// Ring length for a cutoff control: `trunc` of [`window_size`], at least 1.
#[inline]
pub fn window_len(freq: Sample, max: usize) -> usize {
    (window_size(freq, max) as usize).max(1)
}

#[derive(Clone, Debug)]
pub struct RollingAverage<const N: usize> {
    buf: [Sample; N],
    pos: usize,
    avg: Sample,
    n: Sample,
    len: usize,
    last_freq: Sample,
}

impl<const N: usize> RollingAverage<N> {
    #[inline]
    pub fn new() -> Self {
        Self {
            buf: [0.0; N],
            pos: 0,
            avg: 0.0,
            n: window_size(0.0, N),
            len: window_len(0.0, N),
            last_freq: 0.0,
        }
    }

    /// Re-derive the window length, but only when the cutoff control moved.
    #[inline]
    #[allow(clippy::float_cmp)]
    pub fn set_freq(&mut self, freq: Sample) {
        if freq != self.last_freq {
            self.last_freq = freq;
            self.n = window_size(freq, N);
            self.len = (self.n as usize).max(1);
        }
    }

    /// Push one sample and return the running average.
    #[inline]
    pub fn process(&mut self, x: Sample) -> Sample {
        let cur = x / self.n;
        self.avg += cur - self.buf[self.pos];
        self.buf[self.pos] = cur;
        self.pos = (self.pos + 1) % self.len;
        self.avg
    }

    /// Ring length currently in effect.
    #[inline] pub fn window(&self) -> usize { self.len }
    /// Divisor applied to incoming samples.
    #[inline] pub fn norm(&self) -> Sample { self.n }
    #[inline] pub fn value(&self) -> Sample { self.avg }
}

impl<const N: usize> Default for RollingAverage<N> {
    fn default() -> Self { Self::new() }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_clamps() {
        assert_eq!(window_len(-1.0, MAX_WINDOW), MAX_WINDOW);
        assert_eq!(window_len(1.0, MAX_WINDOW), 1);
        // 440 Hz at 44.1 kHz
        assert_eq!(window_len(0.0, MAX_WINDOW), 100);
        assert!((window_size(0.0, MAX_WINDOW) - 100.227_27).abs() < 1e-3);
        assert_eq!(window_size(1.0, MAX_WINDOW), 1.0);
    }

    #[test]
    fn nan_cutoff_falls_back_to_single_slot() {
        assert_eq!(window_size(Sample::NAN, MAX_WINDOW), 1.0);
        assert_eq!(window_len(Sample::NAN, MAX_WINDOW), 1);

        let mut f = RollingAverage::<MAX_WINDOW>::new();
        f.set_freq(Sample::NAN);
        assert_eq!(f.window(), 1);
        for _ in 0..4 {
            let y = f.process(0.5);
            assert!(y.is_finite(), "y={y}");
        }
        f.set_freq(0.0);
        assert_eq!(f.window(), 100);
        assert!(f.process(0.5).is_finite());
    }

    #[test]
    fn dc_converges_within_window() {
        for freq in [0.0f32, -0.2, 0.1] {
            let mut f = RollingAverage::<MAX_WINDOW>::new();
            f.set_freq(freq);
            let n = f.window();
            // trunc(n) slots of x / n each
            let dc = 0.6 * n as Sample / f.norm();
            assert!(dc < 0.6);
            let mut y = 0.0;
            for _ in 0..n {
                y = f.process(0.6);
            }
            assert!((y - dc).abs() < 1e-4, "freq={freq} n={n} y={y}");
            for _ in 0..3 * n {
                y = f.process(0.6);
            }
            assert!((y - dc).abs() < 1e-4, "freq={freq} n={n} y={y}");
        }
    }

    #[test]
    fn ramps_up_during_first_window() {
        let mut f = RollingAverage::<MAX_WINDOW>::new();
        f.set_freq(0.0);
        let first = f.process(1.0);
        assert!((first - 1.0 / f.norm()).abs() < 1e-7);
        assert!((first - 0.009_977_3).abs() < 1e-6);
    }

    #[test]
    fn window_change_leaves_transient() {
        let mut f = RollingAverage::<MAX_WINDOW>::new();
        f.set_freq(0.0);
        for _ in 0..500 {
            f.process(1.0);
        }
        f.set_freq(0.1); // window halves, old slots keep their 1/100 weighting
        assert_eq!(f.window(), 50);
        let y = f.process(1.0);
        assert!((y - 1.0).abs() > 1e-3, "y={y}");
    }

    #[test]
    fn alternating_input_is_smoothed() {
        let mut f = RollingAverage::<MAX_WINDOW>::new();
        f.set_freq(0.0);
        let mut peak: Sample = 0.0;
        for i in 0..2000 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = f.process(x);
            if i > 200 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.02, "peak={peak}");
    }
}
