//! Single-pointer swap delay line.
//!
//! The line reads the slot under the pointer, writes the incoming sample into
//! it, and advances. The pointer resets to 0 whenever it reaches the current
//! length. The reset is absolute, not a modulo of the old length, so shortening
//! the delay mid-stream jumps (an audible discontinuity that is kept as is).
//!
//! Lengths under `min` samples are not representable with one pointer and
//! leave the sample (and the buffer) untouched.

use crate::dsp::Sample;

#[derive(Clone, Debug)]
pub struct DelayLine<const N: usize> {
    buf: [Sample; N],
    p: usize,
    min: usize,
}

impl<const N: usize> DelayLine<N> {
    /// `min` is the shortest length that is actually delayed.
    #[inline]
    pub fn new(min: usize) -> Self {
        Self { buf: [0.0; N], p: 0, min }
    }

    /// Delay `x` by `len` samples (clamped to `N`). Returns the delayed sample.
    #[inline]
    pub fn process(&mut self, x: Sample, len: usize) -> Sample {
        if len < self.min {
            return x;
        }
        let len = len.min(N);
        if self.p >= len {
            self.p = 0;
        }
        let y = core::mem::replace(&mut self.buf[self.p], x);
        self.p += 1;
        y
    }

    /// Convert a time in seconds to a whole sample count at `sr`. Negative
    /// times give 0, which the caller's bypass rule then catches.
    #[inline]
    pub fn samples_for(seconds: Sample, sr: usize) -> usize {
        let n = seconds * sr as Sample;
        if n <= 0.0 { 0 } else { n as usize }
    }

    #[inline] pub fn position(&self) -> usize { self.p }
}

// ------------------------------------ Tests --------------------------------------
