//! Phase accumulators behind the Square and Sin generators.
//!
//! Both advance once per sample from a frequency in Hz and accept a hard-sync
//! flag that zeroes the phase before the step.
//!
//! - `SquarePhase` counts in Hz-units and wraps at `SAMPLE_RATE`, so one full
//!   cycle spans `SAMPLE_RATE` units of phase.
//! - `SinePhase` counts in cycles but only wraps once it passes
//!   `SINE_WRAP` cycles; `sin` tolerates the multi-cycle argument.

use core::f64::consts::TAU;

use num_traits::float::FloatCore;

use crate::dsp::{fast_sin, Sample, SAMPLE_RATE};

/// Cycles the sine phase may accumulate before it is pulled back.
pub const SINE_WRAP: f64 = 100.0;

const SR: f64 = SAMPLE_RATE as f64;

/// 50% duty square.
#[derive(Copy, Clone, Debug, Default)]
pub struct SquarePhase {
    p: f64,
}

impl SquarePhase {
    #[inline]
    pub fn new() -> Self { Self { p: 0.0 } }

    /// Advance by `hz` and return +1 for the first half of the cycle, -1 for the second.
    #[inline]
    pub fn next(&mut self, hz: f32, sync: bool) -> Sample {
        if sync {
            self.p = 0.0;
        }
        self.p += f64::from(hz);
        if self.p > SR {
            self.p -= SR;
        }
        if self.p > SR / 2.0 { -1.0 } else { 1.0 }
    }

    #[inline] pub fn phase(&self) -> f64 { self.p }
}

/// Sine with an amortized phase wrap.
#[derive(Copy, Clone, Debug, Default)]
pub struct SinePhase {
    p: f64,
}

impl SinePhase {
    #[inline]
    pub fn new() -> Self { Self { p: 0.0 } }

    /// Emit `sin(2π p)` for the current phase, then advance by `hz / SAMPLE_RATE` cycles.
    #[inline]
    pub fn next(&mut self, hz: f32, sync: bool) -> Sample {
        if sync {
            self.p = 0.0;
        }
        // Reduce in f64; an f32 phase near SINE_WRAP cycles is off by ~1e-5 rad.
        let y = fast_sin((FloatCore::fract(self.p) * TAU) as f32);
        self.p += f64::from(hz) / SR;
        if self.p > SINE_WRAP {
            self.p -= SINE_WRAP;
        }
        y
    }

    #[inline] pub fn phase(&self) -> f64 { self.p }
}
