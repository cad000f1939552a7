//! Slewing envelope with a triggered full-scale attack.
//!
//! `SlewEnvelope` follows a moving target at asymmetric linear rates. A trigger
//! forces a ramp all the way to 1.0 at the attack rate, regardless of the
//! target, after which it goes back to tracking.
//!
//! Time constants are in tenths of a second for a full-scale (0..1) ramp:
//! the per-sample step is `1 / (t * SAMPLE_RATE * 10)`. A constant `<= 0`
//! snaps straight to the destination.

use crate::dsp::{Sample, SAMPLE_RATE};

const SR: Sample = SAMPLE_RATE as Sample;

#[inline]
fn step(t: Sample) -> Sample {
    1.0 / (t * SR * 10.0)
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SlewEnvelope {
    v: Sample,
    up: bool,
}

impl SlewEnvelope {
    #[inline]
    pub fn new() -> Self { Self { v: 0.0, up: false } }

    /// Advance one sample toward `target`; `trig` starts a forced attack.
    #[inline]
    pub fn next(&mut self, target: Sample, trig: bool, att: Sample, dec: Sample) -> Sample {
        if trig {
            self.up = true;
        }

        if !self.up && self.v > target {
            if dec > 0.0 {
                self.v -= step(dec);
                if self.v < target {
                    self.v = target;
                }
            } else {
                self.v = target;
            }
        }

        if self.up || self.v < target {
            if att > 0.0 {
                self.v += step(att);
                if self.up {
                    if self.v >= 1.0 {
                        self.v = 1.0;
                        self.up = false;
                    }
                } else if self.v > target {
                    self.v = target;
                }
            } else if self.up {
                self.v = 1.0;
                self.up = false;
            } else {
                self.v = target;
            }
        }

        self.v
    }

    #[inline] pub fn value(&self) -> Sample { self.v }

    /// True while a triggered attack is still climbing to 1.0.
    #[inline] pub fn is_attacking(&self) -> bool { self.up }
}

// ------------------------------------ Tests --------------------------------------
