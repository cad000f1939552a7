#![cfg_attr(not(feature = "std"), no_std)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::must_use_candidate,
    clippy::new_without_default
)]
//! ugen core: no_std-ready per-sample kernels behind the unit generators.
//!
//! Features
//! - `std`       : (default) use the Rust standard library
//! - `no-std`    : build with `#![no_std]` and use `libm`/`micromath` math backends
//! - `fast-math` : polynomial approximations for `sin` and `exp2`
//!
//! Modules
//! - [`dsp`]         : constants, math backend, pitch mapping, clip/quantize
//! - [`oscillators`] : square and sine phase accumulators with hard sync
//! - [`envelopes`]   : slewing envelope with triggered full-scale attack
//! - [`filters`]     : variable-window rolling average
//! - [`delay`]       : single-pointer swap delay line
//! - [`sequencing`]  : rising-edge detector, pulse divider, step index
//!
//! Design
//! - No heap allocations; fixed-capacity buffers are const-generic arrays
//! - Each kernel advances exactly one sample per call, in order
//! - Degenerate parameters clamp or bypass, never fail

pub mod delay;
pub mod dsp;
pub mod envelopes;
pub mod filters;
pub mod oscillators;
pub mod sequencing;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::delay::DelayLine;
    pub use crate::dsp::{
        clip, fast_exp2, fast_sin, freq_of, pitch_of, quantize, PitchTracker, Sample, BLOCK_LEN,
        SAMPLE_RATE, TAU,
    };
    pub use crate::envelopes::SlewEnvelope;
    pub use crate::filters::{window_len, window_size, RollingAverage, MAX_WINDOW};
    pub use crate::oscillators::{SinePhase, SquarePhase};
    pub use crate::sequencing::{Edge, PulseDivider, StepIndex};
}
