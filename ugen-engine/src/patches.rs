//! Ready-made patches wired from the generators in this crate.
//!
//! These stand in for the external graph builder: they bind every port of every
//! node by hand and return the root processor. The CLI renders them and the
//! benches time them.
//!
//! - [`sequence`] : four-step melody on a square, plucked by a divided clock,
//!   smoothed and echoed
//! - [`drone`]    : randomly re-pitched sine over filtered noise

use tracing::info;
use ugen_core::dsp::{pitch_of, Sample};

use crate::effects::{Delay, Filter};
use crate::envelope::Env;
use crate::graph::{Clock, Processor, Source, Trigger};
use crate::nodes::{Clip, Mul, MulSum, Noise, Quant, Sum, Value};
use crate::oscillators::{Sin, Square};
use crate::sequencing::{Rand, Skip, Step};

/// Named patch, as selected from the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Patch {
    Sequence,
    Drone,
}

impl Patch {
    pub const ALL: [Patch; 2] = [Patch::Sequence, Patch::Drone];

    pub fn name(self) -> &'static str {
        match self {
            Patch::Sequence => "sequence",
            Patch::Drone => "drone",
        }
    }

    /// Build the patch on `clock`; `rate_hz` sets its clock/motion rate.
    pub fn build(self, clock: &Clock, rate_hz: f32) -> Box<dyn Processor> {
        match self {
            Patch::Sequence => Box::new(sequence(clock, rate_hz)),
            Patch::Drone => Box::new(drone(clock, rate_hz)),
        }
    }
}

/// Trigger input that never fires.
fn never(clock: &Clock) -> Trigger {
    clock.trigger(Value(0.0))
}

/// Square clock at `hz`, usable as a trigger by any number of consumers.
fn pulse(clock: &Clock, hz: f32) -> Source {
    clock.source(Square::new(Value(pitch_of(hz)), never(clock)))
}

/// Four-step melody. `rate_hz` is the step rate; the envelope fires on every
/// second step.
pub fn sequence(clock: &Clock, rate_hz: f32) -> impl Processor {
    let tick = pulse(clock, rate_hz);

    let notes: [Sample; 4] = [-0.1, -0.05, -0.075, -0.0333];
    let steps = notes.map(|n| clock.source(Value(n)));
    let melody = clock.source(Step::new(Trigger::new(tick.clone()), never(clock), steps));

    let osc = Square::new(Quant::new(melody), never(clock));

    let accents = clock.source(Skip::new(Value(0.2), Trigger::new(tick)));
    let env = Env::new(
        Value(0.0),
        Trigger::new(accents),
        clock.source(Value(0.0005)),
        clock.source(Value(0.02)),
    );
    let voice = Mul::new(osc, clock.source(env));

    let dry = clock.source(Filter::new(voice, clock.source(Value(0.05))));
    let echo = Mul::new(
        Delay::new(dry.clone(), clock.source(Value(0.375))),
        clock.source(Value(0.5)),
    );
    let out = Clip::new(Sum::new(dry, clock.source(echo)));

    info!(patch = "sequence", rate_hz, "patch built");
    out
}

/// Sine that jumps to a new random pitch at `rate_hz`, mixed over quiet noise
/// and softened by the rolling-average filter.
pub fn drone(clock: &Clock, rate_hz: f32) -> impl Processor {
    let tick = pulse(clock, rate_hz);

    let pitch = Quant::new(Rand::new(
        Value(-0.25),
        clock.source(Value(-0.1)),
        Trigger::new(tick),
    ));
    let tone = Sin::new(pitch, never(clock));

    let hiss = clock.source(Mul::new(Noise::new(), clock.source(Value(0.05))));
    let mix = MulSum::new(tone, hiss, clock.source(Value(0.4)));

    let out = Clip::new(Filter::new(mix, clock.source(Value(0.15))));

    info!(patch = "drone", rate_hz, "patch built");
    out
}
