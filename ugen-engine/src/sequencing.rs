//! Trigger-driven generators: `Rand` (sample and hold), `Skip` (pulse divider)
//! and `Step` (four-step sequencer).

use core::cell::Ref;

use rand::rngs::ThreadRng;
use rand::Rng;
use ugen_core::dsp::Sample;
use ugen_core::sequencing::{PulseDivider, StepIndex};

use crate::graph::{Block, Port, Ports, Processor, Source, Trigger};
use crate::nodes::Input;

// ------------------------------------ Rand ---------------------------------------

/// Draws a uniform value in `[min, max)` on every trigger edge and holds it.
pub struct Rand<R: Rng = ThreadRng> {
    min: Input,
    max: Source,
    trig: Trigger,
    held: Sample,
    rng: R,
}

impl Rand<ThreadRng> {
    pub fn new(min: impl Processor + 'static, max: Source, trig: Trigger) -> Self {
        Self::with_rng(min, max, trig, rand::thread_rng())
    }
}

impl<R: Rng> Rand<R> {
    pub fn with_rng(min: impl Processor + 'static, max: Source, trig: Trigger, rng: R) -> Self {
        Self { min: Box::new(min), max, trig, held: 0.0, rng }
    }
}

impl<R: Rng> Processor for Rand<R> {
    fn process(&mut self, block: &mut Block) {
        self.min.process(block);
        let max = self.max.process();
        let (t, edge) = self.trig.process();
        for (i, s) in block.iter_mut().enumerate() {
            if edge.is_trigger(t[i]) {
                let u: Sample = self.rng.gen();
                self.held = *s + u * (max[i] - *s);
            }
            *s = self.held;
        }
    }
}

impl<R: Rng> Ports for Rand<R> {
    const KIND: &'static str = "rand";
    const PORTS: &'static [Port] = &[Port::audio("min"), Port::signal("max"), Port::trigger("trig")];
}

// ------------------------------------ Skip ---------------------------------------

/// Lets one trigger in `m` through as a single-sample 1.0, where
/// `m = trunc(num * 10)`. `m <= 0` passes every trigger.
pub struct Skip {
    num: Input,
    trig: Trigger,
    div: PulseDivider,
}

impl Skip {
    pub fn new(num: impl Processor + 'static, trig: Trigger) -> Self {
        Self { num: Box::new(num), trig, div: PulseDivider::new() }
    }
}

impl Processor for Skip {
    fn process(&mut self, block: &mut Block) {
        self.num.process(block);
        let (t, edge) = self.trig.process();
        for (s, &ts) in block.iter_mut().zip(t.iter()) {
            let fired = edge.is_trigger(ts) && self.div.trigger(PulseDivider::divisor_of(*s));
            *s = if fired { 1.0 } else { 0.0 };
        }
    }
}

impl Ports for Skip {
    const KIND: &'static str = "skip";
    const PORTS: &'static [Port] = &[Port::audio("num"), Port::trigger("trig")];
}

// ------------------------------------ Step ---------------------------------------

/// Number of steps in [`Step`].
pub const N_STEP: usize = 4;

/// Four-step sequencer. `trig` advances, `rst` returns to the first step; the
/// output is the active input at the same sample index.
///
/// Every input is rendered every tick so the active one can change mid-block.
pub struct Step {
    trig: Trigger,
    rst: Trigger,
    inputs: [Source; N_STEP],
    index: StepIndex<N_STEP>,
}

impl Step {
    pub fn new(trig: Trigger, rst: Trigger, inputs: [Source; N_STEP]) -> Self {
        Self { trig, rst, inputs, index: StepIndex::new() }
    }

    /// Step currently selected.
    pub fn index(&self) -> usize { self.index.index() }
}

impl Processor for Step {
    fn process(&mut self, block: &mut Block) {
        let (t, te) = self.trig.process();
        let (r, re) = self.rst.process();
        let inputs: [Ref<'_, Block>; N_STEP] = core::array::from_fn(|k| self.inputs[k].process());
        for (i, s) in block.iter_mut().enumerate() {
            let n = self.index.next(te.is_trigger(t[i]), re.is_trigger(r[i]));
            *s = inputs[n][i];
        }
    }
}

impl Ports for Step {
    const KIND: &'static str = "step";
    const PORTS: &'static [Port] = &[
        Port::trigger("trig"),
        Port::trigger("rst"),
        Port::signals("v", N_STEP),
    ];
}
