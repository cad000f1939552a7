//! Buffer-backed generators: `Delay` and `Filter`.
//!
//! Both allocate their fixed-capacity buffer once, at construction, sized to
//! the largest setting they accept. Nothing is resized while running.

use tracing::debug;
use ugen_core::delay::DelayLine;
use ugen_core::dsp::{BLOCK_LEN, SAMPLE_RATE};
use ugen_core::filters::{RollingAverage, MAX_WINDOW};

use crate::graph::{Block, Port, Ports, Processor, Source};
use crate::nodes::Input;

/// Up to one second of delay. `len` is in seconds, per sample.
///
/// Lengths under one block bypass the line for that sample; the single write
/// pointer cannot represent them.
pub struct Delay {
    input: Input,
    len: Source,
    line: Box<DelayLine<SAMPLE_RATE>>,
}

impl Delay {
    pub fn new(input: impl Processor + 'static, len: Source) -> Self {
        debug!(capacity = SAMPLE_RATE, "delay line allocated");
        Self {
            input: Box::new(input),
            len,
            line: Box::new(DelayLine::new(BLOCK_LEN)),
        }
    }
}

impl Processor for Delay {
    fn process(&mut self, block: &mut Block) {
        self.input.process(block);
        let len = self.len.process();
        for (s, &l) in block.iter_mut().zip(len.iter()) {
            let n = DelayLine::<SAMPLE_RATE>::samples_for(l, SAMPLE_RATE);
            *s = self.line.process(*s, n);
        }
    }
}

impl Ports for Delay {
    const KIND: &'static str = "delay";
    const PORTS: &'static [Port] = &[Port::audio("in"), Port::signal("len")];
}

/// Rolling-average low-pass; `freq` uses the oscillator pitch mapping.
pub struct Filter {
    input: Input,
    freq: Source,
    avg: Box<RollingAverage<MAX_WINDOW>>,
}

impl Filter {
    pub fn new(input: impl Processor + 'static, freq: Source) -> Self {
        Self {
            input: Box::new(input),
            freq,
            avg: Box::new(RollingAverage::new()),
        }
    }

    /// Window length currently in effect.
    pub fn window(&self) -> usize { self.avg.window() }
}

impl Processor for Filter {
    fn process(&mut self, block: &mut Block) {
        self.input.process(block);
        let freq = self.freq.process();
        for (s, &f) in block.iter_mut().zip(freq.iter()) {
            self.avg.set_freq(f);
            *s = self.avg.process(*s);
        }
    }
}

impl Ports for Filter {
    const KIND: &'static str = "filter";
    const PORTS: &'static [Port] = &[Port::audio("in"), Port::signal("freq")];
}
