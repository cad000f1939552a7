//! Arithmetic and utility generators.
//!
//! Every node here follows the same shape: run the in-place `a`/`in` input into
//! the caller's block, pull any side sources once, then rewrite the block.
//!
//! Contents:
//! - `Value`         : constant fill
//! - `Mul`, `Sum`    : `a * b`, `a + b`
//! - `MulSum`        : `a * x + b`
//! - `Clip`, `Quant` : hard clip to [-1, 1], truncate onto the 1/120 grid
//! - `Noise`         : white noise in [-1, 1)

use rand::rngs::ThreadRng;
use rand::Rng;
use ugen_core::dsp::{clip, quantize, Sample};

use crate::graph::{Block, Port, Ports, Processor, Source};

/// Owned in-place input.
pub type Input = Box<dyn Processor>;

/// Constant source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Value(pub Sample);

impl Processor for Value {
    #[inline]
    fn process(&mut self, block: &mut Block) {
        block.fill(self.0);
    }
}

impl Ports for Value {
    const KIND: &'static str = "value";
    const PORTS: &'static [Port] = &[];
}

// ------------------------------------ Mul / Sum ----------------------------------

pub struct Mul {
    a: Input,
    b: Source,
}

impl Mul {
    pub fn new(a: impl Processor + 'static, b: Source) -> Self {
        Self { a: Box::new(a), b }
    }
}

impl Processor for Mul {
    fn process(&mut self, block: &mut Block) {
        self.a.process(block);
        let b = self.b.process();
        for (s, m) in block.iter_mut().zip(b.iter()) {
            *s *= m;
        }
    }
}

impl Ports for Mul {
    const KIND: &'static str = "mul";
    const PORTS: &'static [Port] = &[Port::audio("a"), Port::signal("b")];
}

pub struct Sum {
    a: Input,
    b: Source,
}

impl Sum {
    pub fn new(a: impl Processor + 'static, b: Source) -> Self {
        Self { a: Box::new(a), b }
    }
}

impl Processor for Sum {
    fn process(&mut self, block: &mut Block) {
        self.a.process(block);
        let b = self.b.process();
        for (s, v) in block.iter_mut().zip(b.iter()) {
            *s += v;
        }
    }
}

impl Ports for Sum {
    const KIND: &'static str = "sum";
    const PORTS: &'static [Port] = &[Port::audio("a"), Port::signal("b")];
}

/// Affine combination `a * x + b`.
pub struct MulSum {
    a: Input,
    b: Source,
    x: Source,
}

impl MulSum {
    pub fn new(a: impl Processor + 'static, b: Source, x: Source) -> Self {
        Self { a: Box::new(a), b, x }
    }
}

impl Processor for MulSum {
    fn process(&mut self, block: &mut Block) {
        self.a.process(block);
        let b = self.b.process();
        let x = self.x.process();
        for ((s, b), x) in block.iter_mut().zip(b.iter()).zip(x.iter()) {
            *s = *s * x + b;
        }
    }
}

impl Ports for MulSum {
    const KIND: &'static str = "mulsum";
    const PORTS: &'static [Port] = &[Port::audio("a"), Port::signal("b"), Port::signal("x")];
}

// ------------------------------------ Clip / Quant -------------------------------

pub struct Clip {
    input: Input,
}

impl Clip {
    pub fn new(input: impl Processor + 'static) -> Self {
        Self { input: Box::new(input) }
    }
}

impl Processor for Clip {
    fn process(&mut self, block: &mut Block) {
        self.input.process(block);
        for s in block.iter_mut() {
            *s = clip(*s);
        }
    }
}

impl Ports for Clip {
    const KIND: &'static str = "clip";
    const PORTS: &'static [Port] = &[Port::audio("in")];
}

pub struct Quant {
    input: Input,
}

impl Quant {
    pub fn new(input: impl Processor + 'static) -> Self {
        Self { input: Box::new(input) }
    }
}

impl Processor for Quant {
    fn process(&mut self, block: &mut Block) {
        self.input.process(block);
        for s in block.iter_mut() {
            *s = quantize(*s);
        }
    }
}

impl Ports for Quant {
    const KIND: &'static str = "quant";
    const PORTS: &'static [Port] = &[Port::audio("in")];
}

// ------------------------------------ Noise --------------------------------------

/// White noise, every sample an independent uniform draw in [-1, 1).
pub struct Noise<R: Rng = ThreadRng> {
    rng: R,
}

impl Noise<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::thread_rng() }
    }
}

impl Default for Noise<ThreadRng> {
    fn default() -> Self { Self::new() }
}

impl<R: Rng> Noise<R> {
    /// Use a caller-provided generator (e.g. a seeded `StdRng`).
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Processor for Noise<R> {
    fn process(&mut self, block: &mut Block) {
        for s in block.iter_mut() {
            *s = self.rng.gen_range(-1.0..1.0);
        }
    }
}

impl<R: Rng> Ports for Noise<R> {
    const KIND: &'static str = "noise";
    const PORTS: &'static [Port] = &[];
}
