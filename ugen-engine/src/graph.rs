//! Block execution model.
//!
//! Three roles make up a patch:
//! - [`Processor`] transforms a caller-owned [`Block`] in place.
//! - [`Source`] owns a block, computes it at most once per tick and hands the
//!   same block to every consumer (fan-out).
//! - [`Trigger`] is a `Source` plus a private rising-edge detector.
//!
//! A tick is one call to [`Engine::tick`]: the shared [`Clock`] advances, then the
//! root processor pulls its inputs depth-first. A source remembers the tick it
//! last computed, so a stale cache is simply one whose stamp is behind the clock.
//!
//! Design goals
//! - No dynamic allocations in the audio path (blocks are allocated when sources
//!   are built)
//! - Single-threaded; shared handles are `Rc`, not `Arc`
//! - A feedback cycle between sources is a wiring bug and panics on the
//!   re-entrant borrow instead of returning garbage

use core::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use tracing::debug;
use ugen_core::dsp::{Sample, BLOCK_LEN, SAMPLE_RATE};
use ugen_core::sequencing::Edge;

/// One tick's worth of samples.
pub type Block = [Sample; BLOCK_LEN];

/// A fresh silent block.
#[inline]
pub fn silence() -> Block {
    [0.0; BLOCK_LEN]
}

/// Anything that can transform a block in place.
pub trait Processor {
    fn process(&mut self, block: &mut Block);
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    #[inline]
    fn process(&mut self, block: &mut Block) {
        (**self).process(block);
    }
}

// ------------------------------------ Clock --------------------------------------

/// Shared tick counter. Cloning yields another handle to the same counter.
#[derive(Clone, Debug, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn now(&self) -> u64 { self.0.get() }

    /// Start a new tick; every source becomes stale.
    #[inline] pub fn advance(&self) { self.0.set(self.0.get() + 1); }

    /// Wrap `node` as a fan-out source on this clock.
    pub fn source(&self, node: impl Processor + 'static) -> Source {
        Source::new(self, node)
    }

    /// Wrap `node` as a trigger source on this clock.
    pub fn trigger(&self, node: impl Processor + 'static) -> Trigger {
        Trigger::new(self.source(node))
    }
}

// ------------------------------------ Source -------------------------------------

struct SourceCell {
    clock: Clock,
    stamp: Cell<Option<u64>>,
    node: RefCell<Box<dyn Processor>>,
    buf: RefCell<Box<Block>>,
}

/// A processor whose output is cached per tick and shared between consumers.
#[derive(Clone)]
pub struct Source(Rc<SourceCell>);

impl Source {
    pub fn new(clock: &Clock, node: impl Processor + 'static) -> Self {
        Self(Rc::new(SourceCell {
            clock: clock.clone(),
            stamp: Cell::new(None),
            node: RefCell::new(Box::new(node) as Box<dyn Processor>),
            buf: RefCell::new(Box::new(silence())),
        }))
    }

    /// This tick's block, computing it first if nobody has yet.
    pub fn process(&self) -> Ref<'_, Block> {
        let cell = &*self.0;
        let now = cell.clock.now();
        if cell.stamp.get() != Some(now) {
            let mut buf = cell.buf.borrow_mut();
            cell.node.borrow_mut().process(&mut **buf);
            cell.stamp.set(Some(now));
        }
        Ref::map(cell.buf.borrow(), |b| &**b)
    }

    /// Whether the cached block belongs to the current tick.
    pub fn is_fresh(&self) -> bool {
        self.0.stamp.get() == Some(self.0.clock.now())
    }
}

impl core::fmt::Debug for Source {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Source")
            .field("stamp", &self.0.stamp.get())
            .field("fresh", &self.is_fresh())
            .finish_non_exhaustive()
    }
}

/// Consuming a source as an in-place processor copies the cached block.
impl Processor for Source {
    #[inline]
    fn process(&mut self, block: &mut Block) {
        block.copy_from_slice(&*Source::process(self));
    }
}

// ------------------------------------ Trigger ------------------------------------

/// A source read through this consumer's own edge detector.
#[derive(Clone, Debug)]
pub struct Trigger {
    src: Source,
    edge: Edge,
}

impl Trigger {
    pub fn new(src: Source) -> Self {
        Self { src, edge: Edge::new() }
    }

    /// This tick's block plus the detector to run over it.
    #[inline]
    pub fn process(&mut self) -> (Ref<'_, Block>, &mut Edge) {
        (self.src.process(), &mut self.edge)
    }

    pub fn source(&self) -> &Source { &self.src }
}

impl From<Source> for Trigger {
    fn from(src: Source) -> Self { Self::new(src) }
}

// ------------------------------------ Ports --------------------------------------

/// Capability a port requires of whatever is bound to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// In-place processor, exclusively owned by the consumer.
    Audio,
    /// Cached fan-out source.
    Signal,
    /// Source read through an edge detector.
    Trigger,
}

/// One named input of a node type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub name: &'static str,
    pub role: Role,
    /// Number of inputs behind this name (e.g. the step sequencer's four `v`).
    pub count: usize,
}

impl Port {
    pub const fn audio(name: &'static str) -> Self { Self { name, role: Role::Audio, count: 1 } }
    pub const fn signal(name: &'static str) -> Self { Self { name, role: Role::Signal, count: 1 } }
    pub const fn trigger(name: &'static str) -> Self { Self { name, role: Role::Trigger, count: 1 } }
    pub const fn signals(name: &'static str, count: usize) -> Self { Self { name, role: Role::Signal, count } }
}

/// Static port table of a node type.
pub trait Ports {
    /// Registry name of the node type.
    const KIND: &'static str;
    const PORTS: &'static [Port];
}

// ------------------------------------ Engine -------------------------------------

/// Drives a root processor once per tick.
///
/// Hosts with a fixed period call [`Engine::tick`]; hosts whose buffers do not
/// line up with `BLOCK_LEN` call [`Engine::fill`], which renders whole blocks
/// and hands them out piecewise.
pub struct Engine<P: Processor> {
    clock: Clock,
    root: P,
    pending: Block,
    cursor: usize,
}

impl<P: Processor> Engine<P> {
    /// `clock` must be the clock every source in the patch was built on.
    pub fn new(clock: Clock, root: P) -> Self {
        debug!(block_len = BLOCK_LEN, sample_rate = SAMPLE_RATE, "engine created");
        Self { clock, root, pending: silence(), cursor: BLOCK_LEN }
    }

    /// Run one tick into `out`.
    #[inline]
    pub fn tick(&mut self, out: &mut Block) {
        self.clock.advance();
        self.root.process(out);
    }

    /// Fill an arbitrary-length host buffer, carrying the rest of the last
    /// block over to the next call.
    pub fn fill(&mut self, out: &mut [Sample]) {
        let mut written = 0;
        while written < out.len() {
            if self.cursor == BLOCK_LEN {
                self.clock.advance();
                self.root.process(&mut self.pending);
                self.cursor = 0;
            }
            let n = (BLOCK_LEN - self.cursor).min(out.len() - written);
            out[written..written + n].copy_from_slice(&self.pending[self.cursor..self.cursor + n]);
            self.cursor += n;
            written += n;
        }
    }

    /// Ticks run so far.
    #[inline] pub fn ticks(&self) -> u64 { self.clock.now() }

    /// Seconds of audio rendered so far.
    #[inline]
    pub fn time(&self) -> f64 {
        self.clock.now() as f64 * BLOCK_LEN as f64 / SAMPLE_RATE as f64
    }

    #[inline] pub fn clock(&self) -> &Clock { &self.clock }

    /// Get a mutable reference to the root for live tweaks.
    #[inline] pub fn root_mut(&mut self) -> &mut P { &mut self.root }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Ramp that counts how often it was asked to compute.
    struct Counter {
        calls: Rc<Cell<usize>>,
        next: Sample,
    }

    impl Processor for Counter {
        fn process(&mut self, block: &mut Block) {
            self.calls.set(self.calls.get() + 1);
            for s in block.iter_mut() {
                *s = self.next;
                self.next += 1.0;
            }
        }
    }

    fn counter(clock: &Clock) -> (Source, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let src = clock.source(Counter { calls: calls.clone(), next: 0.0 });
        (src, calls)
    }

    #[test]
    fn source_computes_once_per_tick() {
        let clock = Clock::new();
        let (src, calls) = counter(&clock);
        let other = src.clone();
        clock.advance();
        let a = src.process()[3];
        let b = other.process()[3];
        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
        assert!(src.is_fresh());

        clock.advance();
        assert!(!src.is_fresh());
        assert_eq!(other.process()[0], BLOCK_LEN as Sample);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn source_as_processor_copies() {
        let clock = Clock::new();
        let (mut src, _) = counter(&clock);
        clock.advance();
        let mut block = silence();
        Processor::process(&mut src, &mut block);
        assert_eq!(block[10], 10.0);
    }

    #[test]
    fn triggers_keep_separate_history() {
        struct High;
        impl Processor for High {
            fn process(&mut self, block: &mut Block) { block.fill(1.0); }
        }
        let clock = Clock::new();
        let src = clock.source(High);
        let mut t1 = Trigger::new(src.clone());
        let mut t2 = Trigger::from(src);
        clock.advance();
        {
            let (b, e) = t1.process();
            assert!(e.is_trigger(b[0]));
        }
        let (b, e) = t2.process();
        assert!(e.is_trigger(b[0]), "second consumer sees its own first edge");
    }

    #[test]
    #[should_panic]
    fn cycle_panics() {
        struct Loop(Rc<RefCell<Option<Source>>>);
        impl Processor for Loop {
            fn process(&mut self, block: &mut Block) {
                if let Some(src) = self.0.borrow().as_ref() {
                    block.copy_from_slice(&*src.process());
                }
            }
        }
        let clock = Clock::new();
        let slot = Rc::new(RefCell::new(None));
        let src = clock.source(Loop(slot.clone()));
        *slot.borrow_mut() = Some(src.clone());
        clock.advance();
        let _ = src.process();
    }

    #[test]
    fn fill_is_continuous_across_odd_sizes() {
        let clock = Clock::new();
        let (src, _) = counter(&clock);
        let mut engine = Engine::new(clock, src);
        let mut out = vec![0.0; 1000];
        let mut pos = 0;
        for chunk in [1usize, 100, 255, 300, 344] {
            engine.fill(&mut out[pos..pos + chunk]);
            pos += chunk;
        }
        for (i, s) in out.iter().enumerate() {
            assert_eq!(*s, i as Sample);
        }
        assert_eq!(engine.ticks(), 4);
    }

    #[test]
    fn tick_advances_time() {
        let clock = Clock::new();
        let (src, _) = counter(&clock);
        let mut engine = Engine::new(clock, src);
        let mut block = silence();
        for _ in 0..10 {
            engine.tick(&mut block);
        }
        assert_eq!(engine.ticks(), 10);
        let expected = 10.0 * BLOCK_LEN as f64 / SAMPLE_RATE as f64;
        assert!((engine.time() - expected).abs() < 1e-12);
    }
}
