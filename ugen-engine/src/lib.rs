//! ugen engine: block execution model, unit generators and demo patches.
//!
//! Crate layout:
//! - [`graph`]       : `Processor` / `Source` / `Trigger` roles, `Clock`, `Engine`, port tables
//! - [`nodes`]       : `Value`, `Mul`, `Sum`, `MulSum`, `Clip`, `Quant`, `Noise`
//! - [`oscillators`] : `Square`, `Sin`
//! - [`envelope`]    : `Env`
//! - [`effects`]     : `Delay`, `Filter`
//! - [`sequencing`]  : `Rand`, `Skip`, `Step`
//! - [`patches`]     : hand-wired example patches
//!
//! Wiring is the caller's job: every input is a constructor argument, so a node
//! cannot exist with an unbound port. The [`ports_of`] table describes each node
//! type's inputs for builders that work by name.

pub mod effects;
pub mod envelope;
pub mod graph;
pub mod nodes;
pub mod oscillators;
pub mod patches;
pub mod sequencing;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use graph::{silence, Block, Clock, Engine, Port, Ports, Processor, Role, Source, Trigger};
pub use ugen_core::dsp::{Sample, BLOCK_LEN, SAMPLE_RATE};

use effects::{Delay, Filter};
use envelope::Env;
use nodes::{Clip, Mul, MulSum, Noise, Quant, Sum, Value};
use oscillators::{Sin, Square};
use sequencing::{Rand, Skip, Step};

const REGISTRY: &[(&str, &[Port])] = &[
    (<Square as Ports>::KIND, <Square as Ports>::PORTS),
    (<Sin as Ports>::KIND, <Sin as Ports>::PORTS),
    (<Mul as Ports>::KIND, <Mul as Ports>::PORTS),
    (<Sum as Ports>::KIND, <Sum as Ports>::PORTS),
    (<MulSum as Ports>::KIND, <MulSum as Ports>::PORTS),
    (<Env as Ports>::KIND, <Env as Ports>::PORTS),
    (<Clip as Ports>::KIND, <Clip as Ports>::PORTS),
    (<Quant as Ports>::KIND, <Quant as Ports>::PORTS),
    (<Value as Ports>::KIND, <Value as Ports>::PORTS),
    (<Rand as Ports>::KIND, <Rand as Ports>::PORTS),
    (<Delay as Ports>::KIND, <Delay as Ports>::PORTS),
    (<Skip as Ports>::KIND, <Skip as Ports>::PORTS),
    (<Step as Ports>::KIND, <Step as Ports>::PORTS),
    (<Noise as Ports>::KIND, <Noise as Ports>::PORTS),
    (<Filter as Ports>::KIND, <Filter as Ports>::PORTS),
];

/// Every registered node kind, in registry order.
pub fn kinds() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(kind, _)| *kind)
}

/// Port table for a node kind (`"square"`, `"env"`, ...).
pub fn ports_of(kind: &str) -> Option<&'static [Port]> {
    REGISTRY.iter().find(|(k, _)| *k == kind).map(|(_, ports)| *ports)
}
