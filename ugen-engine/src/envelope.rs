//! `Env`: slew limiter with a triggered full-scale spike.
//!
//! `gate` supplies the level to follow, sample by sample. A `trig` edge forces a
//! ramp to 1.0 at the attack rate; afterwards the envelope slews toward `gate`
//! using `att` on the way up and `dec` on the way down. A full-scale ramp takes
//! `10 * t` seconds; `t <= 0` is instant.

use ugen_core::envelopes::SlewEnvelope;

use crate::graph::{Block, Port, Ports, Processor, Source, Trigger};
use crate::nodes::Input;

pub struct Env {
    gate: Input,
    trig: Trigger,
    att: Source,
    dec: Source,
    env: SlewEnvelope,
}

impl Env {
    pub fn new(gate: impl Processor + 'static, trig: Trigger, att: Source, dec: Source) -> Self {
        Self {
            gate: Box::new(gate),
            trig,
            att,
            dec,
            env: SlewEnvelope::new(),
        }
    }

    /// True while a triggered attack is still climbing.
    pub fn is_attacking(&self) -> bool { self.env.is_attacking() }
}

impl Processor for Env {
    fn process(&mut self, block: &mut Block) {
        self.gate.process(block);
        let att = self.att.process();
        let dec = self.dec.process();
        let (t, edge) = self.trig.process();
        for (i, s) in block.iter_mut().enumerate() {
            *s = self.env.next(*s, edge.is_trigger(t[i]), att[i], dec[i]);
        }
    }
}

impl Ports for Env {
    const KIND: &'static str = "env";
    const PORTS: &'static [Port] = &[
        Port::audio("gate"),
        Port::trigger("trig"),
        Port::signal("att"),
        Port::signal("dec"),
    ];
}
