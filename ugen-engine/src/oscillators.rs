//! Square and sine generators.
//!
//! The pitch input is processed straight into the destination block, read back
//! one sample at a time, and overwritten with the waveform. The sync trigger
//! hard-resets the phase on every rising edge inside the block.

use ugen_core::dsp::PitchTracker;
use ugen_core::oscillators::{SinePhase, SquarePhase};

use crate::graph::{Block, Port, Ports, Processor, Trigger};
use crate::nodes::Input;

/// 50% duty square, 0.1 of pitch per octave, 0.0 == 440 Hz.
pub struct Square {
    pitch: Input,
    sync: Trigger,
    tracker: PitchTracker,
    osc: SquarePhase,
}

impl Square {
    pub fn new(pitch: impl Processor + 'static, sync: Trigger) -> Self {
        Self {
            pitch: Box::new(pitch),
            sync,
            tracker: PitchTracker::new(),
            osc: SquarePhase::new(),
        }
    }
}

impl Processor for Square {
    fn process(&mut self, block: &mut Block) {
        self.pitch.process(block);
        let (t, edge) = self.sync.process();
        for (s, &ts) in block.iter_mut().zip(t.iter()) {
            let hz = self.tracker.hz(*s);
            *s = self.osc.next(hz, edge.is_trigger(ts));
        }
    }
}

impl Ports for Square {
    const KIND: &'static str = "square";
    const PORTS: &'static [Port] = &[Port::audio("pitch"), Port::trigger("sync")];
}

/// Sine, same pitch convention as [`Square`].
pub struct Sin {
    pitch: Input,
    sync: Trigger,
    tracker: PitchTracker,
    osc: SinePhase,
}

impl Sin {
    pub fn new(pitch: impl Processor + 'static, sync: Trigger) -> Self {
        Self {
            pitch: Box::new(pitch),
            sync,
            tracker: PitchTracker::new(),
            osc: SinePhase::new(),
        }
    }
}

impl Processor for Sin {
    fn process(&mut self, block: &mut Block) {
        self.pitch.process(block);
        let (t, edge) = self.sync.process();
        for (s, &ts) in block.iter_mut().zip(t.iter()) {
            let hz = self.tracker.hz(*s);
            *s = self.osc.next(hz, edge.is_trigger(ts));
        }
    }
}

impl Ports for Sin {
    const KIND: &'static str = "sin";
    const PORTS: &'static [Port] = &[Port::audio("pitch"), Port::trigger("sync")];
}
