//! Discrete-event helpers: rising-edge detection, pulse division, step indexing.

use crate::dsp::Sample;

/// Rising-edge detector. Fires on the sample where the signal goes from
/// `<= 0` to `> 0`. One detector per consumer; the history is its own.
#[derive(Copy, Clone, Debug, Default)]
pub struct Edge {
    last: Sample,
}

impl Edge {
    #[inline]
    pub fn new() -> Self { Self { last: 0.0 } }

    #[inline]
    pub fn is_trigger(&mut self, s: Sample) -> bool {
        let fired = self.last <= 0.0 && s > 0.0;
        self.last = s;
        fired
    }
}

/// Clock divider: passes one pulse out of every `m` triggers.
#[derive(Copy, Clone, Debug, Default)]
pub struct PulseDivider {
    n: i64,
}

impl PulseDivider {
    #[inline]
    pub fn new() -> Self { Self { n: 0 } }

    /// Register a trigger with divisor `m`. `m <= 0` always fires.
    #[inline]
    pub fn trigger(&mut self, m: i64) -> bool {
        if m <= 0 || self.n % m == 0 {
            self.n = 1;
            true
        } else {
            self.n += 1;
            false
        }
    }

    /// Divisor encoded in a control sample: `trunc(s * 10)`.
    #[inline]
    pub fn divisor_of(s: Sample) -> i64 {
        (s * 10.0) as i64
    }
}

/// Index into `N` steps that advances on trigger and returns to 0 on reset.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepIndex<const N: usize> {
    n: usize,
}

impl<const N: usize> StepIndex<N> {
    #[inline]
    pub fn new() -> Self { Self { n: 0 } }

    /// Apply this sample's events (advance first, then reset) and return the index.
    #[inline]
    pub fn next(&mut self, advance: bool, reset: bool) -> usize {
        if advance {
            self.n = (self.n + 1) % N;
        }
        if reset {
            self.n = 0;
        }
        self.n
    }

    #[inline] pub fn index(&self) -> usize { self.n }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_fires_once_per_rise() {
        let mut e = Edge::new();
        let fired: Vec<bool> = [0.0, 1.0, 1.0, 0.0, -1.0, 0.5, 0.5, 0.0]
            .iter()
            .map(|&s| e.is_trigger(s))
            .collect();
        assert_eq!(fired, [false, true, false, false, false, true, false, false]);
    }

    #[test]
    fn edge_fires_on_high_start() {
        let mut e = Edge::new();
        assert!(e.is_trigger(1.0));
        assert!(!e.is_trigger(1.0));
    }

    #[test]
    fn divider_by_three() {
        let mut d = PulseDivider::new();
        let pulses: Vec<usize> = (1..=9).filter(|_| d.trigger(3)).collect();
        assert_eq!(pulses, [1, 4, 7]);
    }

    #[test]
    fn divider_non_positive_always_fires() {
        let mut d = PulseDivider::new();
        assert!((0..5).all(|_| d.trigger(0)));
        assert!((0..5).all(|_| d.trigger(-2)));
    }

    #[test]
    fn divisor_truncates() {
        assert_eq!(PulseDivider::divisor_of(0.3), 3);
        assert_eq!(PulseDivider::divisor_of(0.39), 3);
        assert_eq!(PulseDivider::divisor_of(-0.15), -1);
    }

    #[test]
    fn step_cycles_and_resets() {
        let mut s = StepIndex::<4>::new();
        let seq: Vec<usize> = (0..5).map(|_| s.next(true, false)).collect();
        assert_eq!(seq, [1, 2, 3, 0, 1]);
        assert_eq!(s.next(false, true), 0);
        assert_eq!(s.next(true, true), 0);
    }
}
