use rand::Rng;
use serde::{Deserialize, Serialize};

// Phase boundaries are compared with this slack so a tick landing exactly
// on a boundary is not lost to float rounding.
const TIME_EPSILON: f64 = 1e-9;

/// Sine ease-in-out: zero slope at both ends.
pub fn ease_in_out(x: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::PI * x.clamp(0.0, 1.0)).cos()
}

/// Blink cadence and phase lengths, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkTiming {
    pub min_interval: f64,
    pub max_interval: f64,
    pub close: f64,
    pub hold: f64,
    pub open: f64,
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self {
            min_interval: 3.0,
            max_interval: 7.0,
            close: 0.09,
            hold: 0.03,
            open: 0.10,
        }
    }
}

impl BlinkTiming {
    pub fn cycle(&self) -> f64 {
        self.close + self.hold + self.open
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlinkPhase {
    Idle,
    Closing,
    Held,
    Opening,
}

impl BlinkPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Closing => "closing",
            Self::Held => "held",
            Self::Opening => "opening",
        }
    }
}

/// Autonomous blink state machine driven by an external time value.
///
/// Each call to [`tick`](Self::tick) advances through as many phases as the
/// elapsed time allows, so a long frame never stalls the cycle.
pub struct BlinkScheduler<R: Rng> {
    timing: BlinkTiming,
    phase: BlinkPhase,
    phase_start: f64,
    next_blink: f64,
    rng: R,
}

impl<R: Rng> BlinkScheduler<R> {
    pub fn new(timing: BlinkTiming, now: f64, mut rng: R) -> Self {
        let next_blink = now + draw_interval(&timing, &mut rng);
        Self {
            timing,
            phase: BlinkPhase::Idle,
            phase_start: now,
            next_blink,
            rng,
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    pub fn next_blink(&self) -> f64 {
        self.next_blink
    }

    /// Blink amount in `[0, 1]` at time `now`.
    pub fn tick(&mut self, now: f64) -> f32 {
        loop {
            let elapsed = now - self.phase_start;
            match self.phase {
                BlinkPhase::Idle => {
                    if now < self.next_blink {
                        return 0.0;
                    }
                    self.enter(BlinkPhase::Closing, now);
                }
                BlinkPhase::Closing => {
                    if elapsed + TIME_EPSILON < self.timing.close {
                        return ease_in_out((elapsed / self.timing.close) as f32);
                    }
                    self.enter(BlinkPhase::Held, self.phase_start + self.timing.close);
                }
                BlinkPhase::Held => {
                    if elapsed + TIME_EPSILON < self.timing.hold {
                        return 1.0;
                    }
                    self.enter(BlinkPhase::Opening, self.phase_start + self.timing.hold);
                }
                BlinkPhase::Opening => {
                    if elapsed + TIME_EPSILON < self.timing.open {
                        let t_open = (elapsed / self.timing.open) as f32;
                        return ease_in_out(1.0 - t_open);
                    }
                    self.next_blink = now + draw_interval(&self.timing, &mut self.rng);
                    self.enter(BlinkPhase::Idle, now);
                    return 0.0;
                }
            }
        }
    }

    fn enter(&mut self, phase: BlinkPhase, at: f64) {
        log::trace!(
            "blink {} -> {} at {:.3}",
            self.phase.as_str(),
            phase.as_str(),
            at
        );
        self.phase = phase;
        self.phase_start = at;
    }
}

fn draw_interval<R: Rng>(timing: &BlinkTiming, rng: &mut R) -> f64 {
    if timing.max_interval > timing.min_interval {
        rng.gen_range(timing.min_interval..timing.max_interval)
    } else {
        timing.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scheduler(seed: u64) -> BlinkScheduler<StdRng> {
        BlinkScheduler::new(BlinkTiming::default(), 0.0, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_ease_endpoints_and_monotonic() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_in_out(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_first_blink_scheduled_in_window() {
        let s = scheduler(7);
        assert!(s.next_blink() >= 3.0 && s.next_blink() <= 7.0);
        assert_eq!(s.phase(), BlinkPhase::Idle);
    }

    #[test]
    fn test_idle_before_schedule() {
        let mut s = scheduler(1);
        let start = s.next_blink();
        assert_eq!(s.tick(start - 0.01), 0.0);
        assert_eq!(s.phase(), BlinkPhase::Idle);
    }

    #[test]
    fn test_full_cycle() {
        let mut s = scheduler(42);
        let start = s.next_blink();
        let timing = BlinkTiming::default();

        assert!(s.tick(start).abs() < 1e-6);
        assert_eq!(s.phase(), BlinkPhase::Closing);

        let mid_close = s.tick(start + timing.close / 2.0);
        assert!((mid_close - 0.5).abs() < 1e-3);

        assert_eq!(s.tick(start + timing.close + timing.hold / 2.0), 1.0);
        assert_eq!(s.phase(), BlinkPhase::Held);

        let opening = s.tick(start + timing.close + timing.hold + timing.open / 4.0);
        assert_eq!(s.phase(), BlinkPhase::Opening);
        assert!(opening > 0.5 && opening < 1.0);

        let end = start + timing.cycle();
        assert_eq!(s.tick(end), 0.0);
        assert_eq!(s.phase(), BlinkPhase::Idle);
        assert!(s.next_blink() >= end + 3.0);
        assert!(s.next_blink() <= end + 7.0);
    }

    #[test]
    fn test_long_frame_skips_to_idle() {
        let mut s = scheduler(3);
        let start = s.next_blink();
        s.tick(start);
        assert_eq!(s.tick(start + 2.0), 0.0);
        assert_eq!(s.phase(), BlinkPhase::Idle);
        assert!(s.next_blink() >= start + 2.0 + 3.0);
    }

    proptest! {
        #[test]
        fn prop_amount_in_unit_range(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f64..0.5, 1..300)
        ) {
            let mut s = scheduler(seed);
            let mut now = 0.0;
            for dt in steps {
                now += dt;
                let amount = s.tick(now);
                prop_assert!((0.0..=1.0).contains(&amount));
            }
        }
    }
}
