use std::time::Duration;

/// Max backlog before we clamp (prevents spiral of death after a stall).
const MAX_ACCUMULATOR: Duration = Duration::from_millis(250);

/// Fixed-period timer driven by frame deltas.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    accumulator: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulator: Duration::ZERO,
        }
    }

    /// Feed elapsed time. Returns how many ticks are now due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        let cap = MAX_ACCUMULATOR.max(self.period);
        self.accumulator = (self.accumulator + dt).min(cap);

        let mut ticks = 0;
        while self.accumulator >= self.period {
            self.accumulator -= self.period;
            ticks += 1;
        }
        ticks
    }

    /// Time left until the next tick fires.
    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_period() {
        let mut t = Interval::new(Duration::from_millis(30));
        assert_eq!(t.advance(Duration::from_millis(20)), 0);
        assert_eq!(t.advance(Duration::from_millis(20)), 1);
        assert_eq!(t.remaining(), Duration::from_millis(20));
    }

    #[test]
    fn catches_up_multiple_ticks() {
        let mut t = Interval::new(Duration::from_millis(30));
        assert_eq!(t.advance(Duration::from_millis(95)), 3);
        assert_eq!(t.remaining(), Duration::from_millis(25));
    }

    #[test]
    fn backlog_is_clamped() {
        let mut t = Interval::new(Duration::from_millis(30));
        assert_eq!(t.advance(Duration::from_secs(10)), 8);
    }

    #[test]
    fn long_period_still_fires() {
        let mut t = Interval::new(Duration::from_millis(400));
        assert_eq!(t.advance(Duration::from_secs(1)), 1);
    }
}
