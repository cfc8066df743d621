use std::time::Duration;

/// Turns monotonically increasing frame timestamps into per-frame deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameClock {
    last_time: Duration,
}

impl FrameClock {
    /// Creates a clock whose previous timestamp is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_time: Duration::ZERO,
        }
    }

    /// Timestamp of the most recent frame.
    #[must_use]
    pub const fn last_time(&self) -> Duration {
        self.last_time
    }

    /// Records `timestamp` and returns the time elapsed since the previous one.
    ///
    /// A timestamp earlier than the previous one yields a zero delta.
    pub fn advance(&mut self, timestamp: Duration) -> Duration {
        let dt = timestamp.saturating_sub(self.last_time);
        self.last_time = timestamp;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delta_is_measured_from_zero() {
        let mut clock = FrameClock::new();

        assert_eq!(clock.advance(Duration::ZERO), Duration::ZERO);
        assert_eq!(clock.advance(Duration::from_millis(16)), Duration::from_millis(16));
        assert_eq!(clock.advance(Duration::from_millis(40)), Duration::from_millis(24));
        assert_eq!(clock.last_time(), Duration::from_millis(40));
    }

    #[test]
    fn backwards_timestamps_saturate() {
        let mut clock = FrameClock::new();
        let _ = clock.advance(Duration::from_millis(100));

        assert_eq!(clock.advance(Duration::from_millis(90)), Duration::ZERO);
        assert_eq!(clock.last_time(), Duration::from_millis(90));
    }
}
