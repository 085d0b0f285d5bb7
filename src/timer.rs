//! Millisecond timers driven by an externally supplied clock reading.
//!
//! Nothing here reads the wall clock itself; the main loop passes `now`
//! (milliseconds since startup) so the same code runs under test with a
//! hand-advanced clock.

/// One-shot timer: started at some instant, active until `duration` ms later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    duration: u64,
    started_at: Option<u64>,
}

impl Timer {
    pub const fn new(duration: u64) -> Self {
        Self {
            duration,
            started_at: None,
        }
    }

    pub fn start(&mut self, now: u64) {
        self.started_at = Some(now);
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Milliseconds since the last `start`, zero if never started.
    pub fn elapsed(&self, now: u64) -> u64 {
        self.started_at
            .map(|start| now.saturating_sub(start))
            .unwrap_or(0)
    }

    /// True once `elapsed >= duration`.
    pub fn expired(&self, now: u64) -> bool {
        self.is_active() && self.elapsed(now) >= self.duration
    }

    /// Clears the timer once it has expired. Returns true on the clearing call.
    pub fn update(&mut self, now: u64) -> bool {
        if self.expired(now) {
            self.started_at = None;
            true
        } else {
            false
        }
    }
}

/// Repeating timer firing every `interval` ms after `origin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: u64,
    next_at: u64,
}

impl IntervalTimer {
    pub fn new(interval: u64, origin: u64) -> Self {
        debug_assert!(interval > 0);
        Self {
            interval,
            next_at: origin + interval,
        }
    }

    /// Number of periods that completed since the previous poll.
    pub fn poll(&mut self, now: u64) -> u32 {
        let mut fired = 0;
        while now >= self.next_at {
            self.next_at += self.interval;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_clears_on_first_update_past_duration() {
        let mut t = Timer::new(300);
        assert!(!t.is_active());
        t.start(1000);
        assert!(!t.update(1299));
        assert!(t.is_active());
        assert!(t.update(1300));
        assert!(!t.is_active());
        assert!(!t.update(2000));
    }

    #[test]
    fn elapsed_is_zero_when_idle() {
        let mut t = Timer::new(10);
        assert_eq!(t.elapsed(50), 0);
        t.start(40);
        assert_eq!(t.elapsed(50), 10);
        assert!(t.expired(50));
    }

    #[test]
    fn interval_timer_fires_on_boundaries() {
        let mut t = IntervalTimer::new(400, 100);
        assert_eq!(t.poll(499), 0);
        assert_eq!(t.poll(500), 1);
        assert_eq!(t.poll(500), 0);
        assert_eq!(t.poll(1700), 3);
    }
}
