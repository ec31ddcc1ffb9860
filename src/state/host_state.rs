use std::time::{Duration, Instant};

/// Tracks request timing for one host
///
/// The scheduler keeps one of these per host when per-host politeness is
/// enabled.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of fetches dispatched to this host
    pub request_count: u32,

    /// When the last fetch to this host was dispatched
    pub last_request_time: Option<Instant>,
}

impl HostState {
    /// Creates a new HostState with no recorded requests
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a fetch was dispatched to this host
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next request may be dispatched
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_delay {
            Some(min_delay - elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_host_state() {
        let state = HostState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.last_request_time.is_none());
    }

    #[test]
    fn test_no_wait_before_first_request() {
        let state = HostState::new();
        let wait = state.time_until_next_request(Duration::from_secs(1), Instant::now());
        assert!(wait.is_none());
    }

    #[test]
    fn test_wait_after_request() {
        let mut state = HostState::new();
        let now = Instant::now();
        state.record_request(now);

        let wait = state
            .time_until_next_request(Duration::from_millis(1000), now + Duration::from_millis(400))
            .unwrap();
        assert_eq!(wait, Duration::from_millis(600));
        assert_eq!(state.request_count, 1);
    }

    #[test]
    fn test_no_wait_once_delay_elapsed() {
        let mut state = HostState::new();
        let now = Instant::now();
        state.record_request(now);

        let later = now + Duration::from_millis(1500);
        assert!(state
            .time_until_next_request(Duration::from_millis(1000), later)
            .is_none());
    }
}
