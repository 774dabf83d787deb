//! Sliding-window rate limiter for user submissions.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Best-effort, in-process sliding-window rate limiter.
///
/// One instance owns the per-actor timestamp lists and is shared by reference
/// across request handlers. Windows are independent per actor and there is no
/// global cap. State is not persisted and not coordinated across processes;
/// the check is advisory abuse deterrence, not admission control, so a
/// concurrent race on the same actor is benign.
///
/// Entries are pruned lazily on access. Memory grows with the number of
/// distinct actors seen since startup.
#[derive(Debug, Default)]
pub struct RateLimiter {
    events: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission attempt for `actor_id` and report whether it is
    /// allowed.
    ///
    /// Timestamps older than `window` are discarded first. When the remaining
    /// count has already reached `max_events` the attempt is rejected and
    /// *not* recorded; otherwise it is recorded and allowed.
    pub fn allow(&self, actor_id: &str, window: Duration, max_events: usize) -> bool {
        self.allow_at(actor_id, window, max_events, Instant::now())
    }

    fn allow_at(&self, actor_id: &str, window: Duration, max_events: usize, now: Instant) -> bool {
        let mut events = self.events.lock().expect("rate limiter lock poisoned");
        let times = events.entry(actor_id.to_string()).or_default();

        times.retain(|&t| now.duration_since(t) < window);

        if times.len() >= max_events {
            return false;
        }

        times.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn allows_up_to_max_events() {
        let limiter = RateLimiter::new();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.allow_at("user-1", WINDOW, 5, now));
        }
        assert!(!limiter.allow_at("user-1", WINDOW, 5, now));
    }

    #[test]
    fn rejected_attempt_is_not_recorded() {
        let limiter = RateLimiter::new();
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.allow_at("user-1", WINDOW, 3, now));
        }
        // Hammering while rejected must not extend the window.
        for _ in 0..10 {
            assert!(!limiter.allow_at("user-1", WINDOW, 3, now));
        }

        let later = now + WINDOW + Duration::from_millis(1);
        assert!(limiter.allow_at("user-1", WINDOW, 3, later));
    }

    #[test]
    fn window_slides_past_earliest_event() {
        let limiter = RateLimiter::new();
        let start = Instant::now();

        assert!(limiter.allow_at("user-1", WINDOW, 2, start));
        assert!(limiter.allow_at("user-1", WINDOW, 2, start + Duration::from_secs(30)));
        assert!(!limiter.allow_at("user-1", WINDOW, 2, start + Duration::from_secs(40)));

        // The first event has aged out, one slot is free again.
        let after = start + Duration::from_secs(61);
        assert!(limiter.allow_at("user-1", WINDOW, 2, after));
        assert!(!limiter.allow_at("user-1", WINDOW, 2, after));
    }

    #[test]
    fn actors_are_independent() {
        let limiter = RateLimiter::new();
        let now = Instant::now();

        assert!(limiter.allow_at("user-1", WINDOW, 1, now));
        assert!(!limiter.allow_at("user-1", WINDOW, 1, now));
        assert!(limiter.allow_at("user-2", WINDOW, 1, now));
    }
}
