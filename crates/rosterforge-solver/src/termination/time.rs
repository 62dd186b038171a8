//! Time-based termination.

use std::time::Duration;

use super::Termination;

/// Terminates once the run has spent its time limit.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rosterforge_solver::termination::{Termination, TimeTermination};
///
/// let term = TimeTermination::seconds(30);
/// assert!(!term.is_terminated(Duration::from_secs(29)));
/// assert!(term.is_terminated(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTermination {
    limit: Duration,
}

impl TimeTermination {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, elapsed: Duration) -> bool {
        elapsed >= self.limit
    }
}
