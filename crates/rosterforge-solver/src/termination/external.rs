//! External termination via AtomicBool flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::Termination;

/// Terminates when an external flag is set.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
/// use rosterforge_solver::termination::{ExternalTermination, Termination};
///
/// let flag = AtomicBool::new(false);
/// let term = ExternalTermination::new(&flag);
/// assert!(!term.is_terminated(Duration::ZERO));
///
/// flag.store(true, Ordering::SeqCst);
/// assert!(term.is_terminated(Duration::ZERO));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExternalTermination<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ExternalTermination<'a> {
    /// Creates a termination that checks the given flag.
    pub fn new(flag: &'a AtomicBool) -> Self {
        Self { flag }
    }
}

impl Termination for ExternalTermination<'_> {
    fn is_terminated(&self, _elapsed: Duration) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
