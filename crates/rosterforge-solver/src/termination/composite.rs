//! Composite termination (OR).

use std::time::Duration;

use super::Termination;

/// Terminates when either child terminates.
///
/// # Example
///
/// ```
/// use std::sync::atomic::AtomicBool;
/// use std::time::Duration;
/// use rosterforge_solver::termination::{
///     ExternalTermination, OrTermination, Termination, TimeTermination,
/// };
///
/// let flag = AtomicBool::new(false);
/// let term = OrTermination::new(TimeTermination::seconds(5), ExternalTermination::new(&flag));
/// assert!(term.is_terminated(Duration::from_secs(6)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OrTermination<A, B>(pub A, pub B);

impl<A, B> OrTermination<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self(first, second)
    }
}

impl<A: Termination, B: Termination> Termination for OrTermination<A, B> {
    fn is_terminated(&self, elapsed: Duration) -> bool {
        self.0.is_terminated(elapsed) || self.1.is_terminated(elapsed)
    }
}
