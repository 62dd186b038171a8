//! Termination conditions checked between stages and between chunks of a
//! stage.

mod composite;
mod external;
mod time;

use std::fmt::Debug;
use std::time::Duration;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use time::TimeTermination;

/// Decides whether an enumeration run should stop early.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if the run should stop, given the time spent so far.
    fn is_terminated(&self, elapsed: Duration) -> bool;
}

/// An absent condition never terminates.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, elapsed: Duration) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(elapsed))
    }
}
