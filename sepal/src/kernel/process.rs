use std::{future::Future, pin::Pin};

use super::indexes::ProcessIdx;

/// The suspended execution point of a process routine. Created once at
/// registration and entered each time the scheduler resumes the process.
pub(crate) type Continuation = Pin<Box<dyn Future<Output = ()>>>;

/// Bookkeeping for one schedulable unit of simulated behavior.
///
/// Descriptors live in the kernel's process arena and are never removed;
/// a routine that runs to completion simply drops its continuation and
/// the descriptor persists inertly.
pub(crate) struct Process {
    /// Name for diagnostics and the log.
    pub name: String,
    /// Ticks remaining before activation, relative to the predecessor in
    /// the event queue. Zero once due.
    pub delay: u64,
    /// Event-queue chain link.
    pub link: Option<ProcessIdx>,
    /// True iff this process is currently chained from the queue head.
    /// A process appears in the event queue at most once.
    pub queued: bool,
    /// The stored routine, absent while the scheduler is entering it and
    /// after it has run to completion.
    pub continuation: Option<Continuation>,
}

impl Process {
    pub fn new(name: String) -> Self {
        Self {
            name,
            delay: 0,
            link: None,
            queued: false,
            continuation: None,
        }
    }
}

impl std::fmt::Debug for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Process")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .field("link", &self.link)
            .field("queued", &self.queued)
            .field(
                "continuation",
                &self.continuation.as_ref().map(|_| "<suspended>"),
            )
            .finish()
    }
}
