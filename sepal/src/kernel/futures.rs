use std::{
    cell::RefCell,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use smallvec::SmallVec;

use super::{
    indexes::{SensitivityIdx, SignalIdx},
    sensitivity::Edge,
    simulator::Kernel,
};

/// Panic message for kernel operations invoked outside a running process.
pub(crate) const NO_CURRENT_PROCESS: &str =
    "no process is currently executing";

enum AwaitState {
    /// Not yet polled; the suspension has not been registered.
    Created,
    /// Registered with the kernel and waiting to be resumed.
    Suspended,
    /// Resumed; any further poll is a no-op.
    Done,
}

/// Awaitable returned by [`SimHandle::delay`](super::SimHandle::delay).
///
/// The first poll re-enters the current process into the event queue
/// `ticks` from now and suspends; the scheduler's next resumption of the
/// process completes it.
#[must_use = "futures do nothing unless awaited"]
pub struct Delay {
    kernel: Rc<RefCell<Kernel>>,
    ticks: u64,
    state: AwaitState,
}

impl Delay {
    pub(crate) fn new(kernel: Rc<RefCell<Kernel>>, ticks: u64) -> Self {
        Self {
            kernel,
            ticks,
            state: AwaitState::Created,
        }
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match this.state {
            AwaitState::Created => {
                let mut kernel = this.kernel.borrow_mut();
                let kernel = &mut *kernel;
                let current = kernel.current.expect(NO_CURRENT_PROCESS);
                kernel.queue.insert_delayed(
                    &mut kernel.processes,
                    current,
                    this.ticks,
                );
                this.state = AwaitState::Suspended;
                Poll::Pending
            }
            AwaitState::Suspended | AwaitState::Done => {
                this.state = AwaitState::Done;
                Poll::Ready(())
            }
        }
    }
}

/// Awaitable returned by [`SimHandle::wait`](super::SimHandle::wait) and
/// [`SimHandle::wait_any`](super::SimHandle::wait_any).
///
/// The first poll creates one sensitivity binding per watched signal and
/// suspends *without* re-entering the event queue; only a matching
/// committed transition re-queues the process. The bindings are released
/// on the first poll after resumption, before the process body regains
/// control, and by `Drop` if the process is torn down mid-wait.
#[must_use = "futures do nothing unless awaited"]
pub struct Wait {
    kernel: Rc<RefCell<Kernel>>,
    watch: SmallVec<[(SignalIdx, Edge); 2]>,
    bound: SmallVec<[SensitivityIdx; 2]>,
    state: AwaitState,
}

impl Wait {
    pub(crate) fn new(
        kernel: Rc<RefCell<Kernel>>,
        watch: SmallVec<[(SignalIdx, Edge); 2]>,
    ) -> Self {
        Self {
            kernel,
            watch,
            bound: SmallVec::new(),
            state: AwaitState::Created,
        }
    }

    fn release_bindings(&mut self) {
        let mut kernel = self.kernel.borrow_mut();
        let kernel = &mut *kernel;
        for idx in self.bound.drain(..) {
            kernel.sensitivities.release(&mut kernel.signals, idx);
        }
    }
}

impl Future for Wait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match this.state {
            AwaitState::Created => {
                {
                    let mut kernel = this.kernel.borrow_mut();
                    let kernel = &mut *kernel;
                    let current = kernel.current.expect(NO_CURRENT_PROCESS);
                    for (signal, edge) in this.watch.iter() {
                        this.bound.push(kernel.sensitivities.bind(
                            &mut kernel.signals,
                            current,
                            *signal,
                            *edge,
                        ));
                    }
                }
                this.state = AwaitState::Suspended;
                Poll::Pending
            }
            AwaitState::Suspended => {
                this.release_bindings();
                this.state = AwaitState::Done;
                Poll::Ready(())
            }
            AwaitState::Done => Poll::Ready(()),
        }
    }
}

impl Drop for Wait {
    fn drop(&mut self) {
        // A process torn down mid-wait still owns its bindings; they are
        // unlinked here so the watcher sets never hold vacant slots.
        if !self.bound.is_empty() {
            self.release_bindings();
        }
    }
}
