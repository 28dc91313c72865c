use std::{
    cell::RefCell,
    future::Future,
    rc::Rc,
    task::{Context, Waker},
};

use ahash::{HashMap, HashMapExt};
use slog::{debug, trace, Logger};
use smallvec::{smallvec, SmallVec};

use sepal_idx::IndexedMap;

use crate::{
    configuration::RuntimeConfig,
    errors::{SimError, SimResult},
    logging,
};

use super::{
    futures::{Delay, Wait, NO_CURRENT_PROCESS},
    indexes::{ProcessIdx, SignalIdx},
    process::{Continuation, Process},
    queue::EventQueue,
    sensitivity::{Edge, SensitivityArena},
    signal::Signal,
};

/// The kernel's mutable state. Everything the scheduler and the process
/// handles touch lives here, behind a single `RefCell` confined to one
/// thread.
pub(crate) struct Kernel {
    pub processes: IndexedMap<ProcessIdx, Process>,
    pub signals: IndexedMap<SignalIdx, Signal>,
    pub sensitivities: SensitivityArena,
    pub queue: EventQueue,
    /// Head of the list of signals with uncommitted changes.
    pub active_head: Option<SignalIdx>,
    /// The process currently being executed, if any.
    pub current: Option<ProcessIdx>,
    /// The logical clock. Never moves backward.
    pub now: u64,
    /// Set once initial activation has happened; a finished simulator
    /// stays valid but inert.
    pub started: bool,
    names: HashMap<String, ProcessIdx>,
}

impl Kernel {
    fn new() -> Self {
        Self {
            processes: IndexedMap::new(),
            signals: IndexedMap::new(),
            sensitivities: SensitivityArena::new(),
            queue: EventQueue::new(),
            active_head: None,
            current: None,
            now: 0,
            started: false,
            names: HashMap::new(),
        }
    }
}

/// The discrete-event scheduler.
///
/// Owns the process set, the signal cells, the event queue and the
/// logical clock. A simulation is assembled by creating signals and
/// registering process routines, then driven to completion with
/// [`run`](Simulator::run).
///
/// Scheduling is strictly single-threaded, cooperative and
/// non-preemptive: exactly one process executes at a time, running
/// uninterrupted between the suspension points it chooses itself.
pub struct Simulator {
    kernel: Rc<RefCell<Kernel>>,
    logger: Logger,
}

impl Simulator {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            kernel: Rc::new(RefCell::new(Kernel::new())),
            logger: logging::initialize(config.get_logging_config()),
        }
    }

    /// The logical clock, in ticks.
    pub fn time(&self) -> u64 {
        self.kernel.borrow().now
    }

    /// Create a named signal with the given initial committed value.
    pub fn add_signal(
        &mut self,
        name: impl Into<String>,
        initial: u64,
    ) -> SignalIdx {
        self.kernel
            .borrow_mut()
            .signals
            .push(Signal::new(name.into(), initial))
    }

    /// The committed value of a signal. Never blocks.
    pub fn value(&self, signal: SignalIdx) -> u64 {
        self.kernel.borrow().signals[signal].value
    }

    /// Create a process with the given name and top-level routine.
    ///
    /// The routine receives a [`SimHandle`] and is stored at its initial
    /// suspension point; it does not begin executing until the
    /// simulation runs. Names must be unique.
    pub fn register_process<F, Fut>(
        &mut self,
        name: impl Into<String>,
        routine: F,
    ) -> SimResult<ProcessIdx>
    where
        F: FnOnce(SimHandle) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let name = name.into();
        if self.kernel.borrow().names.contains_key(&name) {
            return Err(SimError::DuplicateProcess(name).into());
        }

        // building the future does not run any of the routine's body
        let continuation: Continuation =
            Box::pin(routine(SimHandle::new(self.kernel.clone())));

        let mut kernel = self.kernel.borrow_mut();
        let mut process = Process::new(name.clone());
        process.continuation = Some(continuation);
        let idx = kernel.processes.push(process);
        kernel.names.insert(name.clone(), idx);

        debug!(self.logger, "registered process '{}'", name);
        Ok(idx)
    }

    /// Run the simulation until the event queue drains, either naturally
    /// or through a [`finish`](SimHandle::finish) request.
    ///
    /// Processes left genuinely suspended mid-wait when the run stops
    /// keep their resources until the simulator is dropped.
    pub fn run(&mut self) {
        {
            let mut kernel = self.kernel.borrow_mut();
            let kernel = &mut *kernel;
            if !kernel.started {
                kernel.started = true;
                // initial activation: every registered process is due at
                // tick zero, last registered closest to the head
                for idx in kernel.processes.range() {
                    if kernel.processes[idx].continuation.is_some() {
                        kernel.queue.push_front(&mut kernel.processes, idx);
                    }
                }
            }
        }
        debug!(self.logger, "simulation running");

        loop {
            let current = {
                let mut kernel = self.kernel.borrow_mut();
                let kernel = &mut *kernel;

                let Some(head) = kernel.queue.head() else {
                    break;
                };
                if kernel.processes[head].delay != 0 {
                    // nothing more can happen at this instant: commit
                    // pending signal changes and wake their watchers
                    self.settle(kernel);
                }

                // settlement may have pushed newly woken processes in
                // front of the delayed head; those run first, at the
                // current tick
                let idx = kernel
                    .queue
                    .pop(&mut kernel.processes)
                    .expect("event queue cannot empty during settlement");
                let delay = kernel.processes[idx].delay;
                if delay != 0 {
                    kernel.now += delay;
                }
                kernel.current = Some(idx);

                trace!(
                    self.logger,
                    "({}) resuming process '{}'",
                    kernel.now,
                    kernel.processes[idx].name
                );
                idx
            };

            let mut continuation = self.kernel.borrow_mut().processes
                [current]
                .continuation
                .take()
                .expect("queued process has no continuation");

            let mut cx = Context::from_waker(Waker::noop());
            let completed = continuation.as_mut().poll(&mut cx).is_ready();

            {
                let mut kernel = self.kernel.borrow_mut();
                kernel.current = None;
                if !completed {
                    kernel.processes[current].continuation =
                        Some(continuation);
                } else {
                    trace!(
                        self.logger,
                        "({}) process '{}' completed",
                        kernel.now,
                        kernel.processes[current].name
                    );
                }
            }
            // a completed continuation drops here, outside the borrow
        }

        debug!(self.logger, "simulation idle at tick {}", self.time());
    }

    /// The delta cycle: drain the active-signal list, waking matching
    /// watchers and committing pending values.
    ///
    /// Edge eligibility for every binding of a pass is evaluated against
    /// the signal's pre-settlement committed value, so visitation order
    /// cannot create read-after-write hazards within one cycle. A woken
    /// process goes to the queue head with zero delay, guarded against
    /// double activation by its membership flag.
    fn settle(&self, kernel: &mut Kernel) {
        while let Some(sig_idx) = kernel.active_head {
            let mut cursor = kernel.signals[sig_idx].watchers;
            while let Some(binding_idx) = cursor {
                let (next, process, edge) = {
                    let binding = kernel.sensitivities.get(binding_idx);
                    (binding.next, binding.process, binding.edge)
                };
                cursor = next;

                if !kernel.processes[process].queued {
                    let old = kernel.signals[sig_idx].value;
                    let new = kernel.signals[sig_idx].next_value;
                    if edge.matches(old, new) {
                        kernel
                            .queue
                            .push_front(&mut kernel.processes, process);
                        trace!(
                            self.logger,
                            "({}) process '{}' activated by '{}'",
                            kernel.now,
                            kernel.processes[process].name,
                            kernel.signals[sig_idx].name
                        );
                    }
                }
            }

            let signal = &mut kernel.signals[sig_idx];
            signal.value = signal.next_value;
            signal.is_active = false;
            kernel.active_head = signal.active_link.take();
            trace!(
                self.logger,
                "({}) signal '{}' = {}",
                kernel.now,
                signal.name,
                signal.value
            );
        }
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        // Suspended continuations capture handles that keep the kernel
        // alive; take them out and drop them outside the borrow so that
        // their cleanup can re-enter the kernel to release still-bound
        // sensitivities.
        let continuations: Vec<Continuation> = {
            let mut kernel = self.kernel.borrow_mut();
            kernel
                .processes
                .iter_mut()
                .filter_map(|(_, process)| process.continuation.take())
                .collect()
        };
        drop(continuations);
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kernel = self.kernel.borrow();
        f.debug_struct("Simulator")
            .field("now", &kernel.now)
            .field("processes", &kernel.processes.len())
            .field("signals", &kernel.signals.len())
            .finish_non_exhaustive()
    }
}

/// The handle given to every process routine.
///
/// Cheap to clone; all operations act on the kernel that created it.
/// The suspending and mutating operations may only be used while the
/// process is executing under the scheduler — using them from outside a
/// running process panics with a "no process is currently executing"
/// failure.
#[derive(Clone)]
pub struct SimHandle {
    kernel: Rc<RefCell<Kernel>>,
}

impl SimHandle {
    fn new(kernel: Rc<RefCell<Kernel>>) -> Self {
        Self { kernel }
    }

    /// The logical clock, in ticks.
    pub fn time(&self) -> u64 {
        self.kernel.borrow().now
    }

    /// The committed value of a signal. Never blocks and never observes
    /// an uncommitted write.
    pub fn read(&self, signal: SignalIdx) -> u64 {
        self.kernel.borrow().signals[signal].value
    }

    /// Queue `value` to take effect at the next delta-cycle settlement.
    ///
    /// If the value differs from the committed one and the signal is not
    /// already pending, the signal joins the active list; rewrites
    /// before settlement coalesce into the latest value with no
    /// duplicate membership.
    pub fn write(&self, signal: SignalIdx, value: u64) {
        let mut kernel = self.kernel.borrow_mut();
        let kernel = &mut *kernel;
        kernel.current.expect(NO_CURRENT_PROCESS);

        let sig = &mut kernel.signals[signal];
        sig.next_value = value;
        if value != sig.value && !sig.is_active {
            sig.is_active = true;
            sig.active_link = kernel.active_head;
            kernel.active_head = Some(signal);
        }
    }

    /// Suspend the current process for at least `ticks` ticks of logical
    /// time.
    pub fn delay(&self, ticks: u64) -> Delay {
        Delay::new(self.kernel.clone(), ticks)
    }

    /// Suspend the current process until `signal` commits a transition
    /// matching `edge`.
    pub fn wait(&self, signal: SignalIdx, edge: Edge) -> Wait {
        Wait::new(self.kernel.clone(), smallvec![(signal, edge)])
    }

    /// Suspend the current process until any of the watched signals
    /// commits a matching transition. All bindings are released when the
    /// process resumes, whichever of them fired.
    pub fn wait_any(&self, watch: &[(SignalIdx, Edge)]) -> Wait {
        Wait::new(self.kernel.clone(), SmallVec::from_slice(watch))
    }

    /// Request termination: empties the event queue, so the run loop
    /// exits once the current process relinquishes control. Idempotent.
    pub fn finish(&self) {
        let mut kernel = self.kernel.borrow_mut();
        let kernel = &mut *kernel;
        kernel.current.expect(NO_CURRENT_PROCESS);
        kernel.queue.clear(&mut kernel.processes);
    }
}

impl std::fmt::Debug for SimHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimHandle").finish_non_exhaustive()
    }
}
