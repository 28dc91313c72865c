//! Sepal: a coroutine-based discrete-event simulation kernel for digital
//! logic.
//!
//! The kernel schedules many independent, long-lived process routines,
//! advancing a logical clock only when nothing more can happen at the
//! current instant and re-activating processes when the signals they
//! watch commit a change in a matching direction — the engine that
//! underlies a tiny Verilog/VHDL-style simulator.
//!
//! A simulation is assembled on a [`Simulator`]: create signals with
//! [`add_signal`](Simulator::add_signal), register `async` process
//! routines with [`register_process`](Simulator::register_process), then
//! call [`run`](Simulator::run). Routines cooperate through the
//! [`SimHandle`] they receive: awaiting [`delay`](SimHandle::delay) or
//! [`wait`](SimHandle::wait) returns control to the scheduler, and
//! simulated time only moves across those suspensions.
//!
//! ```
//! use sepal::{Edge, RuntimeConfig, Simulator};
//!
//! let config = RuntimeConfig::builder()
//!     .quiet(true)
//!     .debug_logging(false)
//!     .build();
//! let mut sim = Simulator::new(config);
//! let clk = sim.add_signal("clk", 0);
//!
//! sim.register_process("clock", move |sim| async move {
//!     for _ in 0..4 {
//!         sim.write(clk, 1 - sim.read(clk));
//!         sim.delay(1).await;
//!     }
//! })
//! .unwrap();
//!
//! sim.register_process("watcher", move |sim| async move {
//!     sim.wait(clk, Edge::Rising).await;
//!     assert_eq!(sim.read(clk), 1);
//! })
//! .unwrap();
//!
//! sim.run();
//! assert_eq!(sim.time(), 4);
//! ```

pub mod configuration;
pub mod errors;
pub mod kernel;
pub mod logging;

pub use configuration::RuntimeConfig;
pub use errors::{BoxedSimError, SimError, SimResult};
pub use kernel::{Delay, Edge, ProcessIdx, SignalIdx, SimHandle, Simulator, Wait};
