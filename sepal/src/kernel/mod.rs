mod futures;
mod indexes;
mod process;
mod queue;
mod sensitivity;
mod signal;
mod simulator;

pub use futures::{Delay, Wait};
pub use indexes::{ProcessIdx, SignalIdx};
pub use sensitivity::Edge;
pub use simulator::{SimHandle, Simulator};
