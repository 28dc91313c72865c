use sepal_idx::impl_index;

// all of these are u32 newtypes; the macro takes an optional backing type
// if any of them ever needs to shrink or grow

/// The index of a process descriptor in the scheduler's process arena.
/// Also the link type threaded through the event queue.
#[derive(Debug, Eq, Copy, Clone, PartialEq, Hash, PartialOrd, Ord)]
pub struct ProcessIdx(u32);
impl_index!(ProcessIdx);

/// The index of a signal cell in the scheduler's signal arena. Also the
/// link type threaded through the active-signal list.
#[derive(Debug, Eq, Copy, Clone, PartialEq, Hash, PartialOrd, Ord)]
pub struct SignalIdx(u32);
impl_index!(SignalIdx);

/// The index of a sensitivity binding slot. Slots are recycled through a
/// free list, so these must never be held across a release of the
/// binding they name.
#[derive(Debug, Eq, Copy, Clone, PartialEq, Hash, PartialOrd, Ord)]
pub struct SensitivityIdx(u32);
impl_index!(SensitivityIdx);
