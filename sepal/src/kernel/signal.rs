use super::indexes::{SensitivityIdx, SignalIdx};

/// A named value cell with change tracking.
///
/// Writes land in `next_value` and only become visible to readers when
/// the delta-cycle settlement commits them. A signal whose pending value
/// differs from its committed one sits on the kernel's active list until
/// that commit happens.
#[derive(Debug)]
pub(crate) struct Signal {
    /// Name for diagnostics and the log.
    pub name: String,
    /// The committed value, visible to readers.
    pub value: u64,
    /// The value that takes effect at the next settlement.
    pub next_value: u64,
    /// True iff a change is queued and not yet committed.
    pub is_active: bool,
    /// Active-signal-list chain link.
    pub active_link: Option<SignalIdx>,
    /// Head of this signal's doubly-linked set of sensitivity bindings.
    pub watchers: Option<SensitivityIdx>,
}

impl Signal {
    pub fn new(name: String, initial: u64) -> Self {
        Self {
            name,
            value: initial,
            next_value: initial,
            is_active: false,
            active_link: None,
            watchers: None,
        }
    }
}
