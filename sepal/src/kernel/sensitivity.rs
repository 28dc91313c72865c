use sepal_idx::IndexedMap;

use super::{
    indexes::{ProcessIdx, SensitivityIdx, SignalIdx},
    signal::Signal,
};

/// The edge filter of a sensitivity binding: which direction of committed
/// value change wakes the bound process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Fires on a commit taking the value from zero to nonzero.
    Rising,
    /// Fires on a commit taking the value from nonzero to zero.
    Falling,
    /// Fires when either the rising or the falling condition holds.
    Both,
    /// Fires whenever the binding is visited during settlement, i.e. on
    /// any queued change of the watched signal.
    Any,
}

impl Edge {
    /// Edge eligibility, evaluated against the signal's *old* committed
    /// value and its pending value. Every binding of a settlement pass
    /// sees the same old value regardless of visitation order.
    pub fn matches(&self, old: u64, new: u64) -> bool {
        match self {
            Edge::Rising => old == 0 && new != 0,
            Edge::Falling => old != 0 && new == 0,
            Edge::Both => (old == 0) != (new == 0),
            Edge::Any => true,
        }
    }
}

/// One (process, signal, edge) binding, a member of its signal's
/// doubly-linked watcher set.
#[derive(Debug)]
pub(crate) struct Sensitivity {
    pub process: ProcessIdx,
    pub signal: SignalIdx,
    pub edge: Edge,
    pub prev: Option<SensitivityIdx>,
    pub next: Option<SensitivityIdx>,
}

/// Storage for sensitivity bindings.
///
/// Bindings are created right before a process suspends on a wait and
/// destroyed right after it resumes, so slots churn constantly; vacated
/// slots are recycled through a free list rather than growing the arena
/// forever.
#[derive(Debug, Default)]
pub(crate) struct SensitivityArena {
    slots: IndexedMap<SensitivityIdx, Option<Sensitivity>>,
    free: Vec<SensitivityIdx>,
}

impl SensitivityArena {
    pub fn new() -> Self {
        Self {
            slots: IndexedMap::new(),
            free: Vec::new(),
        }
    }

    pub fn get(&self, idx: SensitivityIdx) -> &Sensitivity {
        self.slots[idx]
            .as_ref()
            .expect("sensitivity slot is vacant")
    }

    /// Bind `process` to `signal`, inserting the binding at the head of
    /// the signal's watcher set.
    pub fn bind(
        &mut self,
        signals: &mut IndexedMap<SignalIdx, Signal>,
        process: ProcessIdx,
        signal: SignalIdx,
        edge: Edge,
    ) -> SensitivityIdx {
        let next = signals[signal].watchers;
        let binding = Sensitivity {
            process,
            signal,
            edge,
            prev: None,
            next,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(binding);
                idx
            }
            None => self.slots.push(Some(binding)),
        };

        if let Some(next) = next {
            self.slots[next]
                .as_mut()
                .expect("sensitivity slot is vacant")
                .prev = Some(idx);
        }
        signals[signal].watchers = Some(idx);
        idx
    }

    /// Remove a binding, patching the watcher set around it. Correct for
    /// any position in the set, including the head.
    pub fn release(
        &mut self,
        signals: &mut IndexedMap<SignalIdx, Signal>,
        idx: SensitivityIdx,
    ) {
        let binding = self.slots[idx]
            .take()
            .expect("sensitivity slot is vacant");

        if let Some(next) = binding.next {
            self.slots[next]
                .as_mut()
                .expect("sensitivity slot is vacant")
                .prev = binding.prev;
        }
        match binding.prev {
            Some(prev) => {
                self.slots[prev]
                    .as_mut()
                    .expect("sensitivity slot is vacant")
                    .next = binding.next;
            }
            None => {
                debug_assert_eq!(signals[binding.signal].watchers, Some(idx));
                signals[binding.signal].watchers = binding.next;
            }
        }

        self.free.push(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sepal_idx::IndexRef;

    fn setup() -> (IndexedMap<SignalIdx, Signal>, SignalIdx) {
        let mut signals = IndexedMap::new();
        let sig = signals.push(Signal::new("s".into(), 0));
        (signals, sig)
    }

    fn watcher_processes(
        arena: &SensitivityArena,
        signals: &IndexedMap<SignalIdx, Signal>,
        sig: SignalIdx,
    ) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cursor = signals[sig].watchers;
        while let Some(idx) = cursor {
            let binding = arena.get(idx);
            out.push(binding.process.index());
            cursor = binding.next;
        }
        out
    }

    #[test]
    fn bind_prepends_to_watcher_set() {
        let (mut signals, sig) = setup();
        let mut arena = SensitivityArena::new();

        for i in 0..3_usize {
            arena.bind(&mut signals, ProcessIdx::from(i), sig, Edge::Any);
        }

        assert_eq!(watcher_processes(&arena, &signals, sig), vec![2, 1, 0]);
    }

    #[test]
    fn release_patches_head_middle_and_tail() {
        let (mut signals, sig) = setup();
        let mut arena = SensitivityArena::new();

        let bindings: Vec<SensitivityIdx> = (0..4_usize)
            .map(|i| {
                arena.bind(&mut signals, ProcessIdx::from(i), sig, Edge::Any)
            })
            .collect();
        // watcher order is 3, 2, 1, 0

        arena.release(&mut signals, bindings[2]); // middle
        assert_eq!(watcher_processes(&arena, &signals, sig), vec![3, 1, 0]);

        arena.release(&mut signals, bindings[3]); // head
        assert_eq!(watcher_processes(&arena, &signals, sig), vec![1, 0]);

        arena.release(&mut signals, bindings[0]); // tail
        assert_eq!(watcher_processes(&arena, &signals, sig), vec![1]);

        arena.release(&mut signals, bindings[1]);
        assert!(signals[sig].watchers.is_none());
    }

    #[test]
    fn vacated_slots_are_reused() {
        let (mut signals, sig) = setup();
        let mut arena = SensitivityArena::new();

        let first =
            arena.bind(&mut signals, ProcessIdx::from(0_usize), sig, Edge::Any);
        arena.release(&mut signals, first);
        let second =
            arena.bind(&mut signals, ProcessIdx::from(1_usize), sig, Edge::Any);

        assert_eq!(first, second);
        assert_eq!(arena.slots.len(), 1);
    }

    #[test]
    fn edge_filters() {
        assert!(Edge::Rising.matches(0, 1));
        assert!(!Edge::Rising.matches(1, 1));
        assert!(!Edge::Rising.matches(1, 0));
        assert!(Edge::Falling.matches(1, 0));
        assert!(!Edge::Falling.matches(0, 1));
        assert!(Edge::Both.matches(0, 5));
        assert!(Edge::Both.matches(5, 0));
        assert!(!Edge::Both.matches(2, 3));
        assert!(Edge::Any.matches(7, 7));
    }
}
