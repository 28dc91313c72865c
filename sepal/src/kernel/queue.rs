use sepal_idx::IndexedMap;

use super::{indexes::ProcessIdx, process::Process};

/// The delay-ordered activation list.
///
/// A singly linked list threaded through the process arena, ordered by
/// absolute wake time but storing each node's delay *relative to the node
/// before it*. Only the head's delay is "ticks from now"; summing deltas
/// along a prefix yields the absolute offset. Insertion therefore never
/// has to re-normalize the rest of the list.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    head: Option<ProcessIdx>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { head: None }
    }

    pub fn head(&self) -> Option<ProcessIdx> {
        self.head
    }

    /// Schedule `idx` to activate `ticks` from now.
    ///
    /// Walks the list consuming slices of the requested delay: a node
    /// whose relative delay exceeds what remains is displaced (its delay
    /// now measured from the inserted node); zero-delay nodes contribute
    /// nothing and are passed over. If the walk exhausts the list the
    /// process is appended with whatever delay remains.
    pub fn insert_delayed(
        &mut self,
        processes: &mut IndexedMap<ProcessIdx, Process>,
        idx: ProcessIdx,
        mut ticks: u64,
    ) {
        debug_assert!(!processes[idx].queued, "process is already queued");

        let mut prev: Option<ProcessIdx> = None;
        let mut cursor = self.head;
        while let Some(node) = cursor {
            let delta = processes[node].delay;
            if delta > ticks {
                processes[node].delay = delta - ticks;
                break;
            }
            ticks -= delta;
            prev = Some(node);
            cursor = processes[node].link;
        }

        processes[idx].delay = ticks;
        processes[idx].link = cursor;
        processes[idx].queued = true;
        match prev {
            Some(node) => processes[node].link = Some(idx),
            None => self.head = Some(idx),
        }
    }

    /// Push a process that is due *now* directly onto the head.
    ///
    /// Used for signal wakeups and initial activation. A relative delay
    /// of zero changes no other node's encoded offset, so this bypasses
    /// the insertion walk entirely.
    pub fn push_front(
        &mut self,
        processes: &mut IndexedMap<ProcessIdx, Process>,
        idx: ProcessIdx,
    ) {
        debug_assert!(!processes[idx].queued, "process is already queued");

        processes[idx].delay = 0;
        processes[idx].link = self.head;
        processes[idx].queued = true;
        self.head = Some(idx);
    }

    /// Pop the next-due process, clearing its membership link. The
    /// popped process's relative delay is the amount of logical time
    /// that must pass before it runs.
    pub fn pop(
        &mut self,
        processes: &mut IndexedMap<ProcessIdx, Process>,
    ) -> Option<ProcessIdx> {
        let head = self.head?;
        self.head = processes[head].link.take();
        processes[head].queued = false;
        Some(head)
    }

    /// Drop every queued process, unlinking each. Afterwards the queue
    /// and all membership flags are as if nothing had ever been
    /// scheduled.
    pub fn clear(&mut self, processes: &mut IndexedMap<ProcessIdx, Process>) {
        while self.pop(processes).is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sepal_idx::IndexRef;

    fn arena(count: usize) -> IndexedMap<ProcessIdx, Process> {
        let mut map = IndexedMap::new();
        for i in 0..count {
            map.push(Process::new(format!("p{i}")));
        }
        map
    }

    /// Drain the queue, returning (index, relative delay) pairs.
    fn drain(
        queue: &mut EventQueue,
        procs: &mut IndexedMap<ProcessIdx, Process>,
    ) -> Vec<(usize, u64)> {
        let mut out = Vec::new();
        while let Some(idx) = queue.pop(procs) {
            out.push((idx.index(), procs[idx].delay));
        }
        out
    }

    #[test]
    fn delta_encoding_orders_by_absolute_time() {
        let mut procs = arena(4);
        let mut queue = EventQueue::new();
        let keys: Vec<ProcessIdx> = procs.range().into_iter().collect();

        queue.insert_delayed(&mut procs, keys[0], 10);
        queue.insert_delayed(&mut procs, keys[1], 3);
        queue.insert_delayed(&mut procs, keys[2], 7);
        queue.insert_delayed(&mut procs, keys[3], 12);

        // absolute times 3, 7, 10, 12 -> deltas 3, 4, 3, 2
        assert_eq!(
            drain(&mut queue, &mut procs),
            vec![(1, 3), (2, 4), (0, 3), (3, 2)]
        );
    }

    #[test]
    fn equal_wake_times_keep_insertion_order() {
        let mut procs = arena(3);
        let mut queue = EventQueue::new();
        let keys: Vec<ProcessIdx> = procs.range().into_iter().collect();

        queue.insert_delayed(&mut procs, keys[0], 5);
        queue.insert_delayed(&mut procs, keys[1], 5);
        queue.insert_delayed(&mut procs, keys[2], 5);

        assert_eq!(
            drain(&mut queue, &mut procs),
            vec![(0, 5), (1, 0), (2, 0)]
        );
    }

    #[test]
    fn push_front_preempts_delayed_work() {
        let mut procs = arena(2);
        let mut queue = EventQueue::new();
        let keys: Vec<ProcessIdx> = procs.range().into_iter().collect();

        queue.insert_delayed(&mut procs, keys[0], 4);
        queue.push_front(&mut procs, keys[1]);

        // the pushed process is due immediately; the delayed one still
        // carries its full offset
        assert_eq!(drain(&mut queue, &mut procs), vec![(1, 0), (0, 4)]);
    }

    #[test]
    fn zero_delay_insert_lands_after_due_work() {
        let mut procs = arena(3);
        let mut queue = EventQueue::new();
        let keys: Vec<ProcessIdx> = procs.range().into_iter().collect();

        queue.push_front(&mut procs, keys[0]);
        queue.insert_delayed(&mut procs, keys[1], 6);
        queue.insert_delayed(&mut procs, keys[2], 0);

        assert_eq!(
            drain(&mut queue, &mut procs),
            vec![(0, 0), (2, 0), (1, 6)]
        );
    }

    #[test]
    fn clear_resets_membership() {
        let mut procs = arena(3);
        let mut queue = EventQueue::new();
        let keys: Vec<ProcessIdx> = procs.range().into_iter().collect();

        for key in &keys {
            queue.insert_delayed(&mut procs, *key, 2);
        }
        queue.clear(&mut procs);

        assert!(queue.head().is_none());
        for key in &keys {
            assert!(!procs[*key].queued);
            assert!(procs[*key].link.is_none());
        }
    }

    use proptest::prelude::*;

    proptest! {
        /// Inserting arbitrary delays always drains in non-decreasing
        /// absolute order, ties drain in insertion order, and the delta
        /// encoding reconstructs every requested delay exactly.
        #[test]
        fn insertion_preserves_absolute_order(
            delays in prop::collection::vec(0_u64..1000, 1..60)
        ) {
            let mut procs = arena(delays.len());
            let mut queue = EventQueue::new();
            let keys: Vec<ProcessIdx> = procs.range().into_iter().collect();

            for (key, delay) in keys.iter().zip(delays.iter()) {
                queue.insert_delayed(&mut procs, *key, *delay);
            }

            let drained = drain(&mut queue, &mut procs);
            prop_assert_eq!(drained.len(), delays.len());

            let mut elapsed = 0;
            let mut last: Option<(u64, usize)> = None;
            for (slot, delta) in drained {
                elapsed += delta;
                prop_assert_eq!(elapsed, delays[slot]);
                if let Some((prev_time, prev_slot)) = last {
                    prop_assert!(elapsed >= prev_time);
                    if elapsed == prev_time {
                        // same-time entries keep insertion order
                        prop_assert!(slot > prev_slot);
                    }
                }
                last = Some((elapsed, slot));
            }
        }
    }
}
