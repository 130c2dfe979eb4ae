//! Index-addressed node store.
//!
//! Nodes live in a `Vec` of slots and refer to each other by `u32` slot
//! index. Releasing a node vacates its slot, bumps the slot generation and
//! queues the index for reuse, so the next allocation fills the hole
//! instead of growing the vector.

use std::ops::{Index, IndexMut};

use crate::error::TreeMapError;

/// Index the next pushed slot gets, or `None` once `len` slots exhaust the
/// `u32` index space.
fn next_index(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

#[derive(Clone, Debug)]
struct Slot<N> {
    generation: u32,
    node: Option<N>,
}

#[derive(Clone, Debug)]
pub struct Arena<N> {
    slots: Vec<Slot<N>>,
    free: Vec<u32>,
    live: usize,
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Stores `node`, reusing a vacant slot when one is queued.
    ///
    /// # Panics
    ///
    /// When all `u32` slot indices are in use.
    pub fn alloc(&mut self, node: N) -> u32 {
        if let Some(idx) = self.free.pop() {
            return self.fill(idx, node);
        }
        match next_index(self.slots.len()) {
            Some(idx) => self.push(idx, node),
            None => panic!("arena full at {} slots", self.slots.len()),
        }
    }

    /// Like [`alloc`](Self::alloc), but reports allocation failure and index
    /// exhaustion instead of aborting. Nothing is stored when an error is
    /// returned.
    pub fn try_alloc(&mut self, node: N) -> Result<u32, TreeMapError> {
        if let Some(idx) = self.free.pop() {
            return Ok(self.fill(idx, node));
        }
        let idx = next_index(self.slots.len()).ok_or(TreeMapError::Full {
            slots: self.slots.len(),
        })?;
        self.slots.try_reserve(1)?;
        Ok(self.push(idx, node))
    }

    fn fill(&mut self, idx: u32, node: N) -> u32 {
        tracing::trace!(slot = idx, "reusing vacant arena slot");
        let slot = &mut self.slots[idx as usize];
        debug_assert!(slot.node.is_none());
        slot.node = Some(node);
        self.live += 1;
        idx
    }

    fn push(&mut self, idx: u32, node: N) -> u32 {
        debug_assert_eq!(idx as usize, self.slots.len());
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.live += 1;
        idx
    }

    /// Vacates slot `idx` and returns the node that was stored there.
    ///
    /// Returns `None` if the slot is already vacant.
    pub fn release(&mut self, idx: u32) -> Option<N> {
        let slot = self.slots.get_mut(idx as usize)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx);
        self.live -= 1;
        Some(node)
    }

    pub fn get(&self, idx: u32) -> Option<&N> {
        self.slots.get(idx as usize)?.node.as_ref()
    }

    pub fn get_mut(&mut self, idx: u32) -> Option<&mut N> {
        self.slots.get_mut(idx as usize)?.node.as_mut()
    }

    /// Current generation of slot `idx`, if the index is in range.
    pub fn generation(&self, idx: u32) -> Option<u32> {
        self.slots.get(idx as usize).map(|s| s.generation)
    }

    /// Whether slot `idx` is occupied and still at `generation`.
    pub fn is_live(&self, idx: u32, generation: u32) -> bool {
        self.slots
            .get(idx as usize)
            .is_some_and(|s| s.generation == generation && s.node.is_some())
    }

    /// Mutable access to two distinct occupied slots at once.
    pub fn pair_mut(&mut self, a: u32, b: u32) -> Option<(&mut N, &mut N)> {
        if a == b {
            return None;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi as usize);
        let lo_node = head.get_mut(lo as usize)?.node.as_mut()?;
        let hi_node = tail.first_mut()?.node.as_mut()?;
        if a < b {
            Some((lo_node, hi_node))
        } else {
            Some((hi_node, lo_node))
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots, occupied or vacant.
    pub fn capacity_used(&self) -> usize {
        self.slots.len()
    }

    /// Vacates every slot. Generations survive, so cursors taken before
    /// the clear stay stale after the slots are refilled.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev().filter_map(next_index));
        self.live = 0;
    }
}

impl<N> Index<u32> for Arena<N> {
    type Output = N;

    fn index(&self, idx: u32) -> &N {
        match self.get(idx) {
            Some(node) => node,
            None => panic!("arena slot {idx} is vacant"),
        }
    }
}

impl<N> IndexMut<u32> for Arena<N> {
    fn index_mut(&mut self, idx: u32) -> &mut N {
        match self.get_mut(idx) {
            Some(node) => node,
            None => panic!("arena slot {idx} is vacant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{next_index, Arena};

    #[test]
    fn release_bumps_generation_and_reuses_slot() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!((a, b), (0, 1));
        assert_eq!(arena.generation(a), Some(0));

        assert_eq!(arena.release(a), Some("a"));
        assert_eq!(arena.release(a), None);
        assert_eq!(arena.generation(a), Some(1));
        assert!(!arena.is_live(a, 0));
        assert_eq!(arena.len(), 1);

        let c = arena.alloc("c");
        assert_eq!(c, a);
        assert!(arena.is_live(c, 1));
        assert!(!arena.is_live(c, 0));
        assert_eq!(arena[c], "c");
        assert_eq!(arena.capacity_used(), 2);
    }

    #[test]
    fn try_alloc_fills_holes_before_growing() {
        let mut arena = Arena::with_capacity(4);
        let a = arena.try_alloc(1).unwrap();
        let _b = arena.try_alloc(2).unwrap();
        arena.release(a);
        assert_eq!(arena.try_alloc(3).unwrap(), a);
        assert_eq!(arena.try_alloc(4).unwrap(), 2);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn slot_index_space_ends_at_u32_max() {
        assert_eq!(next_index(0), Some(0));
        assert_eq!(next_index(u32::MAX as usize), Some(u32::MAX));
        assert_eq!(next_index(u32::MAX as usize + 1), None);
    }

    #[test]
    fn pair_mut_returns_nodes_in_argument_order() {
        let mut arena = Arena::new();
        let a = arena.alloc(10);
        let b = arena.alloc(20);
        {
            let (x, y) = arena.pair_mut(b, a).unwrap();
            assert_eq!((*x, *y), (20, 10));
            std::mem::swap(x, y);
        }
        assert_eq!(arena[a], 20);
        assert_eq!(arena[b], 10);
        assert!(arena.pair_mut(a, a).is_none());
        arena.release(b);
        assert!(arena.pair_mut(a, b).is_none());
    }

    #[test]
    #[should_panic(expected = "vacant")]
    fn indexing_a_vacant_slot_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(());
        arena.release(a);
        let _node = &arena[a];
    }

    #[test]
    fn clear_vacates_every_slot_and_keeps_generations() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        arena.alloc(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.capacity_used(), 2);

        assert_eq!(arena.alloc(3), 0);
        assert_eq!(arena.alloc(4), 1);
        assert!(!arena.is_live(a, 0));
        assert!(arena.is_live(a, 1));
    }
}
