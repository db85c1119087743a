//! Slot arena owning every node of a tree.
//!
//! Slots are never reused: releasing a value leaves a tombstone so a stale
//! index reads as missing instead of aliasing a newer value.

/// Arena of `T` addressed by dense `usize` slots.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a new value in the arena and return its slot.
    pub fn alloc(&mut self, value: T) -> usize {
        let index = self.slots.len();
        self.slots.push(Some(value));
        self.live += 1;
        index
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Take the value out of its slot, leaving a tombstone.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index).and_then(Option::take);
        if value.is_some() {
            self.live -= 1;
        }
        value
    }

    /// Iterate over live values together with their slots.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever allocated, released ones included.
    pub fn capacity_used(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_slots_are_not_reused() {
        let mut arena = Arena::new();
        let first = arena.alloc("a");
        assert_eq!(arena.remove(first), Some("a"));
        let second = arena.alloc("b");

        assert_ne!(first, second);
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&"b"));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.capacity_used(), 2);
    }

    #[test]
    fn removing_twice_is_a_no_op() {
        let mut arena = Arena::new();
        let slot = arena.alloc(7);
        assert_eq!(arena.remove(slot), Some(7));
        assert_eq!(arena.remove(slot), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn iteration_skips_released_slots() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let c = arena.alloc('c');
        arena.remove(b);

        let live: Vec<_> = arena.iter().collect();
        assert_eq!(live, vec![(a, &'a'), (c, &'c')]);
    }
}
