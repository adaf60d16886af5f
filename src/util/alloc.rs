#![cfg(test)]

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZeroSizedType;

/// An element that bumps a shared counter when dropped, for checking exactly which elements a
/// Collection disposes of and when.
#[derive(Debug, Clone)]
pub struct CountedDrop {
    pub id: usize,
    pub drops: Rc<Cell<usize>>,
}

impl CountedDrop {
    /// Creates `count` elements with ids `0..count`, all sharing one counter.
    pub fn batch(count: usize) -> (Rc<Cell<usize>>, impl Iterator<Item = CountedDrop>) {
        let drops = Rc::new(Cell::new(0));
        let shared = Rc::clone(&drops);
        (drops, (0..count).map(move |id| CountedDrop { id, drops: Rc::clone(&shared) }))
    }
}

impl PartialEq for CountedDrop {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
