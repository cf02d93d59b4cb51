// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Index-addressed storage with slot recycling.
//
// The mesh, the edge dictionary and the sweep regions all form cyclic graphs
// that are relinked constantly, so records live in flat vectors and refer to
// each other by u32 id. Freed slots are reset to their default value and handed
// out again by the next allocation.

use std::ops::{Index, IndexMut};

#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<T>,
    live: Vec<bool>,
    free_list: Vec<u32>,
}

impl<T: Default> Arena<T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Store `value`, reusing a freed slot when one is available.
    pub fn alloc(&mut self, value: T) -> u32 {
        if let Some(id) = self.free_list.pop() {
            self.slots[id as usize] = value;
            self.live[id as usize] = true;
            id
        } else {
            let id = self.slots.len() as u32;
            self.slots.push(value);
            self.live.push(true);
            id
        }
    }

    /// Release a slot. Freeing a dead or out-of-range id does nothing.
    pub fn free(&mut self, id: u32) {
        if self.contains(id) {
            self.slots[id as usize] = T::default();
            self.live[id as usize] = false;
            self.free_list.push(id);
        }
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.live.get(id as usize).copied().unwrap_or(false)
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        if self.contains(id) {
            self.slots.get(id as usize)
        } else {
            None
        }
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Default> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u32> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: u32) -> &T {
        &self.slots[id as usize]
    }
}

impl<T> IndexMut<u32> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: u32) -> &mut T {
        &mut self.slots[id as usize]
    }
}
