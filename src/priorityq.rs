// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Binary min-heap with stable handles.
//
// `nodes[1..=size]` is the heap proper and holds handles, not keys. Each handle
// slot stores the key and the heap position currently holding it, so an entry
// can be removed by handle without searching. Released handles are chained into
// a free list through their position field; handle 0 is never issued and ends
// the chain.
//
// Keys inserted before `init` are only appended; `init` then heapifies the
// whole array bottom-up in linear time.

pub type PqHandle = u32;

/// Handle value meaning "not in the queue".
pub const INVALID_HANDLE: PqHandle = u32::MAX;

#[derive(Clone, Debug)]
struct HandleSlot<K> {
    key: Option<K>,
    // Heap position while live; next free handle while free.
    node: u32,
}

pub struct PriorityQ<K> {
    nodes: Vec<PqHandle>,
    handles: Vec<HandleSlot<K>>,
    size: usize,
    free_list: PqHandle,
    initialized: bool,
    leq: fn(K, K) -> bool,
}

impl<K: Copy> PriorityQ<K> {
    /// Empty queue ordered by `leq`, with room for `capacity` keys before it grows.
    pub fn new(capacity: usize, leq: fn(K, K) -> bool) -> Self {
        let slots = capacity.max(1) + 1;
        PriorityQ {
            nodes: vec![0; slots],
            handles: (0..slots).map(|_| HandleSlot { key: None, node: 0 }).collect(),
            size: 0,
            free_list: 0,
            initialized: false,
            leq,
        }
    }

    #[inline]
    fn handle_leq(&self, a: PqHandle, b: PqHandle) -> bool {
        match (self.handles[a as usize].key, self.handles[b as usize].key) {
            (Some(x), Some(y)) => (self.leq)(x, y),
            (None, _) => false,
            (Some(_), None) => true,
        }
    }

    #[inline]
    fn place(&mut self, pos: usize, h: PqHandle) {
        self.nodes[pos] = h;
        self.handles[h as usize].node = pos as u32;
    }

    fn float_down(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child > self.size {
                break;
            }
            if child < self.size && self.handle_leq(self.nodes[child + 1], self.nodes[child]) {
                child += 1;
            }
            let h_child = self.nodes[child];
            if self.handle_leq(h_curr, h_child) {
                break;
            }
            self.place(curr, h_child);
            curr = child;
        }
        self.place(curr, h_curr);
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 || self.handle_leq(self.nodes[parent], h_curr) {
                break;
            }
            let h_parent = self.nodes[parent];
            self.place(curr, h_parent);
            curr = parent;
        }
        self.place(curr, h_curr);
    }

    /// Heapifies everything inserted so far. Later inserts keep heap order.
    pub fn init(&mut self) {
        for i in (1..=self.size).rev() {
            self.float_down(i);
        }
        self.initialized = true;
    }

    pub fn insert(&mut self, key: K) -> PqHandle {
        self.size += 1;
        let curr = self.size;
        if curr >= self.nodes.len() {
            let grown = self.nodes.len() * 2;
            self.nodes.resize(grown, 0);
            self.handles.resize_with(grown, || HandleSlot { key: None, node: 0 });
        }

        let h = if self.free_list == 0 {
            curr as PqHandle
        } else {
            let h = self.free_list;
            self.free_list = self.handles[h as usize].node;
            h
        };
        self.handles[h as usize].key = Some(key);
        self.place(curr, h);

        if self.initialized {
            self.float_up(curr);
        }
        h
    }

    fn release(&mut self, h: PqHandle) {
        let slot = &mut self.handles[h as usize];
        slot.key = None;
        slot.node = self.free_list;
        self.free_list = h;
    }

    /// Removes and returns the smallest key.
    pub fn extract_min(&mut self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        let h_min = self.nodes[1];
        let min = self.handles[h_min as usize].key;

        let last = self.nodes[self.size];
        self.place(1, last);
        self.release(h_min);
        self.size -= 1;
        if self.size > 0 {
            self.float_down(1);
        }
        min
    }

    pub fn minimum(&self) -> Option<K> {
        if self.size == 0 {
            return None;
        }
        self.handles[self.nodes[1] as usize].key
    }

    /// Removes the entry for `h`. Unknown or already released handles are ignored.
    pub fn delete(&mut self, h: PqHandle) {
        if !self.contains(h) {
            return;
        }
        let curr = self.handles[h as usize].node as usize;
        let last = self.nodes[self.size];
        self.place(curr, last);
        self.size -= 1;

        if curr <= self.size && self.initialized {
            if curr <= 1 || self.handle_leq(self.nodes[curr >> 1], self.nodes[curr]) {
                self.float_down(curr);
            } else {
                self.float_up(curr);
            }
        }
        self.release(h);
    }

    pub fn contains(&self, h: PqHandle) -> bool {
        self.handles
            .get(h as usize)
            .map_or(false, |slot| h != 0 && slot.key.is_some())
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
