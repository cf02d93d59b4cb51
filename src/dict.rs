// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sorted doubly linked list used as the sweep-line edge dictionary.
//
// The ordering is supplied on each call rather than stored, because the sweep
// compares regions relative to the current event and that changes as the sweep
// advances. Callers are responsible for keeping neighbours ordered after the
// event moves. The head sentinel has no key and sorts after every real key.

use crate::arena::Arena;
use crate::mesh::NIL;

pub type NodeId = u32;

/// Id of the head sentinel.
pub const DICT_HEAD: NodeId = 0;

#[derive(Clone, Debug)]
struct DictNode<K> {
    key: Option<K>,
    next: NodeId,
    prev: NodeId,
}

impl<K> Default for DictNode<K> {
    fn default() -> Self {
        DictNode {
            key: None,
            next: NIL,
            prev: NIL,
        }
    }
}

pub struct Dict<K> {
    nodes: Arena<DictNode<K>>,
}

impl<K: Copy> Dict<K> {
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let head = nodes.alloc(DictNode {
            key: None,
            next: DICT_HEAD,
            prev: DICT_HEAD,
        });
        debug_assert_eq!(head, DICT_HEAD);
        Dict { nodes }
    }

    /// Inserts `key` in order, scanning backward from the largest key.
    pub fn insert<F>(&mut self, key: K, leq: F) -> NodeId
    where
        F: FnMut(K, K) -> bool,
    {
        self.insert_before(DICT_HEAD, key, leq)
    }

    /// Inserts `key` somewhere before `node`: the scan moves backward from
    /// `node` while the predecessor's key does not precede `key`.
    pub fn insert_before<F>(&mut self, mut node: NodeId, key: K, mut leq: F) -> NodeId
    where
        F: FnMut(K, K) -> bool,
    {
        loop {
            node = self.nodes[node].prev;
            match self.nodes[node].key {
                None => break,
                Some(k) if leq(k, key) => break,
                Some(_) => {}
            }
        }

        let next = self.nodes[node].next;
        let new = self.nodes.alloc(DictNode {
            key: Some(key),
            next,
            prev: node,
        });
        self.nodes[node].next = new;
        self.nodes[next].prev = new;
        new
    }

    /// Unlinks `node` in constant time.
    pub fn delete(&mut self, node: NodeId) {
        debug_assert_ne!(node, DICT_HEAD);
        let (prev, next) = (self.nodes[node].prev, self.nodes[node].next);
        self.nodes[next].prev = prev;
        self.nodes[prev].next = next;
        self.nodes.free(node);
    }

    /// First node whose key is not known to precede `key`; the head when every
    /// key precedes it.
    pub fn search<F>(&self, key: K, mut leq: F) -> NodeId
    where
        F: FnMut(K, K) -> bool,
    {
        let mut node = DICT_HEAD;
        loop {
            node = self.nodes[node].next;
            match self.nodes[node].key {
                None => return node,
                Some(k) if leq(key, k) => return node,
                Some(_) => {}
            }
        }
    }

    #[inline]
    pub fn key(&self, node: NodeId) -> Option<K> {
        self.nodes[node].key
    }

    #[inline]
    pub fn min(&self) -> NodeId {
        self.nodes[DICT_HEAD].next
    }

    #[inline]
    pub fn max(&self) -> NodeId {
        self.nodes[DICT_HEAD].prev
    }

    #[inline]
    pub fn succ(&self, node: NodeId) -> NodeId {
        self.nodes[node].next
    }

    #[inline]
    pub fn pred(&self, node: NodeId) -> NodeId {
        self.nodes[node].prev
    }

    pub fn is_empty(&self) -> bool {
        self.min() == DICT_HEAD
    }

    /// Number of keyed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }
}

impl<K: Copy> Default for Dict<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn leq(a: u32, b: u32) -> bool {
        a <= b
    }

    fn keys(d: &Dict<u32>) -> Vec<u32> {
        let mut out = Vec::new();
        let mut n = d.min();
        while n != DICT_HEAD {
            out.extend(d.key(n));
            n = d.succ(n);
        }
        out
    }

    #[test]
    fn empty_dict_points_at_head() {
        let d: Dict<u32> = Dict::new();
        assert_eq!(d.min(), DICT_HEAD);
        assert_eq!(d.max(), DICT_HEAD);
        assert!(d.is_empty());
        assert_eq!(d.key(DICT_HEAD), None);
    }

    #[test]
    fn inserts_keep_order() {
        let mut d = Dict::new();
        for k in [3, 1, 4, 1, 5, 9, 2, 6] {
            d.insert(k, leq);
        }
        assert_eq!(keys(&d), vec![1, 1, 2, 3, 4, 5, 6, 9]);
        assert_eq!(d.len(), 8);
        assert_eq!(d.key(d.max()), Some(9));
    }

    #[test]
    fn delete_unlinks_and_recycles() {
        let mut d = Dict::new();
        d.insert(1, leq);
        let n2 = d.insert(2, leq);
        d.insert(3, leq);
        d.delete(n2);
        assert_eq!(keys(&d), vec![1, 3]);
        let again = d.insert(2, leq);
        assert_eq!(again, n2);
        assert_eq!(keys(&d), vec![1, 2, 3]);
    }

    #[test]
    fn search_returns_first_not_preceding() {
        let mut d = Dict::new();
        for k in [1, 3, 5] {
            d.insert(k, leq);
        }
        assert_eq!(d.key(d.search(2, leq)), Some(3));
        assert_eq!(d.key(d.search(3, leq)), Some(3));
        assert_eq!(d.search(6, leq), DICT_HEAD);
    }

    #[test]
    fn insert_before_scans_backward_from_node() {
        let mut d = Dict::new();
        let n10 = d.insert(10, leq);
        d.insert(20, leq);
        let n = d.insert_before(n10, 5, leq);
        assert_eq!(d.succ(n), n10);
        assert_eq!(keys(&d), vec![5, 10, 20]);
    }

    #[test]
    fn comparator_sees_external_state() {
        // Reverse the ordering halfway through, as a moving sweep line would.
        let flipped = Cell::new(false);
        let cmp = |a: u32, b: u32| if flipped.get() { a >= b } else { a <= b };
        let mut d = Dict::new();
        d.insert(1, cmp);
        d.insert(2, cmp);
        flipped.set(true);
        let n = d.insert(0, cmp);
        assert_eq!(d.max(), n);
    }
}
