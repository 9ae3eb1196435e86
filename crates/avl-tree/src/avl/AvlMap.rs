use std::fmt;
use std::mem;

use log::trace;

use super::types::AvlNode;
use super::util as avl_util;
use crate::error::AvlError;
use crate::types::KvNode;
use crate::util::{self, find, find_or_next_lower, first, last, next, prev};

fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Ordered key-value map backed by an arena-allocated AVL tree.
///
/// Nodes never move between slots and vacated slots are reused by later
/// inserts. The one entry that can change slot is the in-order predecessor
/// of a removed key with two children: it takes over the removed key's slot.
pub struct AvlMap<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: Vec<Option<AvlNode<K, V>>>,
    free: Vec<u32>,
    root: Option<u32>,
    comparator: C,
    len: usize,
}

impl<K, V> AvlMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K, V> Default for AvlMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            root: None,
            comparator,
            len: 0,
        }
    }

    fn node(&self, idx: u32) -> &AvlNode<K, V> {
        self.arena[idx as usize]
            .as_ref()
            .expect("slot index refers to a removed node")
    }

    fn node_mut(&mut self, idx: u32) -> &mut AvlNode<K, V> {
        self.arena[idx as usize]
            .as_mut()
            .expect("slot index refers to a removed node")
    }

    fn push(&mut self, key: K, value: V) -> u32 {
        self.len += 1;
        let node = Some(AvlNode::new(key, value));
        if let Some(idx) = self.free.pop() {
            self.arena[idx as usize] = node;
            return idx;
        }
        let idx = u32::try_from(self.arena.len()).expect("arena exceeds u32 slot space");
        self.arena.push(node);
        idx
    }

    /// Inserts `key`, or overwrites the value of an existing equal key in
    /// place. Returns the previous value on overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            let idx = self.push(key, value);
            self.root = Some(idx);
            return None;
        };

        let mut curr = root;
        loop {
            let cmp = (self.comparator)(&key, &self.node(curr).k);
            if cmp == 0 {
                trace!("insert: overwriting value at {curr}");
                return Some(mem::replace(&mut self.node_mut(curr).v, value));
            }
            let child = if cmp < 0 {
                self.node(curr).l
            } else {
                self.node(curr).r
            };
            match child {
                Some(child) => curr = child,
                None => {
                    let idx = self.push(key, value);
                    let root = if cmp < 0 {
                        avl_util::insert_left(&mut self.arena, root, idx, curr)
                    } else {
                        avl_util::insert_right(&mut self.arena, root, idx, curr)
                    };
                    self.root = Some(root);
                    return None;
                }
            }
        }
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let node = self.find_index(key)?;
        let root = self.root?;
        let (root, slot) = avl_util::remove(&mut self.arena, root, node);
        self.root = root;
        self.len -= 1;
        self.free.push(slot);
        let (_, value) = self.arena[slot as usize]
            .take()
            .expect("detached slot holds the removed node")
            .into_entry();
        Some(value)
    }

    pub fn find_index(&self, key: &K) -> Option<u32> {
        find(&self.arena, self.root, key, |n| n.key(), &self.comparator)
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        self.find_index(key).map(|i| &self.node(i).v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_index(key)?;
        Some(&mut self.node_mut(idx).v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Indexed access. Unlike [`AvlMap::find`], a miss is an error.
    pub fn at(&self, key: &K) -> Result<&V, AvlError> {
        self.find(key).ok_or(AvlError::KeyNotFound)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, AvlError> {
        self.get_mut(key).ok_or(AvlError::KeyNotFound)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn height(&self) -> usize {
        util::height(&self.arena, self.root)
    }

    pub fn is_balanced(&self) -> bool {
        util::is_balanced(&self.arena, self.root)
    }

    pub fn equal_paths(&self) -> bool {
        util::equal_paths(&self.arena, self.root)
    }

    fn entry(&self, idx: u32) -> (&K, &V) {
        let n = self.node(idx);
        (&n.k, &n.v)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.first().map(|i| self.entry(i))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last().map(|i| self.entry(i))
    }

    /// Entry immediately before `key`, which must be present.
    pub fn predecessor(&self, key: &K) -> Option<(&K, &V)> {
        let idx = self.find_index(key)?;
        prev(&self.arena, idx).map(|i| self.entry(i))
    }

    /// Entry immediately after `key`, which must be present.
    pub fn successor(&self, key: &K) -> Option<(&K, &V)> {
        let idx = self.find_index(key)?;
        next(&self.arena, idx).map(|i| self.entry(i))
    }

    /// Entry for `key`, or for the greatest key below it.
    pub fn get_or_next_lower(&self, key: &K) -> Option<(&K, &V)> {
        find_or_next_lower(&self.arena, self.root, key, |n| n.key(), &self.comparator)
            .map(|i| self.entry(i))
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    pub fn first(&self) -> Option<u32> {
        first(&self.arena, self.root)
    }

    pub fn last(&self) -> Option<u32> {
        last(&self.arena, self.root)
    }

    pub fn next(&self, curr: u32) -> Option<u32> {
        next(&self.arena, curr)
    }

    pub fn prev(&self, curr: u32) -> Option<u32> {
        prev(&self.arena, curr)
    }

    pub fn key(&self, idx: u32) -> &K {
        &self.node(idx).k
    }

    pub fn value(&self, idx: u32) -> &V {
        &self.node(idx).v
    }

    pub fn value_mut_by_index(&mut self, idx: u32) -> &mut V {
        &mut self.node_mut(idx).v
    }

    pub fn balance(&self, idx: u32) -> i8 {
        self.node(idx).bf
    }

    pub fn left(&self, idx: u32) -> Option<u32> {
        self.node(idx).l
    }

    pub fn right(&self, idx: u32) -> Option<u32> {
        self.node(idx).r
    }

    pub fn parent(&self, idx: u32) -> Option<u32> {
        self.node(idx).p
    }

    /// Whether `idx` currently holds a node.
    pub fn is_occupied(&self, idx: u32) -> bool {
        self.arena.get(idx as usize).is_some_and(Option::is_some)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            curr: self.first(),
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn assert_valid(&self) -> Result<(), AvlError> {
        let reachable = util::size(&self.arena, self.root);
        let occupied = self.arena.len() - self.free.len();
        if reachable != self.len || occupied != self.len {
            return Err(AvlError::InvariantViolated(format!(
                "{reachable} reachable nodes, {occupied} occupied slots, len {}",
                self.len
            )));
        }
        avl_util::assert_avl_tree(&self.arena, self.root, &self.comparator)
    }

    pub fn print(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        avl_util::print(&self.arena, self.root)
    }
}

/// In-order iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    arena: &'a [Option<AvlNode<K, V>>],
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.curr?;
        self.curr = next(self.arena, i);
        self.remaining -= 1;
        let n = &self.arena[i as usize];
        Some((n.key(), n.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> Extend<(K, V)> for AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AvlMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> fmt::Debug for AvlMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
