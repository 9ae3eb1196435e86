//! Unbalanced binary-search-tree helpers over the `p` / `l` / `r` links.
//!
//! Key-based helpers (`find`, `find_or_next_lower`) take a `key_of` accessor
//! closure so they work on any arena-backed node layout.

pub mod swap;

use crate::types::Node;

pub use swap::swap_entries;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Points whichever child link of `p` currently holds `old` at `new`.
#[inline]
pub(crate) fn replace_child<N: Node>(arena: &mut [N], p: u32, old: u32, new: Option<u32>) {
    if get_l(arena, p) == Some(old) {
        set_l(arena, p, new);
    } else {
        set_r(arena, p, new);
    }
}

/// Leftmost node (minimum key).
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node (maximum key).
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, curr) {
        return last(arena, Some(l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Height in nodes; an empty tree has height 0, a single leaf height 1.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    match root {
        None => 0,
        Some(i) => 1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i))),
    }
}

fn checked_height<N: Node>(arena: &[N], root: Option<u32>) -> Option<usize> {
    let Some(i) = root else {
        return Some(0);
    };
    let lh = checked_height(arena, get_l(arena, i))?;
    let rh = checked_height(arena, get_r(arena, i))?;
    if lh.abs_diff(rh) > 1 {
        return None;
    }
    Some(1 + lh.max(rh))
}

/// Height-balance check from actual subtree heights; ignores any stored
/// balance factors.
pub fn is_balanced<N: Node>(arena: &[N], root: Option<u32>) -> bool {
    checked_height(arena, root).is_some()
}

fn leaf_depths_match<N: Node>(
    arena: &[N],
    node: Option<u32>,
    depth: usize,
    leaf_depth: &mut Option<usize>,
) -> bool {
    let Some(i) = node else {
        return true;
    };
    let (l, r) = (get_l(arena, i), get_r(arena, i));
    if l.is_none() && r.is_none() {
        return *leaf_depth.get_or_insert(depth) == depth;
    }
    leaf_depths_match(arena, l, depth + 1, leaf_depth)
        && leaf_depths_match(arena, r, depth + 1, leaf_depth)
}

/// Whether every root-to-leaf path has the same length. An empty tree
/// trivially does.
pub fn equal_paths<N: Node>(arena: &[N], root: Option<u32>) -> bool {
    let mut leaf_depth = None;
    leaf_depths_match(arena, root, 0, &mut leaf_depth)
}

/// Finds a node by key.
pub fn find<N, K, F, C>(
    arena: &[N],
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    K: ?Sized,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, key_of(&arena[i as usize]));
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 {
            get_l(arena, i)
        } else {
            get_r(arena, i)
        };
    }
    None
}

/// Finds node by key, or the next lower node if the exact key does not exist.
pub fn find_or_next_lower<N, K, F, C>(
    arena: &[N],
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    K: ?Sized,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    let mut result: Option<u32> = None;
    while let Some(i) = curr {
        let cmp = comparator(key_of(&arena[i as usize]), key);
        if cmp == 0 {
            return Some(i);
        }
        if cmp > 0 {
            curr = get_l(arena, i);
        } else {
            result = Some(i);
            curr = get_r(arena, i);
        }
    }
    result
}
