use std::fmt::{Debug, Write};

use log::debug;

use super::rotate::{rotate_left, rotate_left_right, rotate_right, rotate_right_left};
use super::types::AvlNodeLike;
use crate::error::AvlError;
use crate::types::KvNode;
use crate::util::{
    first, get_l, get_p, get_r, last, next, replace_child, set_l, set_p, set_r, swap_entries,
};

#[inline]
fn bf<N: AvlNodeLike>(arena: &[N], i: u32) -> i8 {
    arena[i as usize].bf()
}

#[inline]
fn set_bf<N: AvlNodeLike>(arena: &mut [N], i: u32, v: i8) {
    arena[i as usize].set_bf(v);
}

/// Restores balance at `n`, whose balance factor has just reached `±2`.
///
/// Returns the top of the rotated subtree and whether that subtree ended up
/// one level shorter than before the rotation.
fn rotate_heavy<N: AvlNodeLike>(arena: &mut [N], n: u32) -> (u32, bool) {
    if bf(arena, n) > 0 {
        let u = get_l(arena, n).expect("left-heavy node has a left child");
        let ubf = bf(arena, u);
        if ubf >= 0 {
            (rotate_right(arena, n), ubf != 0)
        } else {
            (rotate_left_right(arena, n), true)
        }
    } else {
        let u = get_r(arena, n).expect("right-heavy node has a right child");
        let ubf = bf(arena, u);
        if ubf <= 0 {
            (rotate_left(arena, n), ubf != 0)
        } else {
            (rotate_right_left(arena, n), true)
        }
    }
}

/// Walks up from the freshly attached leaf `n`, adjusting balance factors
/// until a subtree stops growing or one rotation fixes the imbalance.
fn rebalance_after_insert<N: AvlNodeLike>(arena: &mut [N], root: u32, n: u32) -> u32 {
    let mut child = n;
    while let Some(p) = get_p(arena, child) {
        let pbf = if get_l(arena, p) == Some(child) {
            bf(arena, p) + 1
        } else {
            bf(arena, p) - 1
        };
        set_bf(arena, p, pbf);

        match pbf {
            0 => break,
            1 | -1 => child = p,
            _ => {
                // The child that grew is never balanced here.
                let (top, _) = rotate_heavy(arena, p);
                return if get_p(arena, top).is_none() { top } else { root };
            }
        }
    }
    root
}

/// Attaches leaf `n` as the right child of `p` and rebalances.
///
/// Returns the new root.
pub fn insert_right<N: AvlNodeLike>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32 {
    debug_assert!(get_r(arena, p).is_none());
    set_r(arena, p, Some(n));
    set_p(arena, n, Some(p));
    rebalance_after_insert(arena, root, n)
}

/// Attaches leaf `n` as the left child of `p` and rebalances.
///
/// Returns the new root.
pub fn insert_left<N: AvlNodeLike>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32 {
    debug_assert!(get_l(arena, p).is_none());
    set_l(arena, p, Some(n));
    set_p(arena, n, Some(p));
    rebalance_after_insert(arena, root, n)
}

/// Walks from `n`, whose left (`left == true`) or right subtree just lost a
/// level, towards the root. Unlike insert, a rotation here can shorten the
/// subtree, so the walk keeps going until some subtree height is unchanged.
fn rebalance_after_remove<N: AvlNodeLike>(
    arena: &mut [N],
    mut root: u32,
    mut n: u32,
    mut left: bool,
) -> u32 {
    loop {
        let nbf = if left {
            bf(arena, n) - 1
        } else {
            bf(arena, n) + 1
        };
        set_bf(arena, n, nbf);

        let top = match nbf {
            1 | -1 => break,
            0 => n,
            _ => {
                let (top, shrunk) = rotate_heavy(arena, n);
                if get_p(arena, top).is_none() {
                    root = top;
                }
                if !shrunk {
                    break;
                }
                top
            }
        };

        let Some(p) = get_p(arena, top) else {
            break;
        };
        left = get_l(arena, p) == Some(top);
        n = p;
    }
    root
}

/// Removes node `n` from the tree rooted at `root`.
///
/// A node with two children trades its entry with its in-order predecessor,
/// and the predecessor's slot is the one unlinked. Returns the new root and
/// the detached slot, which now holds the entry that was stored at `n`.
pub fn remove<N>(arena: &mut [N], root: u32, mut n: u32) -> (Option<u32>, u32)
where
    N: AvlNodeLike + KvNode,
{
    if let (Some(l), Some(_)) = (get_l(arena, n), get_r(arena, n)) {
        let v = last(arena, Some(l)).expect("left subtree is not empty");
        debug!("remove: two children at {n}, swapping entry with predecessor {v}");
        swap_entries(arena, n, v);
        n = v;
    }

    let p = get_p(arena, n);
    let c = get_l(arena, n).or(get_r(arena, n));
    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);
    set_bf(arena, n, 0);
    if let Some(c) = c {
        set_p(arena, c, p);
    }

    let Some(p) = p else {
        return (c, n);
    };
    let left = get_l(arena, p) == Some(n);
    replace_child(arena, p, n, c);
    (Some(rebalance_after_remove(arena, root, p, left)), n)
}

/// Validates the subtree at `node` and returns its height.
fn checked_height<N: AvlNodeLike>(arena: &[N], node: u32) -> Result<usize, AvlError> {
    let mut heights = [0usize; 2];
    for (h, child) in heights.iter_mut().zip([get_l(arena, node), get_r(arena, node)]) {
        let Some(c) = child else {
            continue;
        };
        if get_p(arena, c) != Some(node) {
            return Err(AvlError::InvariantViolated(format!(
                "child {c} of {node} links back to {:?}",
                get_p(arena, c)
            )));
        }
        *h = checked_height(arena, c)?;
    }

    let [lh, rh] = heights;
    let stored = bf(arena, node);
    if lh as i64 - rh as i64 != i64::from(stored) {
        return Err(AvlError::InvariantViolated(format!(
            "node {node} stores bf {stored} but subtree heights are {lh}/{rh}"
        )));
    }
    if !(-1..=1).contains(&stored) {
        return Err(AvlError::InvariantViolated(format!(
            "node {node} is out of balance (bf {stored})"
        )));
    }
    Ok(1 + lh.max(rh))
}

/// Checks every structural invariant: root has no parent, back-links agree
/// with child links, stored balance factors match true heights and stay in
/// `-1..=1`, and in-order keys are strictly increasing.
pub fn assert_avl_tree<N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), AvlError>
where
    N: AvlNodeLike + KvNode,
    C: Fn(&N::Key, &N::Key) -> i32,
{
    let Some(root) = root else {
        return Ok(());
    };
    if let Some(p) = get_p(arena, root) {
        return Err(AvlError::InvariantViolated(format!(
            "root {root} has parent {p}"
        )));
    }
    checked_height(arena, root)?;

    let mut curr = first(arena, Some(root));
    while let Some(i) = curr {
        curr = next(arena, i);
        if let Some(j) = curr {
            if comparator(arena[i as usize].key(), arena[j as usize].key()) >= 0 {
                return Err(AvlError::InvariantViolated(format!(
                    "keys at {i} and {j} are out of order"
                )));
            }
        }
    }
    Ok(())
}

fn render<N>(arena: &[N], node: u32, label: &str, depth: usize, out: &mut String)
where
    N: AvlNodeLike + KvNode,
    N::Key: Debug,
    N::Value: Debug,
{
    let n = &arena[node as usize];
    let parent = n.p().map_or_else(|| "-".to_string(), |p| p.to_string());
    let _ = writeln!(
        out,
        "{:indent$}{label}#{node} {:?} => {:?} (bf {:+}, p {parent})",
        "",
        n.key(),
        n.value(),
        n.bf(),
        indent = depth * 2,
    );
    if let Some(l) = n.l() {
        render(arena, l, "L ", depth + 1, out);
    }
    if let Some(r) = n.r() {
        render(arena, r, "R ", depth + 1, out);
    }
}

/// Debug rendering, one node per line, children indented under their
/// parent. Each line shows the slot, entry, balance factor and parent slot.
pub fn print<N>(arena: &[N], root: Option<u32>) -> String
where
    N: AvlNodeLike + KvNode,
    N::Key: Debug,
    N::Value: Debug,
{
    let Some(root) = root else {
        return "(empty)".to_string();
    };
    let mut out = String::new();
    render(arena, root, "", 0, &mut out);
    out
}
