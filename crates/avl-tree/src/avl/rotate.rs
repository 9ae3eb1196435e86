//! Rotation primitives.
//!
//! Each rotation rewires at most three nodes plus the parent link above the
//! pivot, and recomputes the balance factors of the two nodes whose subtrees
//! changed. The balance update is exact for any starting balance of the
//! pivot and its child, so the single rotations double as the steps of the
//! compound left-right / right-left rotations.
//!
//! All functions return the slot now at the top of the rotated subtree. When
//! that slot has no parent it is the new tree root.

use log::trace;

use super::types::AvlNodeLike;
use crate::util::{get_l, get_p, get_r, replace_child, set_l, set_p, set_r};

#[inline]
fn bf<N: AvlNodeLike>(arena: &[N], i: u32) -> i8 {
    arena[i as usize].bf()
}

#[inline]
fn set_bf<N: AvlNodeLike>(arena: &mut [N], i: u32, v: i8) {
    arena[i as usize].set_bf(v);
}

/// Single right rotation around `n`, lifting its left child.
///
/// # Panics
///
/// If `n` has no left child.
pub fn rotate_right<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let nl = get_l(arena, n).expect("right rotation requires a left child");
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_p(arena, nl, p);
    set_r(arena, nl, Some(n));
    set_p(arena, n, Some(nl));
    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }
    if let Some(p) = p {
        replace_child(arena, p, n, Some(nl));
    }

    let mut nbf = bf(arena, n);
    let mut nlbf = bf(arena, nl);
    nbf += -1 - nlbf.max(0);
    nlbf += -1 + nbf.min(0);
    set_bf(arena, n, nbf);
    set_bf(arena, nl, nlbf);

    trace!("rotate_right pivot={n} top={nl} bf=({nbf}, {nlbf})");
    nl
}

/// Single left rotation around `n`, lifting its right child.
///
/// # Panics
///
/// If `n` has no right child.
pub fn rotate_left<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let nr = get_r(arena, n).expect("left rotation requires a right child");
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_p(arena, nr, p);
    set_l(arena, nr, Some(n));
    set_p(arena, n, Some(nr));
    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }
    if let Some(p) = p {
        replace_child(arena, p, n, Some(nr));
    }

    let mut nbf = bf(arena, n);
    let mut nrbf = bf(arena, nr);
    nbf += 1 - nrbf.min(0);
    nrbf += 1 + nbf.max(0);
    set_bf(arena, n, nbf);
    set_bf(arena, nr, nrbf);

    trace!("rotate_left pivot={n} top={nr} bf=({nbf}, {nrbf})");
    nr
}

/// Left rotation on `n.l`, then right rotation on `n`. Fixes a left subtree
/// that is itself right-heavy.
///
/// # Panics
///
/// If `n` has no left child or that child has no right child.
pub fn rotate_left_right<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let nl = get_l(arena, n).expect("left-right rotation requires a left child");
    rotate_left(arena, nl);
    rotate_right(arena, n)
}

/// Right rotation on `n.r`, then left rotation on `n`. Mirror of
/// [`rotate_left_right`].
///
/// # Panics
///
/// If `n` has no right child or that child has no left child.
pub fn rotate_right_left<N: AvlNodeLike>(arena: &mut [N], n: u32) -> u32 {
    let nr = get_r(arena, n).expect("right-left rotation requires a right child");
    rotate_right(arena, nr);
    rotate_left(arena, n)
}
