use crate::types::KvNode;

/// Exchanges the key/value pairs stored in slots `x` and `y`.
///
/// Tree links and balance factors are positional and stay put, so the shape
/// of the tree is unchanged; only the entries trade places.
pub fn swap_entries<N: KvNode>(arena: &mut [N], x: u32, y: u32) {
    if x == y {
        return;
    }
    let (lo, hi) = if x < y { (x, y) } else { (y, x) };
    let (head, tail) = arena.split_at_mut(hi as usize);
    head[lo as usize].swap_entry(&mut tail[0]);
}
