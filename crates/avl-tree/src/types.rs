//! Node trait definitions.
//!
//! Each "pointer" is an `Option<u32>` index into a [`Vec`]-backed arena. All
//! tree-manipulation functions take the arena as a slice and work with
//! indices.

/// Tree links (`p`, `l`, `r`).
///
/// `l` and `r` own their subtrees; `p` is a back-link only.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Key/value node interface used by map-like structures.
pub trait KvNode: Node {
    type Key;
    type Value;

    fn key(&self) -> &Self::Key;
    fn value(&self) -> &Self::Value;

    /// Exchanges key and value with `other`. Links and any balancing
    /// metadata stay where they are.
    fn swap_entry(&mut self, other: &mut Self);
}

/// An arena slot that may be vacant. Linked code only ever reaches occupied
/// slots; touching a vacant one is a broken-link bug.
impl<N: Node> Node for Option<N> {
    fn p(&self) -> Option<u32> {
        self.as_ref().expect("link into vacant slot").p()
    }

    fn l(&self) -> Option<u32> {
        self.as_ref().expect("link into vacant slot").l()
    }

    fn r(&self) -> Option<u32> {
        self.as_ref().expect("link into vacant slot").r()
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.as_mut().expect("link into vacant slot").set_p(v);
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.as_mut().expect("link into vacant slot").set_l(v);
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.as_mut().expect("link into vacant slot").set_r(v);
    }
}

impl<N: KvNode> KvNode for Option<N> {
    type Key = N::Key;
    type Value = N::Value;

    fn key(&self) -> &N::Key {
        self.as_ref().expect("link into vacant slot").key()
    }

    fn value(&self) -> &N::Value {
        self.as_ref().expect("link into vacant slot").value()
    }

    fn swap_entry(&mut self, other: &mut Self) {
        match (self, other) {
            (Some(a), Some(b)) => a.swap_entry(b),
            _ => panic!("entry swap with vacant slot"),
        }
    }
}
