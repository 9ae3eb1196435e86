use std::mem;

use crate::types::{KvNode, Node};

#[derive(Clone, Debug)]
pub struct AvlNode<K, V> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub k: K,
    pub v: V,
    /// Balance factor, `height(left) - height(right)`.
    pub bf: i8,
}

impl<K, V> AvlNode<K, V> {
    pub fn new(k: K, v: V) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            v,
            bf: 0,
        }
    }

    pub fn into_entry(self) -> (K, V) {
        (self.k, self.v)
    }
}

impl<K, V> Node for AvlNode<K, V> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<K, V> KvNode for AvlNode<K, V> {
    type Key = K;
    type Value = V;

    fn key(&self) -> &K {
        &self.k
    }

    fn value(&self) -> &V {
        &self.v
    }

    fn swap_entry(&mut self, other: &mut Self) {
        mem::swap(&mut self.k, &mut other.k);
        mem::swap(&mut self.v, &mut other.v);
    }
}

/// AVL-specific node behavior.
pub trait AvlNodeLike: Node {
    fn bf(&self) -> i8;
    fn set_bf(&mut self, bf: i8);
}

impl<K, V> AvlNodeLike for AvlNode<K, V> {
    fn bf(&self) -> i8 {
        self.bf
    }

    fn set_bf(&mut self, bf: i8) {
        self.bf = bf;
    }
}

impl<N: AvlNodeLike> AvlNodeLike for Option<N> {
    fn bf(&self) -> i8 {
        self.as_ref().expect("link into vacant slot").bf()
    }

    fn set_bf(&mut self, bf: i8) {
        self.as_mut().expect("link into vacant slot").set_bf(bf);
    }
}
