//! Node trait definitions.
//!
//! Every "pointer" in the tree is an `Option<u32>` index into an
//! [`Arena`](crate::arena::Arena). Tree-manipulation functions in
//! [`util`](crate::util) take the arena and work with indices only.

/// Tree links (`p`, `l`, `r`).
///
/// `p` is a back reference: it is only ever followed upwards and never
/// used to release a node.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Key/value node interface used by map-like structures.
///
/// Keys are read-only once stored; only values can be changed in place.
pub trait KvNode<K, V>: Node {
    fn key(&self) -> &K;
    fn value(&self) -> &V;
    fn value_mut(&mut self) -> &mut V;
}
