use crate::types::{KvNode, Node};

/// One key/value pair owned by a tree node.
///
/// The key fixes the entry's position in the tree and is never handed out
/// mutably. The value may be replaced in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    pub fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}

/// Binary search tree node: an entry plus its arena links.
#[derive(Clone, Debug)]
pub struct TreeNode<K, V> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub entry: Entry<K, V>,
}

impl<K, V> TreeNode<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            entry: Entry::new(key, value),
        }
    }
}

impl<K, V> Node for TreeNode<K, V> {
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

impl<K, V> KvNode<K, V> for TreeNode<K, V> {
    fn key(&self) -> &K {
        self.entry.key()
    }

    fn value(&self) -> &V {
        self.entry.value()
    }

    fn value_mut(&mut self) -> &mut V {
        self.entry.value_mut()
    }
}
