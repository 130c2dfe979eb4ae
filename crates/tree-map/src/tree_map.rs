use core::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::cursor::Cursor;
use crate::error::TreeMapError;
use crate::tree_node::{Entry, TreeNode};
use crate::types::KvNode;
use crate::util::print::{print_binary, MAX_PRINT_DEPTH};
use crate::util::{self, Location};

fn default_comparator<K: Ord>(a: &K, b: &K) -> Ordering {
    a.cmp(b)
}

fn key_of<K, V>(n: &TreeNode<K, V>) -> &K {
    n.key()
}

/// Ordered map on an unbalanced binary search tree.
///
/// Order comes entirely from the comparator given at construction. Nodes
/// live in an arena and carry a parent index, so in-order traversal needs no
/// stack. Positions are handed out as [`Cursor`] values instead of being kept
/// inside the map.
///
/// No balancing is done: inserting sorted keys produces a list-shaped tree.
#[derive(Clone)]
pub struct TreeMap<K, V, C = fn(&K, &K) -> Ordering>
where
    C: Fn(&K, &K) -> Ordering,
{
    arena: Arena<TreeNode<K, V>>,
    root: Option<u32>,
    comparator: C,
}

impl<K, V> TreeMap<K, V, fn(&K, &K) -> Ordering>
where
    K: Ord,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K, V> Default for TreeMap<K, V, fn(&K, &K) -> Ordering>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            comparator,
        }
    }

    /// Pre-sizes node storage for `capacity` entries.
    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[inline]
    fn cursor(&self, idx: u32) -> Cursor {
        Cursor::new(idx, self.arena.generation(idx).unwrap_or_default())
    }

    fn resolve(&self, cursor: Cursor) -> Result<u32, TreeMapError> {
        if self.arena.is_live(cursor.index, cursor.generation) {
            Ok(cursor.index)
        } else {
            Err(TreeMapError::StaleCursor {
                index: cursor.index,
                generation: cursor.generation,
            })
        }
    }

    #[inline]
    fn entry_at(&self, idx: u32) -> &Entry<K, V> {
        &self.arena[idx].entry
    }

    fn locate(&self, key: &K) -> Location {
        util::locate(&self.arena, self.root, key, key_of, &self.comparator)
    }

    fn find_index(&self, key: &K) -> Option<u32> {
        util::find(&self.arena, self.root, key, key_of, &self.comparator)
    }

    /// Parent and side a new `key` would hang from, or `None` when an equal
    /// key is stored.
    fn vacancy(&self, key: &K) -> Option<(Option<u32>, Ordering)> {
        match self.locate(key) {
            Location::Found(existing) => {
                tracing::trace!(node = existing, "duplicate key, insert ignored");
                None
            }
            Location::Vacant { parent, side } => Some((parent, side)),
        }
    }

    fn link(&mut self, idx: u32, parent: Option<u32>, side: Ordering) -> Cursor {
        self.root = util::attach(&mut self.arena, self.root, idx, parent, side);
        self.cursor(idx)
    }

    fn insert_with<A>(&mut self, key: K, value: V, alloc: A) -> Result<Option<Cursor>, TreeMapError>
    where
        A: FnOnce(&mut Arena<TreeNode<K, V>>, TreeNode<K, V>) -> Result<u32, TreeMapError>,
    {
        let Some((parent, side)) = self.vacancy(&key) else {
            return Ok(None);
        };
        let idx = alloc(&mut self.arena, TreeNode::new(key, value))?;
        Ok(Some(self.link(idx, parent, side)))
    }

    /// Inserts `key` with `value` unless an equal key is already present.
    ///
    /// Returns a cursor on the new node, or `None` when the key was a
    /// duplicate. A duplicate never overwrites: the stored entry keeps its
    /// value and the arguments are dropped.
    pub fn insert(&mut self, key: K, value: V) -> Option<Cursor> {
        let (parent, side) = self.vacancy(&key)?;
        let idx = self.arena.alloc(TreeNode::new(key, value));
        Some(self.link(idx, parent, side))
    }

    /// Like [`insert`](Self::insert), but reports a failed node allocation
    /// as [`TreeMapError::Alloc`] or [`TreeMapError::Full`]. Storage is
    /// reserved before any link is touched, so the map is unchanged on error.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<Cursor>, TreeMapError> {
        self.insert_with(key, value, |arena, node| arena.try_alloc(node))
    }

    /// Cursor on the node holding `key`.
    pub fn find(&self, key: &K) -> Option<Cursor> {
        self.find_index(key).map(|i| self.cursor(i))
    }

    /// Entry whose key compares equal to `key`.
    pub fn search(&self, key: &K) -> Option<&Entry<K, V>> {
        self.find_index(key).map(|i| self.entry_at(i))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).map(Entry::value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find_index(key)?;
        Some(self.arena[idx].value_mut())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Deletes the node at `idx` and returns the entry it held when the call
    /// started.
    ///
    /// With two children the node stays in place: it takes over its
    /// in-order successor's entry and the successor's node, which has no
    /// left child, is unlinked and freed.
    fn remove_index(&mut self, idx: u32) -> Option<Entry<K, V>> {
        let target = util::removal_target(&self.arena, idx);
        if target != idx {
            tracing::trace!(
                node = idx,
                successor = target,
                "two children, moving successor entry up"
            );
            let (node, successor) = self.arena.pair_mut(idx, target)?;
            std::mem::swap(&mut node.entry, &mut successor.entry);
        }
        self.root = util::splice(&mut self.arena, self.root, target);
        self.arena.release(target).map(|n| n.entry)
    }

    /// Removes `key`, returning its entry. Does nothing and returns `None`
    /// when the key is absent.
    pub fn erase(&mut self, key: &K) -> Option<Entry<K, V>> {
        let idx = self.find_index(key)?;
        self.remove_index(idx)
    }

    /// Removes the entry the cursor currently reads.
    pub fn erase_at(&mut self, cursor: Cursor) -> Result<Entry<K, V>, TreeMapError> {
        let idx = self.resolve(cursor)?;
        self.remove_index(idx).ok_or(TreeMapError::StaleCursor {
            index: cursor.index,
            generation: cursor.generation,
        })
    }

    /// Cursor on the smallest key.
    pub fn first(&self) -> Option<Cursor> {
        util::first(&self.arena, self.root).map(|i| self.cursor(i))
    }

    /// Cursor on the largest key.
    pub fn last(&self) -> Option<Cursor> {
        util::last(&self.arena, self.root).map(|i| self.cursor(i))
    }

    pub fn first_entry(&self) -> Option<&Entry<K, V>> {
        util::first(&self.arena, self.root).map(|i| self.entry_at(i))
    }

    pub fn last_entry(&self) -> Option<&Entry<K, V>> {
        util::last(&self.arena, self.root).map(|i| self.entry_at(i))
    }

    /// Cursor on the in-order successor, or `None` past the largest key.
    pub fn next(&self, cursor: Cursor) -> Result<Option<Cursor>, TreeMapError> {
        let idx = self.resolve(cursor)?;
        Ok(util::next(&self.arena, idx).map(|i| self.cursor(i)))
    }

    /// Cursor on the in-order predecessor, or `None` before the smallest key.
    pub fn prev(&self, cursor: Cursor) -> Result<Option<Cursor>, TreeMapError> {
        let idx = self.resolve(cursor)?;
        Ok(util::prev(&self.arena, idx).map(|i| self.cursor(i)))
    }

    /// Moves `cursor` to the in-order successor and returns its entry.
    ///
    /// At the largest key returns `Ok(None)` and leaves `cursor` where it
    /// was.
    pub fn next_entry(&self, cursor: &mut Cursor) -> Result<Option<&Entry<K, V>>, TreeMapError> {
        match self.next(*cursor)? {
            Some(c) => {
                *cursor = c;
                Ok(Some(self.entry_at(c.index)))
            }
            None => Ok(None),
        }
    }

    /// Mirror of [`next_entry`](Self::next_entry).
    pub fn prev_entry(&self, cursor: &mut Cursor) -> Result<Option<&Entry<K, V>>, TreeMapError> {
        match self.prev(*cursor)? {
            Some(c) => {
                *cursor = c;
                Ok(Some(self.entry_at(c.index)))
            }
            None => Ok(None),
        }
    }

    /// Entry the cursor currently reads.
    pub fn entry(&self, cursor: Cursor) -> Result<&Entry<K, V>, TreeMapError> {
        let idx = self.resolve(cursor)?;
        Ok(self.entry_at(idx))
    }

    pub fn value_mut(&mut self, cursor: Cursor) -> Result<&mut V, TreeMapError> {
        let idx = self.resolve(cursor)?;
        Ok(self.arena[idx].value_mut())
    }

    /// Cursor on the smallest key not less than `key`.
    pub fn seek(&self, key: &K) -> Option<Cursor> {
        util::upper_bound(&self.arena, self.root, key, key_of, &self.comparator)
            .map(|i| self.cursor(i))
    }

    /// Entry with the smallest key not less than `key`: `key` itself when
    /// present, else the next larger key, else `None`.
    pub fn upper_bound(&self, key: &K) -> Option<&Entry<K, V>> {
        util::upper_bound(&self.arena, self.root, key, key_of, &self.comparator)
            .map(|i| self.entry_at(i))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every entry. Cursors taken before the call become stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        util::height(&self.arena, self.root)
    }

    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter {
            map: self,
            curr: util::first(&self.arena, self.root),
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Checks ordering, parent links and the entry count.
    pub fn assert_valid(&self) -> Result<(), TreeMapError> {
        let Some(root) = self.root else {
            if self.len() != 0 {
                return Err(TreeMapError::Invariant(format!(
                    "empty tree reports {} entries",
                    self.len()
                )));
            }
            return Ok(());
        };

        if self.arena[root].p.is_some() {
            return Err(TreeMapError::Invariant("root has parent".to_string()));
        }

        let mut reachable = 0usize;
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            reachable += 1;
            if reachable > self.len() {
                return Err(TreeMapError::Invariant("cycle in child links".to_string()));
            }
            let n = &self.arena[i];
            for child in [n.l, n.r].into_iter().flatten() {
                if self.arena.get(child).is_none() {
                    return Err(TreeMapError::Invariant(format!(
                        "node {i} links to vacant slot {child}"
                    )));
                }
                if self.arena[child].p != Some(i) {
                    return Err(TreeMapError::Invariant(format!(
                        "broken parent link on child {child} of {i}"
                    )));
                }
                stack.push(child);
            }
        }
        if reachable != self.len() {
            return Err(TreeMapError::Invariant(format!(
                "{reachable} reachable nodes, {} stored",
                self.len()
            )));
        }

        let mut prev = root;
        let mut curr = util::first(&self.arena, Some(root));
        let mut first = true;
        while let Some(i) = curr {
            if !first
                && (self.comparator)(key_of(&self.arena[prev]), key_of(&self.arena[i]))
                    != Ordering::Less
            {
                return Err(TreeMapError::Invariant(format!(
                    "nodes {prev} and {i} out of order"
                )));
            }
            first = false;
            prev = i;
            curr = util::next(&self.arena, i);
        }

        Ok(())
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Inserts each pair; later duplicates are ignored.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TreeMap<K, V, fn(&K, &K) -> Ordering>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> fmt::Debug for TreeMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Fn(&K, &K) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Box-drawing dump of the tree shape, one `key = value` per node.
///
/// Nodes more than [`MAX_PRINT_DEPTH`] levels below the root are drawn as
/// `…`, which keeps degenerate trees printable.
impl<K, V, C> fmt::Display for TreeMap<K, V, C>
where
    K: fmt::Display,
    V: fmt::Display,
    C: Fn(&K, &K) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => {
                let dump = print_binary(&self.arena, root, MAX_PRINT_DEPTH, |n| {
                    format!("{} = {}", n.key(), n.value())
                });
                write!(f, "TreeMap{dump}")
            }
            None => write!(f, "TreeMap ∅"),
        }
    }
}

/// In-order iterator over `(&K, &V)`, driven by parent links.
pub struct Iter<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    map: &'a TreeMap<K, V, C>,
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.curr?;
        let map = self.map;
        self.curr = util::next(&map.arena, i);
        self.remaining = self.remaining.saturating_sub(1);
        Some(map.entry_at(i).as_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> where C: Fn(&K, &K) -> Ordering {}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::TreeMap;
    use crate::error::TreeMapError;

    fn failed_reserve() -> TreeMapError {
        Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err().into()
    }

    #[test]
    fn failed_allocation_leaves_map_unchanged() {
        let mut map: TreeMap<i32, i32> = [5, 3, 8, 1].into_iter().map(|k| (k, k)).collect();
        let keys: Vec<i32> = map.keys().copied().collect();
        let height = map.height();

        let res = map.insert_with(4, 4, |_, _| Err(failed_reserve()));
        assert!(matches!(res, Err(TreeMapError::Alloc(_))));
        assert_eq!(map.len(), 4);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), keys);
        assert_eq!(map.height(), height);
        assert!(map.search(&4).is_none());
        map.assert_valid().unwrap();

        let res = map.insert_with(9, 9, |_, _| Err(TreeMapError::Full { slots: 4 }));
        assert_eq!(res, Err(TreeMapError::Full { slots: 4 }));
        assert_eq!(map.len(), 4);
        map.assert_valid().unwrap();
    }

    #[test]
    fn duplicate_never_reaches_allocator() {
        let mut map: TreeMap<i32, &str> = TreeMap::new();
        map.insert(1, "a");
        let res = map.insert_with(1, "b", |_, _| Err(failed_reserve()));
        assert_eq!(res, Ok(None));
        assert_eq!(map.get(&1), Some(&"a"));
    }

    #[test]
    fn try_insert_after_failure_links_normally() {
        let mut map: TreeMap<i32, i32> = TreeMap::new();
        assert!(map.insert_with(2, 2, |_, _| Err(failed_reserve())).is_err());
        assert!(map.is_empty());
        let c = map.try_insert(2, 20).unwrap().unwrap();
        assert_eq!(map.entry(c).unwrap().value(), &20);
        assert_eq!(map.try_insert(2, 21), Ok(None));
        map.assert_valid().unwrap();
    }
}
