//! Tree utility functions over an [`Arena`].
//!
//! All functions work on node indices and follow links through the
//! [`Node`] trait, so they never care what a node stores. Key-based helpers
//! take a `key_of` accessor and a three-way comparator.
//!
//! Traversal (`next` / `prev`) climbs parent back references instead of
//! keeping a stack.

pub mod print;

use core::cmp::Ordering;

use crate::arena::Arena;
use crate::types::Node;

#[inline]
pub(crate) fn get_p<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut Arena<N>, idx: u32, v: Option<u32>) {
    arena[idx].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut Arena<N>, idx: u32, v: Option<u32>) {
    arena[idx].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut Arena<N>, idx: u32, v: Option<u32>) {
    arena[idx].set_r(v);
}

/// Leftmost node under `root`.
pub fn first<N: Node>(arena: &Arena<N>, root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(l) = get_l(arena, curr) {
        curr = l;
    }
    Some(curr)
}

/// Rightmost node under `root`.
pub fn last<N: Node>(arena: &Arena<N>, root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = get_r(arena, curr) {
        curr = r;
    }
    Some(curr)
}

/// In-order successor.
pub fn next<N: Node>(arena: &Arena<N>, mut curr: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, curr) {
        return first(arena, Some(r));
    }
    let mut p = get_p(arena, curr);
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
pub fn prev<N: Node>(arena: &Arena<N>, mut curr: u32) -> Option<u32> {
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

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &Arena<N>, root: Option<u32>) -> usize {
    let mut count = 0;
    let mut stack: Vec<u32> = root.into_iter().collect();
    while let Some(i) = stack.pop() {
        count += 1;
        stack.extend(get_l(arena, i));
        stack.extend(get_r(arena, i));
    }
    count
}

/// Number of nodes on the longest root-to-leaf path.
///
/// Iterative, since an unbalanced tree can be as deep as it is large.
pub fn height<N: Node>(arena: &Arena<N>, root: Option<u32>) -> usize {
    let mut max = 0;
    let mut stack: Vec<(u32, usize)> = root.map(|r| (r, 1)).into_iter().collect();
    while let Some((i, depth)) = stack.pop() {
        max = max.max(depth);
        if let Some(l) = get_l(arena, i) {
            stack.push((l, depth + 1));
        }
        if let Some(r) = get_r(arena, i) {
            stack.push((r, depth + 1));
        }
    }
    max
}

/// Where a key sits relative to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// A node holds an equal key.
    Found(u32),
    /// The key is absent. It belongs under `parent` on the given side
    /// (`Less` = left, `Greater` = right), or at the root when the tree is
    /// empty.
    Vacant {
        parent: Option<u32>,
        side: Ordering,
    },
}

/// Descends from `root` comparing `key` against each node.
pub fn locate<N, K, F, C>(
    arena: &Arena<N>,
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Location
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut parent = None;
    let mut side = Ordering::Equal;
    let mut curr = root;
    while let Some(i) = curr {
        side = comparator(key, key_of(&arena[i]));
        curr = match side {
            Ordering::Equal => return Location::Found(i),
            Ordering::Less => get_l(arena, i),
            Ordering::Greater => get_r(arena, i),
        };
        parent = Some(i);
    }
    Location::Vacant { parent, side }
}

/// Finds a node by key.
pub fn find<N, K, F, C>(
    arena: &Arena<N>,
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> Ordering,
{
    match locate(arena, root, key, key_of, comparator) {
        Location::Found(i) => Some(i),
        Location::Vacant { .. } => None,
    }
}

/// Finds the node with the smallest key not less than `key`.
pub fn upper_bound<N, K, F, C>(
    arena: &Arena<N>,
    root: Option<u32>,
    key: &K,
    key_of: F,
    comparator: C,
) -> Option<u32>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut curr = root;
    let mut result = None;
    while let Some(i) = curr {
        match comparator(key, key_of(&arena[i])) {
            Ordering::Equal => return Some(i),
            Ordering::Less => {
                result = Some(i);
                curr = get_l(arena, i);
            }
            Ordering::Greater => curr = get_r(arena, i),
        }
    }
    result
}

/// Links the detached `node` into the vacant slot described by `parent` and
/// `side`. Returns the new root.
pub fn attach<N: Node>(
    arena: &mut Arena<N>,
    root: Option<u32>,
    node: u32,
    parent: Option<u32>,
    side: Ordering,
) -> Option<u32> {
    set_p(arena, node, parent);
    let Some(p) = parent else {
        return Some(node);
    };
    match side {
        Ordering::Less => {
            debug_assert!(get_l(arena, p).is_none());
            set_l(arena, p, Some(node));
        }
        _ => {
            debug_assert!(get_r(arena, p).is_none());
            set_r(arena, p, Some(node));
        }
    }
    root
}

/// Points whichever child slot of `parent` held `old` at `new`, or makes
/// `new` the root when `parent` is `None`. Returns the new root.
fn replace_child<N: Node>(
    arena: &mut Arena<N>,
    root: Option<u32>,
    parent: Option<u32>,
    old: u32,
    new: Option<u32>,
) -> Option<u32> {
    if let Some(c) = new {
        set_p(arena, c, parent);
    }
    let Some(p) = parent else {
        return new;
    };
    if get_l(arena, p) == Some(old) {
        set_l(arena, p, new);
    } else {
        set_r(arena, p, new);
    }
    root
}

/// Unlinks `node`, which must have at most one child, splicing that child
/// (if any) into its place. Returns the new root. The node keeps no links
/// afterwards but is not released from the arena.
pub fn splice<N: Node>(arena: &mut Arena<N>, root: Option<u32>, node: u32) -> Option<u32> {
    let p = get_p(arena, node);
    let l = get_l(arena, node);
    let r = get_r(arena, node);
    debug_assert!(l.is_none() || r.is_none(), "splice needs at most one child");
    set_p(arena, node, None);
    set_l(arena, node, None);
    set_r(arena, node, None);

    let child = l.or(r);
    match child {
        None => tracing::trace!(node, parent = ?p, "detaching leaf"),
        Some(c) => tracing::trace!(node, child = c, parent = ?p, "splicing single child"),
    }
    replace_child(arena, root, p, node, child)
}

/// Node that physically leaves the tree when `node` is deleted: `node`
/// itself when it has at most one child, otherwise the leftmost node of its
/// right subtree.
pub fn removal_target<N: Node>(arena: &Arena<N>, node: u32) -> u32 {
    match (get_l(arena, node), get_r(arena, node)) {
        (Some(_), Some(r)) => first(arena, Some(r)).unwrap_or(r),
        _ => node,
    }
}
