/// Position of one node in a [`TreeMap`](crate::TreeMap).
///
/// Returned by `insert`, `find`, `first`, `last` and `seek`, and threaded
/// through `next` / `prev`. A cursor is a plain value: two traversals of the
/// same map never share one, and holding a cursor does not borrow the map.
///
/// A cursor names a node, and a node holds whatever entry currently lives
/// there. Deleting a key whose node has two children moves the successor's
/// entry into that node and frees the successor's node instead, so a cursor
/// on the deleted key's node then reads the successor's entry, while a
/// cursor on the successor's old node goes stale. Using a stale cursor
/// yields [`TreeMapError::StaleCursor`](crate::TreeMapError::StaleCursor).
///
/// A cursor does not record which map produced it. Passing it to another
/// map is a logic error that is only detected when the slot it names is
/// vacant or at a different generation there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Cursor {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot of the node.
    pub fn index(&self) -> u32 {
        self.index
    }
}
