//! Slot storage for binary search tree nodes.
//!
//! Every node of a tree lives in one arena and is addressed by a [`NodeId`].
//! The arena is the sole owner of the nodes; the `parent`, `left` and `right`
//! links are plain indices, so a back-reference can neither keep a node alive
//! nor free it.
//!
//! Implementation details:
//! - Slots are either occupied by a node or vacant and threaded onto a free
//!   list, the same layout a slot map uses. Vacated slots are reused first.
//! - `NodeId` wraps a `NonZeroU32` holding `index + 1`, so `Option<NodeId>`
//!   stays four bytes wide.
//! - Dropping or clearing the arena releases the backing `Vec` in one pass;
//!   nothing ever recurses over the tree shape.

use core::fmt;
use core::mem;
use core::num::NonZeroU32;
use core::ops::{Index, IndexMut};

/// Stable handle to a node slot inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|raw| raw.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(NodeId)
    }

    /// Slot index this handle refers to.
    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.index())
    }
}

/// Which child link of a parent a node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<NodeId> },
}

/// Owning storage for the nodes of one tree.
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<NodeId>,
    // Never exceeds the slot count, which is capped at `u32::MAX`.
    len: u32,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len as usize
    }

    /// Largest number of nodes an arena of this node type can address.
    pub(crate) fn max_size() -> usize {
        let by_bytes = isize::MAX as usize / mem::size_of::<Slot<K, V>>().max(1);
        by_bytes.min(u32::MAX as usize)
    }

    /// Stores a new unlinked node and returns its handle.
    ///
    /// # Panics
    /// Panics if the arena already addresses `u32::MAX` slots.
    pub(crate) fn alloc(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let node = Node::new(key, value, parent);

        if let Some(id) = self.free_head {
            let slot = &mut self.slots[id.index()];
            if let Slot::Vacant { next_free } = *slot {
                self.free_head = next_free;
            }
            *slot = Slot::Occupied(node);
            self.len += 1;
            return id;
        }

        let id = NodeId::from_index(self.slots.len())
            .unwrap_or_else(|| panic!("node arena exhausted"));
        self.slots.push(Slot::Occupied(node));
        self.len += 1;
        id
    }

    /// Takes the node out of its slot and puts the slot on the free list.
    ///
    /// Returns `None` if the slot was already vacant.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let slot = self.slots.get_mut(id.index())?;
        if let Slot::Vacant { .. } = slot {
            return None;
        }
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(slot, vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                self.len -= 1;
                Some(node)
            }
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Drops every node and forgets the free list.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("vacant node slot {id:?}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("vacant node slot {id:?}"),
        }
    }
}
