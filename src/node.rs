//! The storage unit of the tree and the algorithms that keep it balanced.
//!
//! Every function here works on owned, boxed subtrees. A rotation or a removal moves the boxes it
//! touches and hands the new subtree root back to the caller, who stores it in the slot the old
//! root came from. No node is ever referenced from two places.

use std::cmp::Ordering;
use std::mem;

use log::trace;

/// An optional, exclusively owned subtree. `None` is an empty subtree with a height of 0.
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub(crate) height: usize,
}

/// Which way an insertion went from the subtree root that handled it. The parent frame uses this
/// to tell a straight (left-left, right-right) imbalance from a zig-zag one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// The key was already present so nothing changed.
    Duplicate,
    /// The subtree was empty and the new node now roots it.
    Created,
    Left,
    Right,
}

/// Height of a possibly empty subtree. This reads the cached field and never walks the subtree.
pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// Balance factor of a possibly empty subtree: left height minus right height. Positive means
/// left-heavy, negative means right-heavy.
pub(crate) fn balance_factor<K, V>(link: &Link<K, V>) -> isize {
    link.as_ref().map_or(0, |n| n.balance_factor())
}

/// Inserts `key` into the subtree at `link`, returning the new subtree root and where the key went.
/// Duplicate keys leave the subtree untouched and drop `value`.
pub(crate) fn insert<K, V>(link: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, Placement)
where
    K: Ord,
{
    match link {
        None => (Node::new_boxed(key, value), Placement::Created),
        Some(node) => node.insert(key, value),
    }
}

/// Removes `key` from the subtree at `link`, returning the new (possibly empty) subtree root and
/// the removed value. A missing key returns the subtree unchanged and `None`.
pub(crate) fn delete<K, V>(link: Link<K, V>, key: &K) -> (Link<K, V>, Option<V>)
where
    K: Ord,
{
    match link {
        None => (None, None),
        Some(node) => node.delete(key),
    }
}

/// Finds the node holding `key` in the subtree at `link`.
pub(crate) fn find<'a, K, V>(link: &'a Link<K, V>, key: &K) -> Option<&'a Node<K, V>>
where
    K: Ord,
{
    let mut current = link.as_deref();
    while let Some(node) = current {
        current = match key.cmp(&node.key) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Equal => return Some(node),
            Ordering::Greater => node.right.as_deref(),
        };
    }
    None
}

pub(crate) fn find_mut<'a, K, V>(link: &'a mut Link<K, V>, key: &K) -> Option<&'a mut Node<K, V>>
where
    K: Ord,
{
    let node = link.as_deref_mut()?;
    match key.cmp(&node.key) {
        Ordering::Less => find_mut(&mut node.left, key),
        Ordering::Equal => Some(node),
        Ordering::Greater => find_mut(&mut node.right, key),
    }
}

impl<K, V> Node<K, V> {
    /// Construct a new leaf `Node` with the given `key` and `value`.
    pub(crate) fn new_boxed(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            height: 1,
            key,
            left: None,
            right: None,
            value,
        })
    }

    /// The difference in height between the left and right subtrees. See [the Wikipedia
    /// page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    pub(crate) fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1. Must run after
    /// either child changed shape and before `self.balance_factor()` is read.
    pub(crate) fn update_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// The leftmost (smallest) node of this subtree.
    pub(crate) fn first(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        node
    }

    /// The rightmost (largest) node of this subtree.
    pub(crate) fn last(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        node
    }

    /// Rotate self to the right. This moves the left child up vertically and self down vertically.
    /// Used to rebalance the tree when the left child is too tall. As such, it must only be called
    /// when there _is_ a left child.
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///        old_root                new_root
    ///         /     \                /     \
    ///    new_root    z   rotate ->  x    old_root
    ///     /   \                              /  \
    ///    x     y                            y    z
    /// ```
    pub(crate) fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self.left.take().expect("Rotate right => left child");
        self.left = new_root.right.take();
        // `self` is now the lower node so its height has to be settled first.
        self.update_height();

        new_root.right = Some(self);
        new_root.update_height();
        trace!("rotated right, subtree height is now {}", new_root.height);
        new_root
    }

    /// Mirror image of [`Node::rotate_right`]: the right child moves up and self moves down.
    ///
    /// ## Panics
    ///
    /// When called on a node without a right child.
    pub(crate) fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self.right.take().expect("Rotate left => right child");
        self.right = new_root.left.take();
        self.update_height();

        new_root.left = Some(self);
        new_root.update_height();
        trace!("rotated left, subtree height is now {}", new_root.height);
        new_root
    }

    fn rotate_left_right(mut self: Box<Self>) -> Box<Self> {
        let left = self.left.take().expect("Rotate left-right => left child");
        self.left = Some(left.rotate_left());
        self.rotate_right()
    }

    fn rotate_right_left(mut self: Box<Self>) -> Box<Self> {
        let right = self.right.take().expect("Rotate right-left => right child");
        self.right = Some(right.rotate_right());
        self.rotate_left()
    }

    fn insert(mut self: Box<Self>, key: K, value: V) -> (Box<Self>, Placement)
    where
        K: Ord,
    {
        let (went, below) = match key.cmp(&self.key) {
            Ordering::Less => {
                let (left, below) = insert(self.left.take(), key, value);
                self.left = Some(left);
                (Placement::Left, below)
            }
            Ordering::Equal => return (self, Placement::Duplicate),
            Ordering::Greater => {
                let (right, below) = insert(self.right.take(), key, value);
                self.right = Some(right);
                (Placement::Right, below)
            }
        };
        if below == Placement::Duplicate {
            return (self, Placement::Duplicate);
        }

        // See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology. A single insert
        // can only push the balance factor to exactly +-2, and only on the side we went down.
        self.update_height();
        let balance = self.balance_factor();
        let node = if balance > 1 {
            match below {
                Placement::Left => {
                    trace!("insert: left-left case");
                    self.rotate_right()
                }
                Placement::Right => {
                    trace!("insert: left-right case");
                    self.rotate_left_right()
                }
                Placement::Created | Placement::Duplicate => {
                    unreachable!("A new leaf cannot unbalance its parent.")
                }
            }
        } else if balance < -1 {
            match below {
                Placement::Right => {
                    trace!("insert: right-right case");
                    self.rotate_left()
                }
                Placement::Left => {
                    trace!("insert: right-left case");
                    self.rotate_right_left()
                }
                Placement::Created | Placement::Duplicate => {
                    unreachable!("A new leaf cannot unbalance its parent.")
                }
            }
        } else {
            self
        };

        if cfg!(debug_assertions) {
            if let Some(left) = &node.left {
                assert!(node.key > left.key);
            }
            if let Some(right) = &node.right {
                assert!(node.key < right.key);
            }
            node.assert_balanced();
        }
        (node, went)
    }

    fn delete(mut self: Box<Self>, key: &K) -> (Link<K, V>, Option<V>)
    where
        K: Ord,
    {
        let removed = match key.cmp(&self.key) {
            Ordering::Less => {
                let (left, removed) = delete(self.left.take(), key);
                self.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = delete(self.right.take(), key);
                self.right = right;
                removed
            }
            Ordering::Equal => match (self.left.take(), self.right.take()) {
                (None, None) => {
                    let Node { value, .. } = *self;
                    return (None, Some(value));
                }
                // The surviving child is already balanced and has correct heights.
                (Some(child), None) | (None, Some(child)) => {
                    let Node { value, .. } = *self;
                    return (Some(child), Some(value));
                }
                // Two children: the in-order successor takes over this node's key and value and
                // is itself removed from the right subtree.
                (Some(left), Some(right)) => {
                    let (right, successor_key, successor_value) = right.take_first();
                    self.left = Some(left);
                    self.right = right;
                    self.key = successor_key;
                    Some(mem::replace(&mut self.value, successor_value))
                }
            },
        };

        if removed.is_none() {
            return (Some(self), None);
        }
        (Some(self.rebalance()), removed)
    }

    /// Detaches the leftmost node of this subtree, rebalancing every frame on the way back up.
    /// Returns what is left of the subtree along with the detached key and value.
    fn take_first(mut self: Box<Self>) -> (Link<K, V>, K, V) {
        match self.left.take() {
            None => {
                let Node {
                    key, value, right, ..
                } = *self;
                (right, key, value)
            }
            Some(left) => {
                let (left, key, value) = left.take_first();
                self.left = left;
                (Some(self.rebalance()), key, value)
            }
        }
    }

    /// Restores the cached height and the AVL invariant after a removal somewhere below `self`.
    /// Unlike insertion, the rotation is chosen from the taller child's own balance factor since
    /// a removal does not leave a trail telling us which grandchild is heavy.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.update_height();
        let balance = self.balance_factor();
        let node = if balance > 1 {
            if balance_factor(&self.left) >= 0 {
                trace!("delete: left-left case");
                self.rotate_right()
            } else {
                trace!("delete: left-right case");
                self.rotate_left_right()
            }
        } else if balance < -1 {
            if balance_factor(&self.right) <= 0 {
                trace!("delete: right-right case");
                self.rotate_left()
            } else {
                trace!("delete: right-left case");
                self.rotate_right_left()
            }
        } else {
            self
        };

        if cfg!(debug_assertions) {
            node.assert_balanced();
        }
        node
    }

    fn assert_balanced(&self) {
        let left_height = height(&self.left);
        let right_height = height(&self.right);
        assert_eq!(self.height, left_height.max(right_height) + 1);
        assert!((left_height as isize - right_height as isize).abs() <= 1);
    }
}
