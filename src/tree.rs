//! A self-balancing BST (specifically, an AVL tree) mapping unique keys to values. Every node
//! exclusively owns its children so rotations and removals are plain moves of boxed subtrees.
//!
//! Unlike most maps, inserting a key that is already present is a no-op: the tree keeps the value
//! it already has. Deleting a key that isn't present is a no-op as well.
//!
//! # Examples
//!
//! ```
//! use avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&1), None);
//! assert_eq!(tree.height(), 0);
//!
//! assert!(tree.insert(1, 2));
//! assert_eq!(tree.find(&1), Some(&2));
//!
//! // Inserting a new value for the same key is ignored.
//! assert!(!tree.insert(1, 3));
//! assert_eq!(tree.find(&1), Some(&2));
//!
//! // Deleting a node returns its value.
//! assert_eq!(tree.delete(&1), Some(2));
//! assert_eq!(tree.delete(&1), None);
//! assert!(tree.is_empty());
//! ```

use std::fmt;

use log::{debug, trace};

use crate::invariants::{self, InvariantViolation};
use crate::iter::{Iter, Keys, Values};
use crate::node::{self, Link, Placement};

/// A self-balancing Binary Search Tree (specifically, an AVL tree). This can be used for
/// inserting, finding, and deleting keys and values. After every operation the heights of any
/// node's two subtrees differ by at most one, so the tree is never taller than about
/// `1.44 * lg(N + 2)`.
#[derive(Clone)]
pub struct Tree<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Tree<K, V> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Inserts the given value into the tree stored at the given key. Returns `false`, dropping
    /// `value`, if the key was already present. The stored value is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert!(tree.insert(1, "one"));
    /// assert!(!tree.insert(1, "uno"));
    /// assert_eq!(tree.find(&1), Some(&"one"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool
    where
        K: Ord,
    {
        let (root, placement) = node::insert(self.root.take(), key, value);
        self.root = Some(root);

        if placement == Placement::Duplicate {
            trace!("ignored insert of a duplicate key");
            return false;
        }
        self.len += 1;
        true
    }

    /// Deletes the node containing the given key from the tree and returns its value. If the tree
    /// does not contain a node with the key, nothing happens and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.delete(&1), Some(2));
    /// assert_eq!(tree.delete(&1), None);
    /// assert_eq!(tree.find(&1), None);
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<V>
    where
        K: Ord,
    {
        let (root, removed) = node::delete(self.root.take(), key);
        self.root = root;

        if removed.is_some() {
            self.len -= 1;
        } else {
            trace!("ignored delete of a missing key");
        }
        removed
    }

    /// Potentially finds the value associated with the given key in this tree. If no node has the
    /// corresponding key, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.find(&1), Some(&2));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        node::find(&self.root, key).map(|n| &n.value)
    }

    /// Like [`Tree::find`] but hands out a mutable reference to the value. Keys can't be changed
    /// in place since that could break the ordering.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("visits", 1);
    ///
    /// if let Some(visits) = tree.find_mut(&"visits") {
    ///     *visits += 1;
    /// }
    /// assert_eq!(tree.find(&"visits"), Some(&2));
    /// ```
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        node::find_mut(&mut self.root, key).map(|n| &mut n.value)
    }

    /// Whether the tree holds the given key.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        node::find(&self.root, key).is_some()
    }

    /// Gets the height of this tree: the number of nodes on the longest path from the root down
    /// to a leaf. An empty tree has a height of 0.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// The root's balance factor: the height of its left subtree minus the height of its right
    /// subtree. Always within `-1..=1`, and 0 for an empty tree.
    pub fn balance_factor(&self) -> isize {
        node::balance_factor(&self.root)
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} entries", self.len);
        self.root = None;
        self.len = 0;
    }

    /// The entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.first(), None);
    ///
    /// tree.insert(2, 'b');
    /// tree.insert(1, 'a');
    /// tree.insert(3, 'c');
    /// assert_eq!(tree.first(), Some((&1, &'a')));
    /// assert_eq!(tree.last(), Some((&3, &'c')));
    /// ```
    pub fn first(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(|root| {
            let n = root.first();
            (&n.key, &n.value)
        })
    }

    /// The entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(|root| {
            let n = root.last();
            (&n.key, &n.value)
        })
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.len)
    }

    /// Iterates over the keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Iterates over the values, ordered by their keys.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Collects the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [3, 1, 2] {
    ///     tree.insert(key, ());
    /// }
    ///
    /// assert_eq!(tree.in_order_keys(), [1, 2, 3]);
    /// ```
    pub fn in_order_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    /// Walks the whole tree checking that keys are strictly ascending, that every node's subtrees
    /// differ in height by at most one, and that every cached height is correct. Mostly useful in
    /// tests; a tree only ever built through this API always passes.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        K: Ord,
    {
        let checked = invariants::check(&self.root, None, None)?;
        if checked.len != self.len {
            return Err(InvariantViolation::LengthMismatch {
                counted: checked.len,
                recorded: self.len,
            });
        }
        Ok(())
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two trees are equal when they hold the same entries, however their nodes happen to be arranged.
impl<K, V> PartialEq for Tree<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V> Eq for Tree<K, V>
where
    K: Eq,
    V: Eq,
{
}
