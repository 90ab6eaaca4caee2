//! Structural validation. Walks the whole tree and reports the first broken invariant it finds.

use crate::node::Link;

/// A broken structural invariant, as reported by
/// [`Tree::check_invariants`][crate::Tree::check_invariants]. A correct tree never produces one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// Some key is not strictly between the keys bounding its subtree. This covers both the
    /// ordering of keys and their uniqueness.
    #[error("keys are not in strictly ascending order")]
    Unordered,
    /// Some node's subtrees differ in height by more than one.
    #[error("node has balance factor {balance_factor}, outside of -1..=1")]
    Unbalanced {
        /// Left height minus right height at the offending node.
        balance_factor: isize,
    },
    /// Some node's cached height doesn't match the height of its subtree.
    #[error("node caches height {cached} but its subtree has height {actual}")]
    StaleHeight {
        /// The height stored in the node.
        cached: usize,
        /// The height recomputed from its children.
        actual: usize,
    },
    /// The tree's entry count disagrees with the number of reachable nodes.
    #[error("tree records {recorded} entries but holds {counted}")]
    LengthMismatch {
        /// Number of nodes reachable from the root.
        counted: usize,
        /// Number of entries the tree believes it holds.
        recorded: usize,
    },
}

/// What a successful check learned about a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Checked {
    pub(crate) height: usize,
    pub(crate) len: usize,
}

/// Checks BST order, balance and cached heights of the subtree at `link`. Every key must lie
/// strictly between `lower` and `upper` when those are present.
pub(crate) fn check<'a, K, V>(
    link: &'a Link<K, V>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
) -> Result<Checked, InvariantViolation>
where
    K: Ord,
{
    let node = match link {
        None => return Ok(Checked { height: 0, len: 0 }),
        Some(node) => node,
    };

    if lower.map_or(false, |lower| node.key <= *lower)
        || upper.map_or(false, |upper| node.key >= *upper)
    {
        return Err(InvariantViolation::Unordered);
    }

    let left = check(&node.left, lower, Some(&node.key))?;
    let right = check(&node.right, Some(&node.key), upper)?;

    let actual = left.height.max(right.height) + 1;
    if node.height != actual {
        return Err(InvariantViolation::StaleHeight {
            cached: node.height,
            actual,
        });
    }

    let balance_factor = left.height as isize - right.height as isize;
    if balance_factor.abs() > 1 {
        return Err(InvariantViolation::Unbalanced { balance_factor });
    }

    Ok(Checked {
        height: actual,
        len: left.len + right.len + 1,
    })
}
