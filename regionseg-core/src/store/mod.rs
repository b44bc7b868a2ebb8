//! Disjoint-region store backing every merge policy.
//!
//! Each node starts as its own region. Regions are trees of parent pointers
//! whose root carries the authoritative size, mean and merge tolerance. Unions
//! are rank guided: the root with the strictly higher rank absorbs the other,
//! and on a tie the root of the second operand absorbs the first and gains a
//! rank. Which root survives decides whose fields remain authoritative, so the
//! tie-break is part of the observable behaviour.

use crate::{Result, error::SegmentError};

/// Union-find arena holding one record per original node.
///
/// # Examples
/// ```
/// use regionseg_core::RegionStore;
///
/// let mut store = RegionStore::new(&[1.0, 3.0, 8.0]);
/// assert!(store.join(0, 1)?);
/// assert!(!store.join(1, 0)?);
/// let root = store.find(0)?;
/// assert_eq!(store.size(root)?, 2);
/// assert_eq!(store.mean(root)?, 2.0);
/// assert_eq!(store.region_count(), 2);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RegionStore {
    parent: Vec<usize>,
    rank: Vec<u32>,
    size: Vec<usize>,
    mean: Vec<f64>,
    tolerance: Vec<f64>,
    label: Vec<usize>,
    regions: usize,
}

impl RegionStore {
    /// Creates a store with one singleton region per value.
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let node_count = values.len();
        Self {
            parent: (0..node_count).collect(),
            rank: vec![0; node_count],
            size: vec![1; node_count],
            mean: values.to_vec(),
            tolerance: vec![0.0; node_count],
            label: vec![0; node_count],
            regions: node_count,
        }
    }

    /// Returns the number of nodes the store was created with.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    /// Returns the number of regions currently alive.
    #[must_use]
    #[rustfmt::skip]
    pub fn region_count(&self) -> usize { self.regions }

    /// Resolves `node` to the root of its region, compressing the path.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn find(&mut self, node: usize) -> Result<usize> {
        self.check(node)?;
        Ok(self.find_root(node))
    }

    /// Resolves `node` to its root without rewriting any parent pointer.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn root_of(&self, node: usize) -> Result<usize> {
        self.check(node)?;
        let mut current = node;
        while self.parent[current] != current {
            current = self.parent[current];
        }
        Ok(current)
    }

    /// Merges the regions containing `left` and `right`.
    ///
    /// Returns `false` without touching any field when both nodes already
    /// share a root.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when either index is invalid;
    /// the store is left unchanged.
    pub fn join(&mut self, left: usize, right: usize) -> Result<bool> {
        self.check(left)?;
        self.check(right)?;
        let left_root = self.find_root(left);
        let right_root = self.find_root(right);
        if left_root == right_root {
            return Ok(false);
        }
        self.union_roots(left_root, right_root);
        Ok(true)
    }

    /// Returns `true` when `node` is the root of its region.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn is_root(&self, node: usize) -> Result<bool> {
        self.check(node)?;
        Ok(self.parent[node] == node)
    }

    /// Returns the parent pointer of `node`.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn parent(&self, node: usize) -> Result<usize> {
        self.check(node)?;
        Ok(self.parent[node])
    }

    /// Returns the rank recorded on `node`. Only meaningful for roots.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn rank(&self, node: usize) -> Result<u32> {
        self.check(node)?;
        Ok(self.rank[node])
    }

    /// Returns the size recorded on `node`. Authoritative for roots and, after
    /// relabelling, for every node.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn size(&self, node: usize) -> Result<usize> {
        self.check(node)?;
        Ok(self.size[node])
    }

    /// Returns the mean recorded on `node`. Authoritative for roots and, after
    /// relabelling, for every node.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn mean(&self, node: usize) -> Result<f64> {
        self.check(node)?;
        Ok(self.mean[node])
    }

    /// Returns the threshold-merge tolerance recorded on `node`.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn tolerance(&self, node: usize) -> Result<f64> {
        self.check(node)?;
        Ok(self.tolerance[node])
    }

    /// Returns the dense label recorded on `node`, `0` before relabelling.
    ///
    /// # Errors
    /// Returns [`SegmentError::NodeOutOfRange`] when `node` is not a valid
    /// index.
    pub fn label(&self, node: usize) -> Result<usize> {
        self.check(node)?;
        Ok(self.label[node])
    }

    /// Iterates over the current roots in node-index order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(node, &parent)| (node == parent).then_some(node))
    }

    fn check(&self, node: usize) -> Result<()> {
        if node < self.parent.len() {
            Ok(())
        } else {
            Err(SegmentError::NodeOutOfRange {
                node,
                node_count: self.parent.len(),
            })
        }
    }

    /// Path-compressing find for indices already known to be valid.
    pub(crate) fn find_root(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != root {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Unites two distinct roots and returns the surviving root.
    pub(crate) fn union_roots(&mut self, left: usize, right: usize) -> usize {
        debug_assert_ne!(left, right, "union_roots requires distinct roots");
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        let (winner, loser) = if left_rank > right_rank {
            (left, right)
        } else {
            (right, left)
        };

        let combined = self.size[left] + self.size[right];
        let weighted = self.size[left] as f64 * self.mean[left]
            + self.size[right] as f64 * self.mean[right];

        self.parent[loser] = winner;
        self.size[winner] = combined;
        self.mean[winner] = weighted / combined as f64;
        if left_rank == right_rank {
            self.rank[winner] = right_rank.saturating_add(1);
        }
        self.regions -= 1;
        winner
    }

    pub(crate) fn root_size(&self, root: usize) -> usize {
        self.size[root]
    }

    pub(crate) fn root_mean(&self, root: usize) -> f64 {
        self.mean[root]
    }

    pub(crate) fn root_tolerance(&self, root: usize) -> f64 {
        self.tolerance[root]
    }

    pub(crate) fn set_tolerance(&mut self, root: usize, tolerance: f64) {
        self.tolerance[root] = tolerance;
    }

    /// Seeds every node's tolerance with `threshold`.
    pub(crate) fn seed_tolerance(&mut self, threshold: f64) {
        self.tolerance.fill(threshold);
    }

    /// Assigns labels `1..=K` to the roots in index order, then copies each
    /// root's label, size and mean onto every member node. Returns `K`.
    pub(crate) fn relabel(&mut self) -> usize {
        let mut next = 0;
        for node in 0..self.parent.len() {
            if self.parent[node] == node {
                next += 1;
                self.label[node] = next;
            }
        }

        for node in 0..self.parent.len() {
            let root = self.find_root(node);
            self.label[node] = self.label[root];
            self.size[node] = self.size[root];
            self.mean[node] = self.mean[root];
        }

        next
    }
}
