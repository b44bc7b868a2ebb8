//! Weighted adjacency edges and their ordering.
//!
//! The merge policies visit edges in non-decreasing weight order. Ties keep
//! their insertion order, so the sort must be stable: reordering equal-weight
//! edges changes which regions win a union.

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Result, error::SegmentError};

/// A single undirected adjacency between two nodes.
///
/// Endpoints are original node indices, never region identifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
    weight: f64,
}

impl Edge {
    /// Creates an edge between `source` and `target` with the given
    /// dissimilarity `weight`.
    ///
    /// # Examples
    /// ```
    /// use regionseg_core::Edge;
    ///
    /// let edge = Edge::new(0, 1, 0.5);
    /// assert_eq!(edge.source(), 0);
    /// assert_eq!(edge.weight(), 0.5);
    /// ```
    #[must_use]
    pub const fn new(source: usize, target: usize, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Returns the first endpoint as supplied.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the second endpoint as supplied.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }

    /// Returns the edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }

    /// Returns the same edge with its endpoints swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            weight: self.weight,
        }
    }

    fn validate(&self, node_count: usize) -> Result<()> {
        for node in [self.source, self.target] {
            if node >= node_count {
                return Err(SegmentError::NodeOutOfRange { node, node_count });
            }
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(SegmentError::InvalidWeight {
                source_node: self.source,
                target_node: self.target,
                weight: self.weight,
            });
        }
        Ok(())
    }
}

fn by_weight(left: &Edge, right: &Edge) -> Ordering {
    left.weight.total_cmp(&right.weight)
}

/// An ordered collection of edges supplied by the caller.
///
/// # Examples
/// ```
/// use regionseg_core::{Edge, EdgeList};
///
/// let mut edges = EdgeList::new();
/// edges.push(Edge::new(1, 2, 3.0));
/// edges.push(Edge::new(0, 1, 1.0));
/// edges.sort();
/// assert!(edges.is_sorted());
/// assert_eq!(edges.as_slice()[0].weight(), 1.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeList {
    edges: Vec<Edge>,
    sorted: bool,
}

impl EdgeList {
    /// Creates an empty edge list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty edge list with room for `capacity` edges.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity),
            sorted: false,
        }
    }

    /// Appends an edge. Appending invalidates any previous sort.
    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
        self.sorted = false;
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when the list holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns `true` once [`Self::sort`] has run and no edge was appended
    /// since.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_sorted(&self) -> bool { self.sorted }

    /// Returns the edges in their current order.
    #[must_use]
    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterates over the edges in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    /// Sorts the edges by ascending weight, keeping equal weights in
    /// insertion order.
    pub fn sort(&mut self) {
        #[cfg(feature = "parallel")]
        self.edges.par_sort_by(by_weight);
        #[cfg(not(feature = "parallel"))]
        self.edges.sort_by(by_weight);
        self.sorted = true;
    }

    /// Checks every edge against `node_count` and the weight domain.
    pub(crate) fn validate(&self, node_count: usize) -> Result<()> {
        self.edges
            .iter()
            .try_for_each(|edge| edge.validate(node_count))
    }
}

impl From<Vec<Edge>> for EdgeList {
    fn from(edges: Vec<Edge>) -> Self {
        Self {
            edges,
            sorted: false,
        }
    }
}

impl FromIterator<Edge> for EdgeList {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
