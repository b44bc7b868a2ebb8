//! Edge construction for regular 2D and 3D voxel grids.
//!
//! Nodes are voxels in x-fastest order. Every unordered pair of neighbouring
//! voxels contributes exactly one edge, emitted from the lower index towards
//! the higher one, weighted by the absolute value difference.

use crate::{Result, edge::Edge, edge::EdgeList, error::SegmentError};

/// Dimensions of a voxel volume. A 2D image has `z == 1`.
///
/// # Examples
/// ```
/// use regionseg_core::VolumeShape;
///
/// let shape = VolumeShape::new(4, 3, 2);
/// assert_eq!(shape.len(), 24);
/// assert_eq!(shape.index(1, 2, 1), 21);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeShape {
    x: usize,
    y: usize,
    z: usize,
}

impl VolumeShape {
    /// Creates a shape from its three extents.
    #[must_use]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Creates a single-slice shape.
    #[must_use]
    pub const fn planar(x: usize, y: usize) -> Self {
        Self::new(x, y, 1)
    }

    /// Returns the extent along x.
    #[must_use]
    #[rustfmt::skip]
    pub const fn x(&self) -> usize { self.x }

    /// Returns the extent along y.
    #[must_use]
    #[rustfmt::skip]
    pub const fn y(&self) -> usize { self.y }

    /// Returns the extent along z.
    #[must_use]
    #[rustfmt::skip]
    pub const fn z(&self) -> usize { self.z }

    /// Returns the number of voxels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.x * self.y * self.z
    }

    /// Returns `true` when any extent is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the linear index of voxel `(x, y, z)`.
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.x * (y + self.y * z)
    }
}

/// Which neighbouring voxels share an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Connectivity {
    /// Voxels sharing a face: 4 neighbours in 2D, 6 in 3D.
    #[default]
    Face,
    /// Voxels sharing a face, edge or corner: 8 neighbours in 2D, 26 in 3D.
    Full,
}

/// Forward offsets `(dx, dy, dz)` sharing a face.
const FACE_OFFSETS: [(isize, isize, isize); 3] = [(1, 0, 0), (0, 1, 0), (0, 0, 1)];

/// Forward offsets `(dx, dy, dz)` for full connectivity: the 13 offsets whose
/// `(dz, dy, dx)` is lexicographically positive.
const FULL_OFFSETS: [(isize, isize, isize); 13] = [
    (1, 0, 0),
    (-1, 1, 0),
    (0, 1, 0),
    (1, 1, 0),
    (-1, -1, 1),
    (0, -1, 1),
    (1, -1, 1),
    (-1, 0, 1),
    (0, 0, 1),
    (1, 0, 1),
    (-1, 1, 1),
    (0, 1, 1),
    (1, 1, 1),
];

impl Connectivity {
    fn offsets(self) -> &'static [(isize, isize, isize)] {
        match self {
            Self::Face => &FACE_OFFSETS,
            Self::Full => &FULL_OFFSETS,
        }
    }
}

/// Builds the neighbour edges of a voxel grid.
///
/// Edges are emitted in node-index order, and for each node in the fixed
/// offset order of `connectivity`, so the list is reproducible.
///
/// # Errors
/// Returns [`SegmentError::ShapeMismatch`] when `values.len()` differs from
/// `shape.len()`.
///
/// # Examples
/// ```
/// use regionseg_core::{Connectivity, VolumeShape, grid_edges};
///
/// let shape = VolumeShape::planar(2, 2);
/// let edges = grid_edges(shape, &[0.0, 1.0, 3.0, 6.0], Connectivity::Face)?;
/// let weights: Vec<f64> = edges.iter().map(|edge| edge.weight()).collect();
/// assert_eq!(weights, vec![1.0, 3.0, 5.0, 3.0]);
/// # Ok::<(), regionseg_core::SegmentError>(())
/// ```
pub fn grid_edges(
    shape: VolumeShape,
    values: &[f64],
    connectivity: Connectivity,
) -> Result<EdgeList> {
    if values.len() != shape.len() {
        return Err(SegmentError::ShapeMismatch {
            expected: shape.len(),
            actual: values.len(),
        });
    }

    let offsets = connectivity.offsets();
    let mut edges = EdgeList::with_capacity(shape.len() * offsets.len());
    for z in 0..shape.z {
        for y in 0..shape.y {
            for x in 0..shape.x {
                let source = shape.index(x, y, z);
                for &(dx, dy, dz) in offsets {
                    let Some(target) = neighbour(shape, (x, y, z), (dx, dy, dz)) else {
                        continue;
                    };
                    let weight = (values[source] - values[target]).abs();
                    edges.push(Edge::new(source, target, weight));
                }
            }
        }
    }
    Ok(edges)
}

fn neighbour(
    shape: VolumeShape,
    (x, y, z): (usize, usize, usize),
    (dx, dy, dz): (isize, isize, isize),
) -> Option<usize> {
    let nx = x.checked_add_signed(dx).filter(|&nx| nx < shape.x)?;
    let ny = y.checked_add_signed(dy).filter(|&ny| ny < shape.y)?;
    let nz = z.checked_add_signed(dz).filter(|&nz| nz < shape.z)?;
    Some(shape.index(nx, ny, nz))
}
