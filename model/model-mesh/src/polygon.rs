//! A single pre-built triangle.

use crate::Vertex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle given as three complete vertices.
///
/// Used by the pre-built entry point
/// ([`Model::add_polygons`](crate::Model::add_polygons)) for callers
/// whose geometry is already in world space: no transform is applied
/// and the winding is taken as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    /// First corner.
    pub a: Vertex,
    /// Second corner.
    pub b: Vertex,
    /// Third corner.
    pub c: Vertex,
}

impl Polygon {
    /// Create a polygon from three corners.
    #[inline]
    #[must_use]
    pub const fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { a, b, c }
    }
}
