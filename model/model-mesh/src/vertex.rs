//! Mesh vertex with full attribute set and bit-exact identity.

use nalgebra::{Point3, Vector2, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mesh vertex: position, normal, texture coordinate and color.
///
/// All attributes are `f64`. Immutable by convention once created —
/// the export pipeline never mutates a vertex, it replaces it.
///
/// # Identity
///
/// Two vertices are *identical* iff every component of all four
/// attributes is bit-for-bit equal. `PartialEq`, `Eq` and `Hash` are
/// implemented over the raw bit patterns, so:
///
/// - `0.0` and `-0.0` are **different** vertices,
/// - a `NaN` component equals itself (which keeps `Eq` lawful),
/// - there is no epsilon: geometrically-equal vertices that differ in
///   the last bit do not merge.
///
/// Identity, not similarity, drives deduplication — switching to
/// tolerance-based merging would change output topology.
///
/// # Example
///
/// ```
/// use model_mesh::Vertex;
/// use nalgebra::{Point3, Vector2, Vector3};
///
/// let v = Vertex::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Vector3::new(0.0, 0.0, 1.0),
///     Vector2::new(0.5, 0.5),
///     Vector3::new(1.0, 1.0, 1.0),
/// );
/// assert_eq!(v, v);
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Normal vector. Unit length by convention; not enforced here.
    pub normal: Vector3<f64>,

    /// Texture coordinate (U, V).
    pub texcoord: Vector2<f64>,

    /// RGB color in the [0, 1] range.
    pub color: Vector3<f64>,
}

impl Vertex {
    /// Create a vertex from all four attributes.
    #[inline]
    #[must_use]
    pub const fn new(
        position: Point3<f64>,
        normal: Vector3<f64>,
        texcoord: Vector2<f64>,
        color: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            normal,
            texcoord,
            color,
        }
    }

    /// The raw bit patterns of all eleven components, in a fixed
    /// order. Equality and hashing both go through this, which keeps
    /// them consistent by construction.
    fn bit_pattern(&self) -> [u64; 11] {
        [
            self.position.x.to_bits(),
            self.position.y.to_bits(),
            self.position.z.to_bits(),
            self.normal.x.to_bits(),
            self.normal.y.to_bits(),
            self.normal.z.to_bits(),
            self.texcoord.x.to_bits(),
            self.texcoord.y.to_bits(),
            self.color.x.to_bits(),
            self.color.y.to_bits(),
            self.color.z.to_bits(),
        ]
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.bit_pattern() == other.bit_pattern()
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bit_pattern().hash(state);
    }
}
