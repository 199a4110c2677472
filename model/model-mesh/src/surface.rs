//! A per-material indexed triangle surface with vertex deduplication.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use crate::Vertex;

/// An indexed triangle surface for a single material.
///
/// Vertices are stored in first-seen order, without duplicates; the
/// index list references them in triples, one triple per triangle. A
/// hash index over the vertices' bit patterns makes insertion
/// amortized O(1) and guarantees that component-wise-equal vertices
/// share one slot.
///
/// # Invariants
///
/// - every index is `< vertex_count()`,
/// - `indices().len() % 3 == 0`,
/// - indices are never reused or renumbered once issued.
///
/// Winding is by convention of the producer: surfaces built from a
/// source mesh carry its clockwise winding until the aggregation
/// pipeline re-emits them counter-clockwise (see
/// [`Model::add_surface`](crate::Model::add_surface)).
///
/// # Example
///
/// ```
/// use model_mesh::{Surface, Vertex};
/// use nalgebra::{Point3, Vector2, Vector3};
///
/// let v = Vertex::new(
///     Point3::origin(),
///     Vector3::x(),
///     Vector2::zeros(),
///     Vector3::new(1.0, 1.0, 1.0),
/// );
///
/// let mut surface = Surface::new("stone");
/// assert_eq!(surface.insert_vertex(v), 0);
/// assert_eq!(surface.insert_vertex(v), 0); // deduplicated
/// assert_eq!(surface.vertex_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Surface {
    material: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    // Maps each unique vertex to its slot in `vertices`
    index_for_vertex: HashMap<Vertex, u32>,
}

impl Surface {
    /// Create an empty surface for the given material.
    #[must_use]
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
            index_for_vertex: HashMap::new(),
        }
    }

    /// The material name this surface belongs to.
    #[must_use]
    pub fn material(&self) -> &str {
        &self.material
    }

    /// The deduplicated vertex array, in first-seen order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The triangle index list; each consecutive triple is one
    /// triangle.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of unique vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of complete triangles in the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the surface has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Insert a vertex, returning its stable index.
    ///
    /// If an identical vertex (bit-for-bit, see [`Vertex`]) was
    /// inserted before, its existing index is returned and the vertex
    /// list is untouched; otherwise the vertex is appended and the new
    /// index returned. The index list is not modified.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> u32 {
        match self.index_for_vertex.entry(vertex) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                #[allow(clippy::cast_possible_truncation)]
                // Truncation: vertex counts are limited to u32 by the format
                let index = self.vertices.len() as u32;
                slot.insert(index);
                self.vertices.push(vertex);
                index
            }
        }
    }

    /// Insert a vertex and append its index to the index list.
    ///
    /// This is the streaming builder entry point for producers that
    /// feed exploded per-corner records: every third call completes a
    /// triangle in the producer's winding.
    pub fn add_vertex(&mut self, vertex: Vertex) {
        let index = self.insert_vertex(vertex);
        self.indices.push(index);
    }

    /// Append a triangle's three indices.
    ///
    /// Crate-private so the index-validity invariant stays enforced by
    /// the aggregation pipeline.
    pub(crate) fn push_triangle(&mut self, triangle: [u32; 3]) {
        self.indices.extend_from_slice(&triangle);
    }
}
