//! The export job: one indexed surface per material.

use std::collections::BTreeMap;

use model_math::Transform;
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::{Polygon, Surface, Vertex};

/// An export job accumulating one [`Surface`] per material.
///
/// Surfaces are keyed by material name and iterated in name order,
/// which keeps the serialized output reproducible across runs.
///
/// Geometry enters through two paths:
///
/// - [`Model::add_surface`] consumes a raw per-material triangle
///   stream, applies the mesh transform and winding correction, and
///   deduplicates vertices into the target surface;
/// - [`Model::add_polygons`] consumes pre-built world-space triangles
///   and performs only deduplication and index bookkeeping.
///
/// # Example
///
/// ```
/// use model_math::Transform;
/// use model_mesh::{Model, Surface, Vertex};
/// use nalgebra::{Point3, Vector2, Vector3};
///
/// let mut incoming = Surface::new("stone");
/// for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
///     incoming.add_vertex(Vertex::new(
///         Point3::new(x, y, 0.0),
///         Vector3::z(),
///         Vector2::zeros(),
///         Vector3::new(1.0, 1.0, 1.0),
///     ));
/// }
///
/// let mut model = Model::new();
/// model.add_surface(&incoming, &Transform::identity()).unwrap();
/// assert_eq!(model.surface_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    surfaces: BTreeMap<String, Surface>,
}

impl Model {
    /// Create an empty export job.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surfaces: BTreeMap::new(),
        }
    }

    /// Number of surfaces (distinct materials).
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surfaces have been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Look up a surface by material name.
    #[must_use]
    pub fn surface(&self, material: &str) -> Option<&Surface> {
        self.surfaces.get(material)
    }

    /// Iterate the surfaces in material name order.
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    fn ensure_surface(&mut self, material: &str) -> &mut Surface {
        self.surfaces
            .entry(material.to_owned())
            .or_insert_with(|| Surface::new(material))
    }

    /// Merge a raw per-material triangle stream into the job.
    ///
    /// Every incoming vertex is moved into world space — position
    /// through `local_to_world`, normal through its inverse transpose
    /// and re-normalized, texture coordinate and color untouched —
    /// and inserted through the dedup index of the target surface.
    /// Incoming triangles are wound clockwise; each triple
    /// `(i0, i1, i2)` is re-emitted as `(i2, i1, i0)` so the output is
    /// counter-clockwise. Repeated calls with the same material
    /// accumulate into one surface; returned indices are absolute, so
    /// no offsetting is needed.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidGeometry`] if the incoming index list
    ///   has fewer than 3 entries (the job is left untouched; other
    ///   materials are unaffected);
    /// - [`ModelError::VertexIndexOutOfBounds`] if an incoming index
    ///   references a missing vertex;
    /// - [`ModelError::Transform`] if `local_to_world` is singular.
    pub fn add_surface(
        &mut self,
        incoming: &Surface,
        local_to_world: &Transform,
    ) -> ModelResult<()> {
        let index_count = incoming.indices().len();
        if index_count < 3 {
            return Err(ModelError::InvalidGeometry { count: index_count });
        }

        let vertex_count = incoming.vertex_count();
        if let Some(&bad) = incoming
            .indices()
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(ModelError::VertexIndexOutOfBounds {
                index: bad,
                vertex_count,
            });
        }

        let normal_transform = local_to_world.normal_matrix()?;

        let surface = self.ensure_surface(incoming.material());

        // Transform each incoming vertex once, recording where it
        // landed in the target surface
        let mut remapped = Vec::with_capacity(vertex_count);
        for vertex in incoming.vertices() {
            let position = local_to_world.transform_point(&vertex.position);
            let normal = normal_transform.transform_direction(&vertex.normal);
            let normal = normal.try_normalize(f64::EPSILON).unwrap_or(normal);
            remapped.push(surface.insert_vertex(Vertex::new(
                position,
                normal,
                vertex.texcoord,
                vertex.color,
            )));
        }

        for triangle in incoming.indices().chunks_exact(3) {
            surface.push_triangle([
                remapped[triangle[2] as usize],
                remapped[triangle[1] as usize],
                remapped[triangle[0] as usize],
            ]);
        }

        debug!(
            material = incoming.material(),
            vertices = surface.vertex_count(),
            triangles = surface.triangle_count(),
            "accumulated surface"
        );
        Ok(())
    }

    /// Add pre-built world-space triangles to a material's surface.
    ///
    /// No transform is applied and the winding is taken as-is; only
    /// deduplication and index bookkeeping happen here.
    pub fn add_polygons(&mut self, material: &str, polygons: &[Polygon]) {
        let surface = self.ensure_surface(material);

        for polygon in polygons {
            let a = surface.insert_vertex(polygon.a);
            let b = surface.insert_vertex(polygon.b);
            let c = surface.insert_vertex(polygon.c);
            surface.push_triangle([a, b, c]);
        }

        debug!(
            material,
            polygons = polygons.len(),
            vertices = surface.vertex_count(),
            "added pre-built polygons"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector2, Vector3};

    fn vertex_at(x: f64, y: f64, z: f64) -> Vertex {
        Vertex::new(
            Point3::new(x, y, z),
            Vector3::z(),
            Vector2::new(x, y),
            Vector3::new(1.0, 1.0, 1.0),
        )
    }

    fn triangle_surface(material: &str) -> Surface {
        let mut surface = Surface::new(material);
        surface.add_vertex(vertex_at(0.0, 0.0, 0.0));
        surface.add_vertex(vertex_at(1.0, 0.0, 0.0));
        surface.add_vertex(vertex_at(0.0, 1.0, 0.0));
        surface
    }

    #[test]
    fn winding_is_reversed() {
        let mut model = Model::new();
        model
            .add_surface(&triangle_surface("mat"), &Transform::identity())
            .unwrap();

        let surface = model.surface("mat").unwrap();
        assert_eq!(surface.indices(), &[2, 1, 0]);
    }

    #[test]
    fn short_index_list_is_rejected() {
        let mut surface = Surface::new("mat");
        surface.add_vertex(vertex_at(0.0, 0.0, 0.0));
        surface.add_vertex(vertex_at(1.0, 0.0, 0.0));

        let mut model = Model::new();
        let result = model.add_surface(&surface, &Transform::identity());
        assert!(matches!(
            result,
            Err(ModelError::InvalidGeometry { count: 2 })
        ));
        // A rejected surface contributes nothing
        assert!(model.is_empty());
    }

    #[test]
    fn singular_transform_is_rejected() {
        let mut model = Model::new();
        let squash = Transform::scale(1.0, 1.0, 0.0);
        let result = model.add_surface(&triangle_surface("mat"), &squash);
        assert!(matches!(result, Err(ModelError::Transform(_))));
        assert!(model.is_empty());
    }

    #[test]
    fn surfaces_accumulate_across_calls() {
        let mut model = Model::new();
        model
            .add_surface(&triangle_surface("mat"), &Transform::identity())
            .unwrap();

        // A second mesh sharing the material, offset so nothing dedups
        let mut second = Surface::new("mat");
        second.add_vertex(vertex_at(5.0, 0.0, 0.0));
        second.add_vertex(vertex_at(6.0, 0.0, 0.0));
        second.add_vertex(vertex_at(5.0, 1.0, 0.0));
        model.add_surface(&second, &Transform::identity()).unwrap();

        let surface = model.surface("mat").unwrap();
        assert_eq!(surface.vertex_count(), 6);
        assert_eq!(surface.indices(), &[2, 1, 0, 5, 4, 3]);
        assert_eq!(model.surface_count(), 1);
    }

    #[test]
    fn shared_quad_corners_deduplicate() {
        // Two triangles of a quad sharing the diagonal, fed as six
        // exploded corner records
        let (a, b, c, d) = (
            vertex_at(0.0, 0.0, 0.0),
            vertex_at(1.0, 0.0, 0.0),
            vertex_at(1.0, 1.0, 0.0),
            vertex_at(0.0, 1.0, 0.0),
        );
        let mut quad = Surface::new("mat");
        for corner in [a, b, c, a, c, d] {
            quad.add_vertex(corner);
        }

        let mut model = Model::new();
        model.add_surface(&quad, &Transform::identity()).unwrap();

        let surface = model.surface("mat").unwrap();
        assert_eq!(surface.vertex_count(), 4);
        assert_eq!(surface.indices().len(), 6);
        assert_eq!(surface.indices(), &[2, 1, 0, 3, 2, 0]);
    }

    #[test]
    fn materials_stay_separate_and_ordered() {
        let mut model = Model::new();
        model
            .add_surface(&triangle_surface("b_metal"), &Transform::identity())
            .unwrap();
        model
            .add_surface(&triangle_surface("a_stone"), &Transform::identity())
            .unwrap();

        assert_eq!(model.surface_count(), 2);
        let names: Vec<&str> = model.surfaces().map(Surface::material).collect();
        assert_eq!(names, vec!["a_stone", "b_metal"]);
        for surface in model.surfaces() {
            assert_eq!(surface.vertex_count(), 3);
        }
    }

    #[test]
    fn positions_are_transformed_normals_renormalized() {
        let mut incoming = Surface::new("mat");
        incoming.add_vertex(vertex_at(1.0, 0.0, 0.0));
        incoming.add_vertex(vertex_at(0.0, 1.0, 0.0));
        incoming.add_vertex(vertex_at(0.0, 0.0, 1.0));

        let t = Transform::translation(10.0, 0.0, 0.0)
            .multiplied_by(&Transform::scale(2.0, 1.0, 1.0));

        let mut model = Model::new();
        model.add_surface(&incoming, &t).unwrap();

        let surface = model.surface("mat").unwrap();
        let v0 = &surface.vertices()[0];
        assert_relative_eq!(v0.position.x, 12.0, epsilon = 1e-12);

        // Normals stay unit-length under the non-uniform scale
        for vertex in surface.vertices() {
            assert_relative_eq!(vertex.normal.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn texcoord_and_color_pass_through() {
        let mut incoming = Surface::new("mat");
        let mut v = vertex_at(1.0, 2.0, 3.0);
        v.texcoord = Vector2::new(0.25, 0.75);
        v.color = Vector3::new(0.1, 0.2, 0.3);
        incoming.add_vertex(v);
        incoming.add_vertex(vertex_at(1.0, 0.0, 0.0));
        incoming.add_vertex(vertex_at(0.0, 1.0, 0.0));

        let mut model = Model::new();
        model
            .add_surface(&incoming, &Transform::uniform_scale(3.0))
            .unwrap();

        let first = &model.surface("mat").unwrap().vertices()[0];
        assert_eq!(first.texcoord, Vector2::new(0.25, 0.75));
        assert_eq!(first.color, Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let mut surface = triangle_surface("mat");
        surface.push_triangle([0, 1, 9]);

        let mut model = Model::new();
        let result = model.add_surface(&surface, &Transform::identity());
        assert!(matches!(
            result,
            Err(ModelError::VertexIndexOutOfBounds { index: 9, .. })
        ));
    }

    #[test]
    fn polygons_dedup_without_transform() {
        let (a, b, c, d) = (
            vertex_at(0.0, 0.0, 0.0),
            vertex_at(1.0, 0.0, 0.0),
            vertex_at(1.0, 1.0, 0.0),
            vertex_at(0.0, 1.0, 0.0),
        );

        let mut model = Model::new();
        model.add_polygons("mat", &[Polygon::new(a, b, c), Polygon::new(a, c, d)]);

        let surface = model.surface("mat").unwrap();
        assert_eq!(surface.vertex_count(), 4);
        // Winding untouched for pre-built polygons
        assert_eq!(surface.indices(), &[0, 1, 2, 0, 2, 3]);
    }
}
