//! Owned scene-source data: what the upstream scene library hands us.
//!
//! The export pipeline does not parse scene files itself; the parsing
//! layer fills a [`SceneMesh`] per mesh and passes it in. Attribute
//! channels may be absent, in which case fixed defaults are
//! substituted per corner.

use model_math::Transform;
use nalgebra::{Point3, Vector2, Vector3};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::{Surface, Vertex};

/// Material name used when a mesh defines no materials at all.
pub const FALLBACK_MATERIAL: &str = "Material";

/// Which axis points up in the source scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpAxis {
    /// X is up.
    X,
    /// Y is up (the common interchange default).
    Y,
    /// Z is up (the target convention; no correction needed).
    Z,
}

impl UpAxis {
    /// The correction rotation to pre-multiply onto a mesh transform.
    ///
    /// Y-up scenes are tipped into the Z-up target convention with a
    /// quarter turn about X; other axes pass through unchanged.
    #[must_use]
    pub fn correction(self) -> Transform {
        match self {
            Self::Y => Transform::euler_xyz_degrees(Vector3::new(90.0, 0.0, 0.0)),
            Self::X | Self::Z => Transform::identity(),
        }
    }
}

/// One triangulated mesh as exposed by the scene source.
///
/// `triangles` is a flat index list into the attribute arrays, three
/// indices per triangle, wound clockwise. `triangle_materials` gives
/// a material index per triangle; when absent, every triangle goes to
/// the first material. `normals`, `uvs` and `colors` are optional
/// channels addressed by the same indices as `positions`.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Per-vertex normals, if the channel exists.
    pub normals: Option<Vec<Vector3<f64>>>,

    /// Per-vertex texture coordinates, if the channel exists.
    /// V is in the source convention and flipped on import.
    pub uvs: Option<Vec<Vector2<f64>>>,

    /// Per-vertex colors, if the channel exists.
    pub colors: Option<Vec<Vector3<f64>>>,

    /// Flat triangle index list, clockwise winding.
    pub triangles: Vec<u32>,

    /// Material index per triangle; absent means everything belongs
    /// to the first material.
    pub triangle_materials: Option<Vec<u32>>,

    /// Material names referenced by `triangle_materials`.
    pub materials: Vec<String>,
}

impl SceneMesh {
    /// Build the vertex record for one corner index, substituting
    /// defaults for absent channels: normal `(1, 0, 0)`, UV `(0, 0)`,
    /// color `(1, 1, 1)`. The V coordinate is flipped (`1 - v`) to
    /// match the target texture convention.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::VertexIndexOutOfBounds`] if `index` does
    /// not address a position.
    pub fn corner_vertex(&self, index: u32) -> ModelResult<Vertex> {
        let slot = index as usize;
        let position = self.positions.get(slot).copied().ok_or_else(|| {
            ModelError::VertexIndexOutOfBounds {
                index,
                vertex_count: self.positions.len(),
            }
        })?;

        let normal = self
            .normals
            .as_ref()
            .and_then(|channel| channel.get(slot))
            .copied()
            .unwrap_or_else(Vector3::x);

        let texcoord = self
            .uvs
            .as_ref()
            .and_then(|channel| channel.get(slot))
            .map_or_else(Vector2::zeros, |uv| Vector2::new(uv.x, 1.0 - uv.y));

        let color = self
            .colors
            .as_ref()
            .and_then(|channel| channel.get(slot))
            .copied()
            .unwrap_or_else(|| Vector3::new(1.0, 1.0, 1.0));

        Ok(Vertex::new(position, normal, texcoord, color))
    }

    /// Bucket the mesh's triangles into one [`Surface`] per material.
    ///
    /// A mesh without materials gets a single surface named
    /// [`FALLBACK_MATERIAL`]. Surfaces come back in material-slot
    /// order, including empty ones for unused materials. A trailing
    /// partial triangle (index count not divisible by 3) is ignored.
    ///
    /// # Errors
    ///
    /// - [`ModelError::VertexIndexOutOfBounds`] for a corner index
    ///   with no position;
    /// - [`ModelError::MaterialIndexOutOfBounds`] for a triangle
    ///   assigned to a material slot that does not exist.
    pub fn split_by_material(&self) -> ModelResult<Vec<Surface>> {
        let mut surfaces: Vec<Surface> = if self.materials.is_empty() {
            vec![Surface::new(FALLBACK_MATERIAL)]
        } else {
            self.materials
                .iter()
                .map(|name| Surface::new(name.clone()))
                .collect()
        };
        let material_count = surfaces.len();

        for (triangle_index, corners) in self.triangles.chunks_exact(3).enumerate() {
            let material_index = self
                .triangle_materials
                .as_ref()
                .and_then(|channel| channel.get(triangle_index))
                .copied()
                .unwrap_or(0);

            let surface = surfaces.get_mut(material_index as usize).ok_or(
                ModelError::MaterialIndexOutOfBounds {
                    index: material_index,
                    material_count,
                },
            )?;

            for &corner in corners {
                surface.add_vertex(self.corner_vertex(corner)?);
            }
        }

        debug!(
            triangles = self.triangles.len() / 3,
            surfaces = surfaces.len(),
            "split mesh by material"
        );
        Ok(surfaces)
    }
}
