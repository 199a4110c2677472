//! Error types for surface aggregation.

use model_math::TransformError;
use thiserror::Error;

/// Result type for surface aggregation operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building the export job.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The incoming index list cannot form a single triangle.
    ///
    /// Recoverable: the caller may skip this surface and continue with
    /// other materials.
    #[error("surface index list has {count} indices, at least 3 are required")]
    InvalidGeometry {
        /// Number of indices supplied.
        count: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("vertex index {index} is out of bounds for {vertex_count} vertices")]
    VertexIndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// A triangle references a material that does not exist.
    #[error("material index {index} is out of bounds for {material_count} materials")]
    MaterialIndexOutOfBounds {
        /// The offending index.
        index: u32,
        /// Number of materials available.
        material_count: usize,
    },

    /// The mesh transform cannot be inverted for the normal matrix.
    ///
    /// Fatal for the mesh being added; surfaces already merged into
    /// the job are unaffected.
    #[error(transparent)]
    Transform(#[from] TransformError),
}
