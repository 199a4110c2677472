//! Surface aggregation for the model export pipeline.
//!
//! This crate turns raw per-triangle vertex records, grouped by
//! material, into compact indexed surfaces ready for serialization:
//!
//! - [`Vertex`] - full-attribute vertex with bit-exact identity
//! - [`Surface`] - per-material indexed triangle list with vertex
//!   deduplication
//! - [`Model`] - the export job, one surface per material, applying
//!   the world transform and winding correction
//! - [`SceneMesh`] / [`UpAxis`] - the owned data a scene-parsing
//!   layer hands to the pipeline
//!
//! # Winding
//!
//! Source meshes arrive with **clockwise** triangles; everything a
//! [`Model`] emits is **counter-clockwise**. The conversion reverses
//! index order only; vertex data is never mirrored.
//!
//! # Example
//!
//! ```
//! use model_math::Transform;
//! use model_mesh::{Model, SceneMesh, UpAxis};
//! use nalgebra::Point3;
//!
//! let mesh = SceneMesh {
//!     positions: vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     triangles: vec![0, 1, 2],
//!     ..SceneMesh::default()
//! };
//!
//! let transform = Transform::identity().premultiplied_by(&UpAxis::Y.correction());
//!
//! let mut model = Model::new();
//! for surface in mesh.split_by_material().unwrap() {
//!     model.add_surface(&surface, &transform).unwrap();
//! }
//! assert_eq!(model.surface_count(), 1);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod model;
mod polygon;
mod scene;
mod surface;
mod vertex;

pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use polygon::Polygon;
pub use scene::{SceneMesh, UpAxis, FALLBACK_MATERIAL};
pub use surface::Surface;
pub use vertex::Vertex;
