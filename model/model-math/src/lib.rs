//! Transform algebra for the model export pipeline.
//!
//! This crate provides the 4x4 affine [`Transform`] type used to move
//! mesh geometry from local into world space during export:
//!
//! - composition (post- and pre-multiplication)
//! - affine (cofactor) and full (adjugate) inversion
//! - point, direction and homogeneous transforms
//! - Euler-XYZ construction and gimbal-lock-safe decomposition
//! - axis-angle and vector-to-vector rotation constructors
//! - the inverse-transpose normal matrix, with singularity detection
//!
//! Vector and point types come from [`nalgebra`]; this crate only adds
//! the operations the exporters need on top of `Matrix4<f64>`.
//!
//! # Example
//!
//! ```
//! use model_math::Transform;
//! use nalgebra::{Point3, Vector3};
//!
//! let t = Transform::translation(0.0, 0.0, 5.0)
//!     .multiplied_by(&Transform::uniform_scale(2.0));
//!
//! let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
//! assert_eq!(p, Point3::new(2.0, 0.0, 5.0));
//!
//! // Normals go through the inverse transpose
//! let normals = t.normal_matrix().unwrap();
//! let n = normals.transform_direction(&Vector3::z()).normalize();
//! assert!((n.z - 1.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod transform;

pub use error::{TransformError, TransformResult};
pub use transform::Transform;
