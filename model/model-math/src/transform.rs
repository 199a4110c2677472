//! 4x4 affine transform over `f64`.
//!
//! Column-vector convention: a transform is applied to a point as
//! `M * p`, so `a.multiplied_by(&b)` applies `b` first and `a` second.

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::error::{TransformError, TransformResult};

/// Determinants below this magnitude are treated as singular when
/// deriving the normal matrix.
const SINGULAR_DET_EPSILON: f64 = 1e-12;

/// `cos(pitch)` threshold below which the Euler decomposition switches
/// to the gimbal-lock branch.
const GIMBAL_LOCK_THRESHOLD: f64 = 0.005;

/// A 3D affine transform represented as a 4x4 matrix.
///
/// Wraps a `nalgebra::Matrix4<f64>` and provides the operations the
/// export pipeline needs: composition, affine and full inversion,
/// point/direction/homogeneous transforms, Euler angle construction
/// and decomposition, and the normal-matrix derivation.
///
/// # Example
///
/// ```
/// use model_math::Transform;
/// use nalgebra::Point3;
///
/// let t = Transform::translation(1.0, 2.0, 3.0);
/// let p = t.transform_point(&Point3::origin());
/// assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The 4x4 matrix, column-major storage.
    matrix: Matrix4<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform from a 4x4 matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transform.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(tx, ty, tz)),
        }
    }

    /// Create a translation from a vector.
    #[must_use]
    pub fn from_translation(v: Vector3<f64>) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    /// Create a non-uniform scaling transform.
    #[must_use]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)),
        }
    }

    /// Create a uniform scaling transform.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self::scale(factor, factor, factor)
    }

    /// Create a rotation around the X axis (angle in radians).
    #[must_use]
    pub fn rotation_x(angle: f64) -> Self {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            1.0,   0.0,    0.0, 0.0,
            0.0, cos_a, -sin_a, 0.0,
            0.0, sin_a,  cos_a, 0.0,
            0.0,   0.0,    0.0, 1.0,
        );
        Self { matrix }
    }

    /// Create a rotation around the Y axis (angle in radians).
    #[must_use]
    pub fn rotation_y(angle: f64) -> Self {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
             cos_a, 0.0, sin_a, 0.0,
               0.0, 1.0,   0.0, 0.0,
            -sin_a, 0.0, cos_a, 0.0,
               0.0, 0.0,   0.0, 1.0,
        );
        Self { matrix }
    }

    /// Create a rotation around the Z axis (angle in radians).
    #[must_use]
    pub fn rotation_z(angle: f64) -> Self {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            cos_a, -sin_a, 0.0, 0.0,
            sin_a,  cos_a, 0.0, 0.0,
              0.0,    0.0, 1.0, 0.0,
              0.0,    0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// Create a rotation from Euler angles in radians, applied in
    /// X, Y, Z order: the result is `Rz * Ry * Rx`.
    #[must_use]
    pub fn euler_xyz(angles: Vector3<f64>) -> Self {
        Self::rotation_z(angles.z)
            .multiplied_by(&Self::rotation_y(angles.y))
            .multiplied_by(&Self::rotation_x(angles.x))
    }

    /// Create a rotation from Euler angles in degrees, X, Y, Z order.
    #[must_use]
    pub fn euler_xyz_degrees(angles: Vector3<f64>) -> Self {
        Self::euler_xyz(Vector3::new(
            angles.x.to_radians(),
            angles.y.to_radians(),
            angles.z.to_radians(),
        ))
    }

    /// Create a rotation around an arbitrary axis using Rodrigues'
    /// rotation formula.
    ///
    /// The axis is normalized; a zero axis yields the identity.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    // Single-char names: standard mathematical notation for the formula
    #[allow(clippy::suboptimal_flops)]
    // Suboptimal flops: prefer the readable Rodrigues terms over mul_add
    pub fn rotation_axis(axis: Vector3<f64>, angle: f64) -> Self {
        let norm = axis.norm();
        if norm < f64::EPSILON {
            return Self::identity();
        }

        let axis = axis / norm;
        let c = angle.cos();
        let s = angle.sin();
        let t = 1.0 - c;

        let x = axis.x;
        let y = axis.y;
        let z = axis.z;

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            t*x*x + c,     t*x*y - s*z,   t*x*z + s*y,   0.0,
            t*x*y + s*z,   t*y*y + c,     t*y*z - s*x,   0.0,
            t*x*z - s*y,   t*y*z + s*x,   t*z*z + c,     0.0,
            0.0,           0.0,           0.0,           1.0,
        );
        Self { matrix }
    }

    /// Create a rotation that maps the direction `from` onto `to`.
    ///
    /// The axis is the normalized cross product, the angle the arc
    /// cosine of the normalized dot product. Parallel inputs yield the
    /// identity; antiparallel inputs rotate half a turn around an
    /// arbitrary perpendicular axis. A zero-length input yields the
    /// identity. Never produces NaN.
    #[must_use]
    pub fn rotation_between(from: Vector3<f64>, to: Vector3<f64>) -> Self {
        let from_norm = from.norm();
        let to_norm = to.norm();

        if from_norm < f64::EPSILON || to_norm < f64::EPSILON {
            return Self::identity();
        }

        let from = from / from_norm;
        let to = to / to_norm;

        let dot = from.dot(&to);

        if dot > 1.0 - f64::EPSILON {
            return Self::identity();
        }

        if dot < -1.0 + f64::EPSILON {
            // Half turn: any axis perpendicular to `from` works
            let axis = if from.x.abs() < 0.9 {
                Vector3::x().cross(&from).normalize()
            } else {
                Vector3::y().cross(&from).normalize()
            };
            return Self::rotation_axis(axis, std::f64::consts::PI);
        }

        let axis = from.cross(&to);
        let angle = dot.acos();
        Self::rotation_axis(axis, angle)
    }

    /// Get the underlying 4x4 matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Get the translation column as a vector.
    #[must_use]
    pub fn translation_part(&self) -> Vector3<f64> {
        Vector3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    /// Compose with another transform, applying `other` first:
    /// `a.multiplied_by(&b)` transforms a point like `a(b(p))`.
    ///
    /// Associative, not commutative.
    #[must_use]
    pub fn multiplied_by(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Compose with another transform, applying `self` first:
    /// `a.premultiplied_by(&b)` transforms a point like `b(a(p))`.
    #[must_use]
    pub fn premultiplied_by(&self, other: &Self) -> Self {
        other.multiplied_by(self)
    }

    /// Return the transposed matrix.
    #[must_use]
    pub fn transposed(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// Invert an affine transform via the cofactor method on the upper
    /// 3x3 block, deriving the translation as `-R⁻¹·t`.
    ///
    /// The caller must guarantee the upper 3x3 block is invertible; a
    /// singular block yields an undefined (division-by-near-zero)
    /// result. Use [`Transform::normal_matrix`] where singularity must
    /// be detected.
    #[must_use]
    pub fn affine_inverse(&self) -> Self {
        let m = &self.matrix;

        // Cofactors of the rotation/scale block
        let r00 = m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
        let r01 = -(m[(0, 1)] * m[(2, 2)] - m[(0, 2)] * m[(2, 1)]);
        let r02 = m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)];
        let r10 = -(m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)]);
        let r11 = m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)];
        let r12 = -(m[(0, 0)] * m[(1, 2)] - m[(0, 2)] * m[(1, 0)]);
        let r20 = m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)];
        let r21 = -(m[(0, 0)] * m[(2, 1)] - m[(0, 1)] * m[(2, 0)]);
        let r22 = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];

        let det = m[(0, 0)] * r00 + m[(0, 1)] * r10 + m[(0, 2)] * r20;
        let inv = 1.0 / det;

        let (r00, r01, r02) = (r00 * inv, r01 * inv, r02 * inv);
        let (r10, r11, r12) = (r10 * inv, r11 * inv, r12 * inv);
        let (r20, r21, r22) = (r20 * inv, r21 * inv, r22 * inv);

        let (tx, ty, tz) = (m[(0, 3)], m[(1, 3)], m[(2, 3)]);

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            r00, r01, r02, -(r00 * tx + r01 * ty + r02 * tz),
            r10, r11, r12, -(r10 * tx + r11 * ty + r12 * tz),
            r20, r21, r22, -(r20 * tx + r21 * ty + r22 * tz),
            0.0, 0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// The 2x2 subfactors shared by the determinant and the adjugate.
    ///
    /// `s` covers the top two rows, `c` the bottom two.
    fn cofactor_pairs(&self) -> ([f64; 6], [f64; 6]) {
        let m = &self.matrix;
        let s = [
            m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
            m[(0, 0)] * m[(1, 2)] - m[(0, 2)] * m[(1, 0)],
            m[(0, 0)] * m[(1, 3)] - m[(0, 3)] * m[(1, 0)],
            m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
            m[(0, 1)] * m[(1, 3)] - m[(0, 3)] * m[(1, 1)],
            m[(0, 2)] * m[(1, 3)] - m[(0, 3)] * m[(1, 2)],
        ];
        let c = [
            m[(2, 0)] * m[(3, 1)] - m[(2, 1)] * m[(3, 0)],
            m[(2, 0)] * m[(3, 2)] - m[(2, 2)] * m[(3, 0)],
            m[(2, 0)] * m[(3, 3)] - m[(2, 3)] * m[(3, 0)],
            m[(2, 1)] * m[(3, 2)] - m[(2, 2)] * m[(3, 1)],
            m[(2, 1)] * m[(3, 3)] - m[(2, 3)] * m[(3, 1)],
            m[(2, 2)] * m[(3, 3)] - m[(2, 3)] * m[(3, 2)],
        ];
        (s, c)
    }

    /// The determinant of the full 4x4 matrix.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let ([s0, s1, s2, s3, s4, s5], [c0, c1, c2, c3, c4, c5]) = self.cofactor_pairs();
        s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
    }

    /// Invert the full 4x4 matrix via the adjugate/determinant method.
    ///
    /// Not restricted to affine matrices. The caller must guarantee the
    /// matrix is invertible; a singular matrix yields an undefined
    /// (division-by-near-zero) result. Use
    /// [`Transform::normal_matrix`] where singularity must be detected.
    #[must_use]
    pub fn full_inverse(&self) -> Self {
        let m = &self.matrix;
        let ([s0, s1, s2, s3, s4, s5], [c0, c1, c2, c3, c4, c5]) = self.cofactor_pairs();

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        let inv = 1.0 / det;

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            ( m[(1, 1)] * c5 - m[(1, 2)] * c4 + m[(1, 3)] * c3) * inv,
            (-m[(0, 1)] * c5 + m[(0, 2)] * c4 - m[(0, 3)] * c3) * inv,
            ( m[(3, 1)] * s5 - m[(3, 2)] * s4 + m[(3, 3)] * s3) * inv,
            (-m[(2, 1)] * s5 + m[(2, 2)] * s4 - m[(2, 3)] * s3) * inv,
            (-m[(1, 0)] * c5 + m[(1, 2)] * c2 - m[(1, 3)] * c1) * inv,
            ( m[(0, 0)] * c5 - m[(0, 2)] * c2 + m[(0, 3)] * c1) * inv,
            (-m[(3, 0)] * s5 + m[(3, 2)] * s2 - m[(3, 3)] * s1) * inv,
            ( m[(2, 0)] * s5 - m[(2, 2)] * s2 + m[(2, 3)] * s1) * inv,
            ( m[(1, 0)] * c4 - m[(1, 1)] * c2 + m[(1, 3)] * c0) * inv,
            (-m[(0, 0)] * c4 + m[(0, 1)] * c2 - m[(0, 3)] * c0) * inv,
            ( m[(3, 0)] * s4 - m[(3, 1)] * s2 + m[(3, 3)] * s0) * inv,
            (-m[(2, 0)] * s4 + m[(2, 1)] * s2 - m[(2, 3)] * s0) * inv,
            (-m[(1, 0)] * c3 + m[(1, 1)] * c1 - m[(1, 2)] * c0) * inv,
            ( m[(0, 0)] * c3 - m[(0, 1)] * c1 + m[(0, 2)] * c0) * inv,
            (-m[(3, 0)] * s3 + m[(3, 1)] * s1 - m[(3, 2)] * s0) * inv,
            ( m[(2, 0)] * s3 - m[(2, 1)] * s1 + m[(2, 2)] * s0) * inv,
        );
        Self { matrix }
    }

    /// Derive the normal matrix `transpose(inverse(T))`.
    ///
    /// Normals must be transformed by the inverse transpose so they
    /// stay perpendicular to their surface under non-uniform scale.
    /// The translation column of the result is irrelevant; transform
    /// normals with [`Transform::transform_direction`] and
    /// re-normalize.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] if the determinant is too
    /// close to zero for the inverse to be meaningful.
    pub fn normal_matrix(&self) -> TransformResult<Self> {
        let determinant = self.determinant();
        if determinant.abs() < SINGULAR_DET_EPSILON {
            return Err(TransformError::Singular { determinant });
        }
        Ok(self.full_inverse().transposed())
    }

    /// Transform a point (implicit fourth coordinate 1; receives the
    /// translation).
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let p = Vector4::new(point.x, point.y, point.z, 1.0);
        let result = self.matrix * p;
        Point3::new(result.x, result.y, result.z)
    }

    /// Transform a direction (implicit fourth coordinate 0; ignores the
    /// translation).
    #[must_use]
    pub fn transform_direction(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        let v = Vector4::new(direction.x, direction.y, direction.z, 0.0);
        let result = self.matrix * v;
        Vector3::new(result.x, result.y, result.z)
    }

    /// Transform a homogeneous 4-component vector.
    #[must_use]
    pub fn transform(&self, vector: Vector4<f64>) -> Vector4<f64> {
        self.matrix * vector
    }

    /// Recover Euler angles in radians (X, Y, Z application order) from
    /// the rotation component.
    ///
    /// The matrix must be affine and orthonormal for the result to be
    /// meaningful. Near the gimbal-lock configuration (pitch close to
    /// ±90°) the decomposition is not unique; the canonical choice
    /// folds the roll into the X angle and sets the Z angle to zero.
    #[must_use]
    pub fn euler_angles_xyz(&self) -> Vector3<f64> {
        let m = &self.matrix;
        let pitch = (-m[(2, 0)]).clamp(-1.0, 1.0).asin();
        let cos_pitch = pitch.cos();

        if cos_pitch.abs() > GIMBAL_LOCK_THRESHOLD {
            Vector3::new(
                (m[(2, 1)] / cos_pitch).atan2(m[(2, 2)] / cos_pitch),
                pitch,
                (m[(1, 0)] / cos_pitch).atan2(m[(0, 0)] / cos_pitch),
            )
        } else {
            // Gimbal lock: only the sum/difference of roll and yaw is
            // observable, fold everything into the X angle
            Vector3::new((-m[(1, 2)]).atan2(m[(1, 1)]), pitch, 0.0)
        }
    }

    /// Recover Euler angles in degrees (X, Y, Z application order).
    #[must_use]
    pub fn euler_angles_xyz_degrees(&self) -> Vector3<f64> {
        let radians = self.euler_angles_xyz();
        Vector3::new(
            radians.x.to_degrees(),
            radians.y.to_degrees(),
            radians.z.to_degrees(),
        )
    }
}
