//! Per-object affine transform — position, Euler rotation, and scale composed into cached
//! forward/reverse matrices, the same forward/reverse split every [`crate::object::Object`]
//! variant uses to move between object space (where its intersection math is simplest) and
//! world space (where rays actually live).

use crate::error::{EngineError, EngineResult};
use crate::math::{Mat4, Point3, Ray, Vec3};

/// Below this magnitude a scale component is treated as degenerate — it would collapse the
/// object to zero thickness along that axis and make the reverse transform singular.
const MIN_SCALE: f64 = 1e-8;

/// A position/rotation/scale transform with precomputed forward and reverse matrices.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    position: Point3,
    rotation: Vec3,
    scale: Vec3,
    forward: Mat4,
    reverse: Mat4,
    normal_matrix: Mat4,
}

impl Transform {
    /// Builds a transform from translation, Euler rotation (radians), and per-axis scale.
    /// Fails if any scale component is at or near zero.
    pub fn new(position: Point3, rotation: Vec3, scale: Vec3) -> EngineResult<Self> {
        if scale.x.abs() < MIN_SCALE || scale.y.abs() < MIN_SCALE || scale.z.abs() < MIN_SCALE {
            return Err(EngineError::invalid_argument(format!(
                "transform scale {scale} has a zero or near-zero component"
            )));
        }

        let r = Mat4::rotation(rotation);
        let s = Mat4::scaling(scale);
        let t = Mat4::translation(position);

        let forward = t.mul_mat(&r.mul_mat(&s));

        let inverse_scale = Vec3::new(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z);
        let inverse_rotation = transpose_linear(r);
        let inverse_translation = Mat4::translation(-position);
        let reverse = Mat4::scaling(inverse_scale)
            .mul_mat(&inverse_rotation)
            .mul_mat(&inverse_translation);

        // Normals transform by the inverse-transpose of the linear (rotation+scale) part; for
        // an orthogonal rotation that's `R · S⁻¹`.
        let normal_matrix = r.mul_mat(&Mat4::scaling(inverse_scale));

        Ok(Self {
            position,
            rotation,
            scale,
            forward,
            reverse,
            normal_matrix,
        })
    }

    pub fn identity() -> Self {
        Self::new(Point3::zero(), Vec3::zero(), Vec3::ones()).expect("unit scale is never zero")
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    pub fn point_to_world(&self, p: Point3) -> Point3 {
        self.forward.transform(p, true)
    }

    #[inline]
    pub fn direction_to_world(&self, d: Vec3) -> Vec3 {
        self.forward.transform(d, false)
    }

    #[inline]
    pub fn point_to_object(&self, p: Point3) -> Point3 {
        self.reverse.transform(p, true)
    }

    #[inline]
    pub fn direction_to_object(&self, d: Vec3) -> Vec3 {
        self.reverse.transform(d, false)
    }

    /// Transforms a surface normal from object space to world space, via the inverse-transpose
    /// of the linear part so non-uniform scale doesn't skew it off-perpendicular.
    #[inline]
    pub fn normal_to_world(&self, n: Vec3) -> Vec3 {
        self.normal_matrix.transform(n, false).unit()
    }

    /// Moves a ray from world space into this transform's object space.
    pub fn ray_to_object(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.point_to_object(ray.origin),
            self.direction_to_object(ray.direction),
        )
    }
}

/// Transposes the 3×3 linear block of a matrix with no translation component (a pure rotation
/// or rotation-like matrix), leaving the homogeneous row/column untouched.
fn transpose_linear(m: Mat4) -> Mat4 {
    let r = m.rows;
    Mat4::new([
        [r[0][0], r[1][0], r[2][0], 0.0],
        [r[0][1], r[1][1], r[2][1], 0.0],
        [r[0][2], r[1][2], r[2][2], 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_transform_is_a_no_op() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(t.point_to_world(p), p);
        assert_eq!(t.point_to_object(p), p);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let err = Transform::new(Point3::zero(), Vec3::zero(), Vec3::new(1.0, 0.0, 1.0));
        assert!(err.is_err());
    }

    #[test]
    fn world_and_object_space_round_trip() {
        let t = Transform::new(
            Point3::new(3.0, -1.0, 2.0),
            Vec3::new(0.2, 0.4, -0.1),
            Vec3::new(2.0, 0.5, 1.0),
        )
        .unwrap();
        let p = Point3::new(0.3, 0.7, -0.4);
        let world = t.point_to_world(p);
        let back = t.point_to_object(world);
        assert!((back - p).length() < 1e-9);
    }

    #[test]
    fn translation_only_moves_points_not_directions() {
        let t = Transform::new(Point3::new(5.0, 0.0, 0.0), Vec3::zero(), Vec3::ones()).unwrap();
        assert_eq!(t.point_to_world(Point3::zero()), Point3::new(5.0, 0.0, 0.0));
        assert_eq!(t.direction_to_world(Vec3::unit_x()), Vec3::unit_x());
    }

    #[test]
    fn rotation_preserves_normal_length_under_nonuniform_scale() {
        let t = Transform::new(
            Point3::zero(),
            Vec3::new(0.0, FRAC_PI_2, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
        )
        .unwrap();
        let n = t.normal_to_world(Vec3::unit_y());
        assert!((n.length() - 1.0).abs() < 1e-9);
    }
}
