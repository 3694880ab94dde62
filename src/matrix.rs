//! Composable 4×4 homogeneous transforms.
//!
//! [`Matrix4`] is a thin stateful wrapper over [`glam::Mat4`] with an authoring API
//! in the style of classic immediate-mode GL helpers: every operation post-multiplies
//! the stored matrix, so the **last** operation you call is the **first** one applied
//! to geometry.
//!
//! ```
//! use figurine::Matrix4;
//!
//! // Reads top to bottom as "move, then spin, then squash",
//! // but a vertex is squashed first and moved last.
//! let mut m = Matrix4::identity();
//! m.translate(1.0, 0.0, 0.0)
//!     .rotate(90.0, 0.0, 0.0, 1.0)
//!     .scale(2.0, 2.0, 2.0);
//! ```
//!
//! Entries are stored column-major, matching what the renderer uploads.

use std::ops::Mul;

use glam::{Mat4, Vec3};

/// A 4×4 affine transform built up from translate/rotate/scale calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    m: Mat4,
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    /// The identity transform.
    pub fn identity() -> Self {
        Self { m: Mat4::IDENTITY }
    }

    /// Wraps an existing glam matrix.
    pub fn from_mat4(m: Mat4) -> Self {
        Self { m }
    }

    /// Resets to the identity matrix.
    pub fn set_identity(&mut self) -> &mut Self {
        self.m = Mat4::IDENTITY;
        self
    }

    /// Composes a translation.
    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) -> &mut Self {
        self.m *= Mat4::from_translation(Vec3::new(tx, ty, tz));
        self
    }

    /// Composes a rotation of `angle_degrees` around `(ax, ay, az)`.
    ///
    /// The axis does not need to be unit length; it is normalized here.
    /// A zero-length axis leaves the matrix unchanged.
    pub fn rotate(&mut self, angle_degrees: f32, ax: f32, ay: f32, az: f32) -> &mut Self {
        if let Some(axis) = Vec3::new(ax, ay, az).try_normalize() {
            self.m *= Mat4::from_axis_angle(axis, angle_degrees.to_radians());
        }
        self
    }

    /// Composes a non-uniform scale.
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.m *= Mat4::from_scale(Vec3::new(sx, sy, sz));
        self
    }

    /// Overwrites the matrix with a pure scale.
    pub fn set_scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.m = Mat4::from_scale(Vec3::new(sx, sy, sz));
        self
    }

    /// Overwrites the matrix with a pure translation.
    pub fn set_translate(&mut self, tx: f32, ty: f32, tz: f32) -> &mut Self {
        self.m = Mat4::from_translation(Vec3::new(tx, ty, tz));
        self
    }

    /// The 16 entries in column-major order, ready for upload.
    pub fn elements(&self) -> [f32; 16] {
        self.m.to_cols_array()
    }

    /// Column arrays, the layout `bytemuck` uniform structs expect.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.m.to_cols_array_2d()
    }

    pub fn as_mat4(&self) -> Mat4 {
        self.m
    }

    /// Applies the transform to a point (w = 1).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.m.transform_point3(p)
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        Matrix4 { m: self.m * rhs.m }
    }
}

impl From<Mat4> for Matrix4 {
    fn from(m: Mat4) -> Self {
        Self { m }
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Self {
        m.m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn set_identity_is_exact() {
        let mut m = Matrix4::identity();
        m.translate(3.0, -2.0, 1.0).rotate(33.0, 1.0, 1.0, 0.0).scale(2.0, 4.0, 8.0);
        m.set_identity();
        assert_eq!(m.elements(), Mat4::IDENTITY.to_cols_array());
    }

    #[test]
    fn last_call_applies_first() {
        let mut m = Matrix4::identity();
        m.translate(1.0, 2.0, 3.0)
            .rotate(90.0, 0.0, 0.0, 1.0)
            .scale(2.0, 2.0, 2.0);

        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(90f32.to_radians())
            * Mat4::from_scale(Vec3::splat(2.0));

        let p = Vec3::new(1.0, 0.0, 0.0);
        assert!(approx(m.transform_point(p), expected.transform_point3(p)));
        // scale first -> (2,0,0), rotate -> (0,2,0), translate -> (1,4,3)
        assert!(approx(m.transform_point(p), Vec3::new(1.0, 4.0, 3.0)));
    }

    #[test]
    fn origin_follows_composition() {
        let mut m = Matrix4::identity();
        m.scale(0.3, 0.3, 0.5).translate(-0.5, -0.5, -0.5);
        assert!(approx(
            m.transform_point(Vec3::ZERO),
            Vec3::new(-0.15, -0.15, -0.25)
        ));

        let mut n = Matrix4::identity();
        n.rotate(-25.0, 1.0, 0.0, 0.0)
            .scale(0.18, 0.8, 0.18)
            .translate(-0.5, 0.0, -1.0);
        let expected = Mat4::from_rotation_x((-25f32).to_radians())
            * Mat4::from_scale(Vec3::new(0.18, 0.8, 0.18))
            * Mat4::from_translation(Vec3::new(-0.5, 0.0, -1.0));
        assert!(approx(
            n.transform_point(Vec3::ZERO),
            expected.transform_point3(Vec3::ZERO)
        ));
    }

    #[test]
    fn setters_overwrite() {
        let mut m = Matrix4::identity();
        m.rotate(45.0, 0.0, 1.0, 0.0).set_scale(2.0, 3.0, 4.0);
        assert_eq!(m.as_mat4(), Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0)));

        m.set_translate(1.0, 1.0, 1.0);
        assert_eq!(
            m.as_mat4(),
            Mat4::from_translation(Vec3::new(1.0, 1.0, 1.0))
        );
    }

    #[test]
    fn rotate_normalizes_axis() {
        let mut unit = Matrix4::identity();
        unit.rotate(30.0, 0.0, 1.0, 0.0);
        let mut long = Matrix4::identity();
        long.rotate(30.0, 0.0, 5.0, 0.0);

        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(approx(unit.transform_point(p), long.transform_point(p)));
    }

    #[test]
    fn zero_axis_is_noop() {
        let mut m = Matrix4::identity();
        m.translate(1.0, 0.0, 0.0);
        let before = m;
        m.rotate(90.0, 0.0, 0.0, 0.0);
        assert_eq!(m, before);
    }

    #[test]
    fn elements_are_column_major() {
        let mut m = Matrix4::identity();
        m.set_translate(7.0, 8.0, 9.0);
        let e = m.elements();
        assert_eq!(&e[12..15], &[7.0, 8.0, 9.0]);
    }
}
