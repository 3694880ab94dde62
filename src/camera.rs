use glam::Vec2;

use crate::matrix::Matrix4;

/// Degrees of rotation per unit of normalized pointer travel.
///
/// Dragging across the full ±1 range turns the view by ±120°.
pub const DRAG_DEGREES_PER_UNIT: f32 = 120.0;

/// Where the viewport sits in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect at the window origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// A drag-to-rotate camera.
///
/// The three Euler angles are the durable state. The rotation matrix is rebuilt
/// from them on every change (identity, then X, then Y, then Z) rather than
/// accumulated, so repeated small drags never drift.
///
/// # Example
/// ```
/// use figurine::Camera;
/// use glam::Vec2;
///
/// let mut camera = Camera::new();
/// camera.begin_drag(Vec2::ZERO);
/// camera.drag_to(Vec2::new(1.0, 0.0));
/// assert_eq!(camera.angles().y, -120.0);
/// ```
#[derive(Clone, Debug)]
pub struct Camera {
    /// Rotation around X in degrees. Applied negated.
    pub angle_x: f32,
    /// Rotation around Y in degrees.
    pub angle_y: f32,
    /// Rotation around Z in degrees. Pointer input never changes it.
    pub angle_z: f32,
    /// Degrees per unit of normalized pointer travel.
    pub sensitivity: f32,
    last: Vec2,
    matrix: Matrix4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            sensitivity: DRAG_DEGREES_PER_UNIT,
            last: Vec2::ZERO,
            matrix: Matrix4::identity(),
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the drag sensitivity in degrees per normalized unit.
    pub fn sensitivity(mut self, degrees_per_unit: f32) -> Self {
        self.sensitivity = degrees_per_unit;
        self
    }

    /// Maps device pixel coordinates into the ±1 frame centered on the viewport.
    ///
    /// Y is flipped: moving the pointer up the screen increases y.
    pub fn pointer_to_frame(
        raw_x: f32,
        raw_y: f32,
        rect: Rect,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Vec2 {
        let half_w = viewport_width / 2.0;
        let half_h = viewport_height / 2.0;
        Vec2::new(
            ((raw_x - rect.left) - half_w) / half_w,
            (half_h - (raw_y - rect.top)) / half_h,
        )
    }

    /// Anchors a new drag at `point` without turning.
    pub fn begin_drag(&mut self, point: Vec2) {
        self.last = point;
    }

    /// Turns by the pointer travel since the last anchor and re-anchors.
    pub fn drag_to(&mut self, point: Vec2) {
        self.angle_y -= (point.x - self.last.x) * self.sensitivity;
        self.angle_x -= (point.y - self.last.y) * self.sensitivity;
        self.rebuild();
        self.last = point;
    }

    pub fn set_angle_z(&mut self, degrees: f32) {
        self.angle_z = degrees;
        self.rebuild();
    }

    /// Back to the rest orientation.
    pub fn reset(&mut self) {
        *self = Self {
            sensitivity: self.sensitivity,
            ..Self::default()
        };
    }

    /// (X, Y, Z) in degrees.
    pub fn angles(&self) -> glam::Vec3 {
        glam::Vec3::new(self.angle_x, self.angle_y, self.angle_z)
    }

    pub fn last_point(&self) -> Vec2 {
        self.last
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    fn rebuild(&mut self) {
        self.matrix
            .set_identity()
            .rotate(-self.angle_x, 1.0, 0.0, 0.0)
            .rotate(self.angle_y, 0.0, 1.0, 0.0)
            .rotate(self.angle_z, 0.0, 0.0, 1.0);
    }
}
