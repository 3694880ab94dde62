use crate::color::Rgba;
use crate::matrix::Matrix4;
use crate::primitive::{Drawable, PartCore, impl_drawable_core};
use crate::surface::{DrawCall, Geometry, RenderSurface};

/// Brightness of the four vertical faces.
pub const SIDE_SHADE: f32 = 0.8;
/// Brightness of the top face.
pub const TOP_SHADE: f32 = 1.0;
/// Brightness of the bottom face.
pub const BOTTOM_SHADE: f32 = 0.5;

/// The unit cube as 12 triangles, grouped by face with the shade each face uses.
#[rustfmt::skip]
const FACES: [(f32, [[[f32; 3]; 3]; 2]); 6] = [
    // front (z = 0)
    (SIDE_SHADE, [
        [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
    ]),
    // back (z = 1)
    (SIDE_SHADE, [
        [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
        [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    ]),
    // left (x = 0)
    (SIDE_SHADE, [
        [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
    ]),
    // right (x = 1)
    (SIDE_SHADE, [
        [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 1.0]],
        [[1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    ]),
    // top (y = 1)
    (TOP_SHADE, [
        [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
        [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    ]),
    // bottom (y = 0)
    (BOTTOM_SHADE, [
        [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
        [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
    ]),
];

/// An axis-aligned box spanning \[0,1\]³ in local space.
///
/// Each of the 12 triangles goes out as its own draw. Faces are flat-shaded by
/// orientation: the top at full brightness, the sides at 80% and the bottom at 50%,
/// which reads as light coming from above.
///
/// ```
/// use figurine::{Cuboid, Drawable, Rgba};
///
/// let mut torso = Cuboid::new(Rgba::rgb(235.0, 206.0, 76.0)).with_id("torso");
/// torso.transform_mut().scale(0.3, 0.3, 0.5).translate(-0.5, -0.5, -0.5);
/// ```
#[derive(Clone, Debug)]
pub struct Cuboid {
    core: PartCore,
}

impl Cuboid {
    pub fn new(color: Rgba) -> Self {
        Self {
            core: PartCore::new(color, None),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.core = PartCore::new(self.core.color, Some(id.into()));
        self
    }

    /// Starts from `transform` instead of identity.
    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        self.core.transform = transform;
        self
    }

    /// The 12 local-space triangles paired with their face shade.
    pub fn triangles() -> impl Iterator<Item = (f32, &'static [[f32; 3]; 3])> {
        FACES
            .iter()
            .flat_map(|(shade, tris)| tris.iter().map(move |t| (*shade, t)))
    }
}

impl Drawable for Cuboid {
    impl_drawable_core!();

    fn draw(&self, surface: &mut dyn RenderSurface) {
        for (shade, triangle) in Self::triangles() {
            surface.draw(DrawCall {
                geometry: Geometry::Triangles(triangle),
                model: self.core.transform,
                color: self.core.color.shaded(shade),
            });
        }
    }
}
