//! Primitive solids that make up a scene.
//!
//! Every primitive owns its transform and color and knows how to describe its own
//! local-space geometry to a [`RenderSurface`]. The scene only sees the
//! [`Drawable`] capability, never the concrete shape.
//!
//! | Shape      | Local space                      | Draws per frame          |
//! |------------|----------------------------------|--------------------------|
//! | [`Cuboid`] | unit cube \[0,1\]³               | 12 triangles             |
//! | [`Cone`]   | apex at (0, h, 0), base at y = 0 | 2 fans (base, lateral)   |
//! | [`Sphere`] | centered at origin               | 1 indexed triangle list  |

mod cone;
mod cuboid;
mod sphere;

pub use cone::Cone;
pub use cuboid::Cuboid;
pub use sphere::Sphere;

use crate::color::Rgba;
use crate::matrix::Matrix4;
use crate::surface::RenderSurface;

/// Anything the scene can hold and draw.
pub trait Drawable {
    /// Lookup key for animation and commands. Empty ids never match.
    fn id(&self) -> Option<&str>;

    fn transform(&self) -> &Matrix4;

    fn transform_mut(&mut self) -> &mut Matrix4;

    fn color(&self) -> Rgba;

    fn set_color(&mut self, color: Rgba);

    /// Submits this primitive's geometry under its current transform.
    fn draw(&self, surface: &mut dyn RenderSurface);
}

/// State every primitive carries.
#[derive(Clone, Debug, Default)]
pub(crate) struct PartCore {
    pub id: Option<String>,
    pub transform: Matrix4,
    pub color: Rgba,
}

impl PartCore {
    pub fn new(color: Rgba, id: Option<String>) -> Self {
        Self {
            id: id.filter(|id| !id.is_empty()),
            transform: Matrix4::identity(),
            color,
        }
    }
}

macro_rules! impl_drawable_core {
    () => {
        fn id(&self) -> Option<&str> {
            self.core.id.as_deref()
        }

        fn transform(&self) -> &crate::matrix::Matrix4 {
            &self.core.transform
        }

        fn transform_mut(&mut self) -> &mut crate::matrix::Matrix4 {
            &mut self.core.transform
        }

        fn color(&self) -> crate::color::Rgba {
            self.core.color
        }

        fn set_color(&mut self, color: crate::color::Rgba) {
            self.core.color = color;
        }
    };
}

pub(crate) use impl_drawable_core;
