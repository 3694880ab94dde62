use std::f32::consts::TAU;

use crate::color::Rgba;
use crate::primitive::{Drawable, PartCore, impl_drawable_core};
use crate::surface::{DrawCall, Geometry, RenderSurface};

/// Radial divisions of the base circle.
pub const CONE_SEGMENTS: usize = 30;

/// A right circular cone standing on the XZ plane with its apex on +Y.
///
/// The vertex list is the apex followed by `CONE_SEGMENTS + 1` ring vertices; the
/// last ring vertex repeats the first at 2π. The base disk is drawn as a fan over
/// `CONE_SEGMENTS` ring vertices starting at index 1, the lateral surface as a fan
/// over `CONE_SEGMENTS + 1` vertices starting at the apex.
///
/// Geometry is built once at construction; radius and height cannot change.
#[derive(Clone, Debug)]
pub struct Cone {
    core: PartCore,
    radius: f32,
    height: f32,
    vertices: Vec<[f32; 3]>,
}

impl Cone {
    pub fn new(radius: f32, height: f32, color: Rgba) -> Self {
        Self {
            core: PartCore::new(color, None),
            radius,
            height,
            vertices: Self::tessellate(radius, height),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.core = PartCore::new(self.core.color, Some(id.into()));
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Apex first, then the closed base ring.
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    fn tessellate(radius: f32, height: f32) -> Vec<[f32; 3]> {
        let mut vertices = Vec::with_capacity(CONE_SEGMENTS + 2);
        vertices.push([0.0, height, 0.0]);
        for i in 0..=CONE_SEGMENTS {
            let angle = i as f32 * TAU / CONE_SEGMENTS as f32;
            vertices.push([radius * angle.cos(), 0.0, radius * angle.sin()]);
        }
        vertices
    }

    fn base(&self) -> &[[f32; 3]] {
        &self.vertices[1..1 + CONE_SEGMENTS]
    }

    fn lateral(&self) -> &[[f32; 3]] {
        &self.vertices[..CONE_SEGMENTS + 1]
    }
}

impl Drawable for Cone {
    impl_drawable_core!();

    fn draw(&self, surface: &mut dyn RenderSurface) {
        let color = self.core.color.normalized();
        for fan in [self.base(), self.lateral()] {
            surface.draw(DrawCall {
                geometry: Geometry::TriangleFan(fan),
                model: self.core.transform,
                color,
            });
        }
    }
}
