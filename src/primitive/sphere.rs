use std::f32::consts::PI;

use crate::color::Rgba;
use crate::primitive::{Drawable, PartCore, impl_drawable_core};
use crate::surface::{DrawCall, Geometry, RenderSurface};

/// Latitude bands, pole to pole.
pub const LATITUDE_BANDS: u32 = 30;
/// Longitude bands, around the equator.
pub const LONGITUDE_BANDS: u32 = 30;

/// A UV sphere centered on the local origin.
///
/// For latitude `i` and longitude `j` the vertex sits at
/// `radius * (cos φ sin θ, cos θ, sin φ sin θ)` with `θ = iπ/30` and `φ = 2jπ/30`.
/// Each quad patch becomes two triangles. Vertex and index lists are built once
/// and reused every frame.
#[derive(Clone, Debug)]
pub struct Sphere {
    core: PartCore,
    radius: f32,
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl Sphere {
    pub fn new(radius: f32, color: Rgba) -> Self {
        let (positions, indices) = Self::tessellate(radius);
        Self {
            core: PartCore::new(color, None),
            radius,
            positions,
            indices,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.core = PartCore::new(self.core.color, Some(id.into()));
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn tessellate(radius: f32) -> (Vec<[f32; 3]>, Vec<u32>) {
        let row = LONGITUDE_BANDS + 1;
        let mut positions = Vec::with_capacity(((LATITUDE_BANDS + 1) * row) as usize);
        for i in 0..=LATITUDE_BANDS {
            let theta = i as f32 * PI / LATITUDE_BANDS as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for j in 0..=LONGITUDE_BANDS {
                let phi = j as f32 * 2.0 * PI / LONGITUDE_BANDS as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                positions.push([
                    radius * cos_phi * sin_theta,
                    radius * cos_theta,
                    radius * sin_phi * sin_theta,
                ]);
            }
        }

        let mut indices = Vec::with_capacity((LATITUDE_BANDS * LONGITUDE_BANDS * 6) as usize);
        for i in 0..LATITUDE_BANDS {
            for j in 0..LONGITUDE_BANDS {
                let first = i * row + j;
                let second = first + row;
                indices.extend_from_slice(&[first, second, first + 1]);
                indices.extend_from_slice(&[second, second + 1, first + 1]);
            }
        }

        (positions, indices)
    }
}

impl Drawable for Sphere {
    impl_drawable_core!();

    fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.draw(DrawCall {
            geometry: Geometry::IndexedTriangles {
                positions: &self.positions,
                indices: &self.indices,
            },
            model: self.core.transform,
            color: self.core.color.normalized(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, Topology};

    #[test]
    fn vertices_lie_on_the_radius() {
        let sphere = Sphere::new(2.0, Rgba::WHITE);
        for p in sphere.positions() {
            let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((norm - 2.0).abs() < 1e-6, "norm {norm}");
        }
    }

    #[test]
    fn index_count_matches_bands() {
        let sphere = Sphere::new(1.0, Rgba::WHITE);
        assert_eq!(
            sphere.indices().len(),
            (2 * LATITUDE_BANDS * LONGITUDE_BANDS * 3) as usize
        );
        assert_eq!(sphere.positions().len(), 31 * 31);
        let max = *sphere.indices().iter().max().unwrap() as usize;
        assert!(max < sphere.positions().len());
    }

    #[test]
    fn first_patch_winding() {
        let sphere = Sphere::new(1.0, Rgba::WHITE);
        assert_eq!(&sphere.indices()[..6], &[0, 31, 1, 31, 32, 1]);
    }

    #[test]
    fn draws_once_indexed() {
        let sphere = Sphere::new(0.5, Rgba::BLUE).with_id("nose");
        let mut surface = RecordingSurface::new();
        sphere.draw(&mut surface);

        assert_eq!(surface.draw_count(), 1);
        let d = surface.draws().next().unwrap();
        assert_eq!(d.topology, Topology::IndexedTriangles);
        assert_eq!(d.indices.as_ref().map(Vec::len), Some(5400));
        assert_eq!(d.color, [0.0, 0.0, 1.0, 1.0]);
    }
}
