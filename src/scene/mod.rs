//! The scene: an ordered list of parts seen through one drag-rotated camera.
//!
//! # Overview
//!
//! A [`Scene`] owns
//! - its parts, drawn in insertion order
//! - a [`Camera`] whose angles pointer drags mutate
//! - a drag flag, an animation flag and an accumulated zoom factor
//! - a global translate matrix (identity unless someone pans)
//!
//! Everything happens on one thread. The host loop calls [`Scene::draw`] once per
//! frame and forwards pointer events in between; no call re-enters the scene.
//!
//! # Example
//!
//! ```
//! use figurine::{Cuboid, Drawable, RecordingSurface, Rgba, Scene};
//!
//! let mut scene = Scene::new();
//! let mut torso = Cuboid::new(Rgba::rgb(235.0, 206.0, 76.0)).with_id("torso");
//! torso.transform_mut().scale(0.3, 0.3, 0.5).translate(-0.5, -0.5, -0.5);
//! scene.add_part(torso);
//!
//! let mut surface = RecordingSurface::new();
//! scene.draw(&mut surface, 0.0, 1.0);
//! assert_eq!(surface.draw_count(), 12 + 3 * 12);
//! ```

mod command;
mod figure;

pub use command::PartCommand;
pub use figure::creature;

use glam::Vec2;

use crate::camera::Camera;
use crate::color::Rgba;
use crate::matrix::Matrix4;
use crate::primitive::{Cuboid, Drawable};
use crate::surface::RenderSurface;

/// Smallest accumulated zoom factor.
pub const MIN_ZOOM: f32 = 0.1;
/// Largest accumulated zoom factor.
pub const MAX_ZOOM: f32 = 10.0;

/// Part ids the gait animation swings.
pub const LEFT_THIGH: &str = "back_left_thigh";
pub const RIGHT_THIGH: &str = "back_right_thigh";

/// Peak per-frame swing of the gait, in degrees.
const GAIT_AMPLITUDE: f32 = 0.5;
/// Gait phase speed, radians per millisecond.
const GAIT_RATE: f32 = 0.01;

/// An articulated model, its camera and its interaction state.
pub struct Scene {
    parts: Vec<Box<dyn Drawable>>,
    camera: Camera,
    global_translation: Matrix4,
    zoom: f32,
    dragging: bool,
    animating: bool,
    show_axes: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            parts: Vec::new(),
            camera: Camera::new(),
            global_translation: Matrix4::identity(),
            zoom: 1.0,
            dragging: false,
            animating: false,
            show_axes: true,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene pre-populated with the given parts.
    pub fn with_parts(parts: impl IntoIterator<Item = Box<dyn Drawable>>) -> Self {
        let mut scene = Self::new();
        scene.parts.extend(parts);
        scene
    }

    /// Use a differently configured camera.
    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Toggle the X/Y/Z debug axes drawn after the parts.
    pub fn axes(mut self, show: bool) -> Self {
        self.show_axes = show;
        self
    }

    // ========================================================================
    // Parts
    // ========================================================================

    /// Appends a part; it is drawn after everything already present.
    pub fn add_part(&mut self, part: impl Drawable + 'static) {
        self.parts.push(Box::new(part));
    }

    /// Appends an already boxed part.
    pub fn add_boxed(&mut self, part: Box<dyn Drawable>) {
        self.parts.push(part);
    }

    /// Looks a part up by id.
    ///
    /// Ids are not unique; when several parts share one, the last added wins.
    pub fn part(&self, id: &str) -> Option<&dyn Drawable> {
        self.parts
            .iter()
            .rev()
            .find(|p| p.id() == Some(id))
            .map(|p| p.as_ref())
    }

    /// Mutable lookup with the same last-added-wins rule as [`Scene::part`].
    pub fn part_mut(&mut self, id: &str) -> Option<&mut (dyn Drawable + 'static)> {
        self.parts
            .iter_mut()
            .rev()
            .find(|p| p.id() == Some(id))
            .map(|p| p.as_mut())
    }

    /// Every part in draw order with its index and id, for UI layers.
    pub fn parts(&self) -> impl Iterator<Item = (usize, Option<&str>, &dyn Drawable)> {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.id(), p.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Runs a UI command. Returns `false` if no part carries the id.
    pub fn apply(&mut self, command: PartCommand) -> bool {
        let Some(part) = self.part_mut(command.target()) else {
            log::debug!("no part '{}' for {:?}", command.target(), command);
            return false;
        };
        command.apply_to(part);
        true
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Idle → Dragging. Anchors the camera at `point` without turning.
    pub fn begin_drag(&mut self, point: Vec2) {
        self.dragging = true;
        self.camera.begin_drag(point);
        log::debug!("drag started at {point}");
    }

    /// Turns the camera while dragging. Returns whether anything changed.
    ///
    /// Outside a drag this is a no-op; stray pointer-move and pointer-enter events
    /// arrive all the time.
    pub fn drag_to(&mut self, point: Vec2) -> bool {
        if !self.dragging {
            return false;
        }
        self.camera.drag_to(point);
        true
    }

    /// The pointer re-entered the viewport.
    ///
    /// Continues the rotation if a drag is in progress, otherwise makes sure the
    /// scene is idle.
    pub fn pointer_enter(&mut self, point: Vec2) -> bool {
        if self.dragging {
            self.drag_to(point)
        } else {
            self.end_drag();
            false
        }
    }

    /// Dragging → Idle.
    pub fn end_drag(&mut self) {
        if self.dragging {
            log::debug!("drag ended at angles {}", self.camera.angles());
        }
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    // ========================================================================
    // Animation and zoom
    // ========================================================================

    pub fn set_animating(&mut self, animating: bool) {
        if self.animating != animating {
            log::info!("animation {}", if animating { "on" } else { "off" });
        }
        self.animating = animating;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Swings the back thighs in opposite directions.
    ///
    /// The per-frame angle `sin(t · 0.01) · 0.5` is composed onto each thigh's
    /// transform, so the accumulated rotation oscillates. Missing thighs are skipped.
    pub fn animate(&mut self, elapsed_ms: f32) {
        let angle = (elapsed_ms * GAIT_RATE).sin() * GAIT_AMPLITUDE;
        if let Some(thigh) = self.part_mut(LEFT_THIGH) {
            thigh.transform_mut().rotate(angle, 1.0, 0.0, 0.0);
        }
        if let Some(thigh) = self.part_mut(RIGHT_THIGH) {
            thigh.transform_mut().rotate(-angle, 1.0, 0.0, 0.0);
        }
    }

    /// Multiplies the accumulated zoom by `delta` (1.0 leaves it alone).
    pub fn zoom_by(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.zoom = (self.zoom * delta).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    // ========================================================================
    // Camera and globals
    // ========================================================================

    pub fn camera_ref(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_global_translation(&mut self, matrix: Matrix4) {
        self.global_translation = matrix;
    }

    pub fn global_translation(&self) -> &Matrix4 {
        &self.global_translation
    }

    /// The matrix uploaded as the global rotation: camera, then zoom.
    pub fn view_matrix(&self) -> Matrix4 {
        let mut view = *self.camera.matrix();
        view.scale(self.zoom, self.zoom, self.zoom);
        view
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// One frame: zoom, animate, clear, upload globals, draw parts then axes.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface, elapsed_ms: f32, zoom_delta: f32) {
        self.zoom_by(zoom_delta);
        if self.animating {
            self.animate(elapsed_ms);
        }
        self.redraw(surface);
    }

    /// Draws the current state without advancing animation or zoom.
    pub fn redraw(&self, surface: &mut dyn RenderSurface) {
        surface.clear();
        surface.set_global_rotation(&self.view_matrix());
        surface.set_global_translation(&self.global_translation);

        for part in &self.parts {
            part.draw(surface);
        }

        if self.show_axes {
            for axis in debug_axes() {
                axis.draw(surface);
            }
        }
    }
}

/// Thin cuboids along Y (green), X (red) and Z (blue), rebuilt each frame.
fn debug_axes() -> [Cuboid; 3] {
    let mut y = Cuboid::new(Rgba::GREEN);
    y.transform_mut()
        .set_scale(0.01, 30.0, 0.01)
        .translate(0.0, -0.5, 0.0);

    let mut x = Cuboid::new(Rgba::RED);
    x.transform_mut()
        .set_scale(20.0, 0.01, 0.01)
        .translate(-0.5, 0.0, 0.0);

    let mut z = Cuboid::new(Rgba::BLUE);
    z.transform_mut()
        .set_scale(0.01, 0.01, 20.0)
        .translate(0.0, 0.0, -0.5);

    [y, x, z]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Cone, Sphere};
    use crate::surface::{RecordingSurface, SurfaceEvent, Topology};

    fn torso() -> Cuboid {
        let mut torso = Cuboid::new(Rgba::new(235.0, 206.0, 76.0, 1.0)).with_id("torso");
        torso
            .transform_mut()
            .scale(0.3, 0.3, 0.5)
            .translate(-0.5, -0.5, -0.5);
        torso
    }

    #[test]
    fn draw_submits_part_then_axes() {
        let mut scene = Scene::new();
        scene.add_part(torso());

        let mut surface = RecordingSurface::new();
        scene.draw(&mut surface, 0.0, 1.0);

        let mut expected = Matrix4::identity();
        expected.scale(0.3, 0.3, 0.5).translate(-0.5, -0.5, -0.5);

        let draws: Vec<_> = surface.draws().collect();
        assert_eq!(draws.len(), 12 + 36);
        assert!(draws[..12].iter().all(|d| d.model == expected));
        assert!(draws.iter().all(|d| d.topology == Topology::Triangles));

        // Axes carry their own transforms, in Y, X, Z order.
        let axes = debug_axes();
        for (i, axis) in axes.iter().enumerate() {
            let start = 12 + i * 12;
            assert!(
                draws[start..start + 12]
                    .iter()
                    .all(|d| d.model == *axis.transform())
            );
        }
        assert_eq!(draws[12].color[1], 0.8);
        assert_eq!(draws[24].color[0], 0.8);
        assert_eq!(draws[36].color[2], 0.8);
    }

    #[test]
    fn draw_clears_then_uploads_globals() {
        let scene_parts: Vec<Box<dyn Drawable>> = vec![Box::new(torso())];
        let mut scene = Scene::with_parts(scene_parts).axes(false);

        let mut surface = RecordingSurface::new();
        scene.draw(&mut surface, 16.0, 1.0);

        let events = surface.events();
        assert_eq!(events[0], SurfaceEvent::Clear);
        assert_eq!(events[1], SurfaceEvent::GlobalRotation(Matrix4::identity()));
        assert_eq!(
            events[2],
            SurfaceEvent::GlobalTranslation(Matrix4::identity())
        );
        assert_eq!(surface.draw_count(), 12);
    }

    #[test]
    fn mixed_primitives_draw_in_insertion_order() {
        let mut scene = Scene::new().axes(false);
        scene.add_part(Sphere::new(1.0, Rgba::WHITE));
        scene.add_part(Cone::new(0.3, 1.2, Rgba::WHITE));
        scene.add_part(torso());

        let mut surface = RecordingSurface::new();
        scene.draw(&mut surface, 0.0, 1.0);

        let topologies: Vec<_> = surface.draws().map(|d| d.topology).collect();
        assert_eq!(topologies.len(), 1 + 2 + 12);
        assert_eq!(topologies[0], Topology::IndexedTriangles);
        assert_eq!(&topologies[1..3], &[Topology::TriangleFan; 2]);
        assert!(topologies[3..].iter().all(|&t| t == Topology::Triangles));
    }

    #[test]
    fn lookup_prefers_last_duplicate() {
        let mut scene = Scene::new();
        scene.add_part(Cuboid::new(Rgba::RED).with_id("eye"));
        scene.add_part(Cuboid::new(Rgba::BLUE).with_id("eye"));
        scene.add_part(Cuboid::new(Rgba::WHITE));

        assert_eq!(scene.part("eye").map(|p| p.color()), Some(Rgba::BLUE));
        assert!(scene.part("nose").is_none());
        assert_eq!(scene.len(), 3);

        let ids: Vec<_> = scene.parts().map(|(_, id, _)| id).collect();
        assert_eq!(ids, vec![Some("eye"), Some("eye"), None]);
    }

    #[test]
    fn drag_is_ignored_while_idle() {
        let mut scene = Scene::new();
        assert!(!scene.drag_to(Vec2::new(1.0, 1.0)));
        assert_eq!(scene.camera_ref().angles(), glam::Vec3::ZERO);

        scene.begin_drag(Vec2::ZERO);
        assert!(scene.is_dragging());
        assert!(scene.drag_to(Vec2::new(1.0, 0.0)));
        assert_eq!(scene.camera_ref().angle_y, -120.0);

        scene.end_drag();
        assert!(!scene.drag_to(Vec2::new(-1.0, 0.0)));
        assert_eq!(scene.camera_ref().angle_y, -120.0);
    }

    #[test]
    fn pointer_enter_continues_or_idles() {
        let mut scene = Scene::new();
        assert!(!scene.pointer_enter(Vec2::new(0.5, 0.0)));
        assert!(!scene.is_dragging());

        scene.begin_drag(Vec2::ZERO);
        assert!(scene.pointer_enter(Vec2::new(0.5, 0.0)));
        assert_eq!(scene.camera_ref().angle_y, -60.0);
    }

    #[test]
    fn drag_rotation_reaches_the_surface() {
        let mut scene = Scene::new().axes(false);
        scene.begin_drag(Vec2::ZERO);
        scene.drag_to(Vec2::new(0.25, 0.0));

        let mut surface = RecordingSurface::new();
        scene.redraw(&mut surface);
        assert_eq!(surface.global_rotation(), Some(*scene.camera_ref().matrix()));
    }

    #[test]
    fn animate_at_zero_is_neutral() {
        let mut scene = Scene::new();
        let mut left = Cuboid::new(Rgba::WHITE).with_id(LEFT_THIGH);
        left.transform_mut().scale(0.15, 0.7, 0.2).translate(-1.2, -1.0, 0.5);
        let before = *left.transform();
        scene.add_part(left);
        scene.add_part(Cuboid::new(Rgba::WHITE).with_id(RIGHT_THIGH));

        scene.animate(0.0);

        assert_eq!(*scene.part(LEFT_THIGH).unwrap().transform(), before);
        assert_eq!(
            *scene.part(RIGHT_THIGH).unwrap().transform(),
            Matrix4::identity()
        );
    }

    #[test]
    fn animate_swings_thighs_opposite_ways() {
        let mut scene = Scene::new();
        scene.add_part(Cuboid::new(Rgba::WHITE).with_id(LEFT_THIGH));
        scene.add_part(Cuboid::new(Rgba::WHITE).with_id(RIGHT_THIGH));
        scene.add_part(Cuboid::new(Rgba::WHITE).with_id("tail"));

        let t = 157.0;
        scene.animate(t);
        let angle = (t * 0.01f32).sin() * 0.5;

        let mut left = Matrix4::identity();
        left.rotate(angle, 1.0, 0.0, 0.0);
        let mut right = Matrix4::identity();
        right.rotate(-angle, 1.0, 0.0, 0.0);

        assert_eq!(*scene.part(LEFT_THIGH).unwrap().transform(), left);
        assert_eq!(*scene.part(RIGHT_THIGH).unwrap().transform(), right);
        assert_eq!(
            *scene.part("tail").unwrap().transform(),
            Matrix4::identity()
        );
    }

    #[test]
    fn animate_without_thighs_is_silent() {
        let mut scene = Scene::new();
        scene.add_part(torso());
        scene.animate(500.0);
        scene.set_animating(true);
        let mut surface = RecordingSurface::new();
        scene.draw(&mut surface, 500.0, 1.0);
        assert_eq!(surface.draw_count(), 48);
    }

    #[test]
    fn draw_only_animates_when_enabled() {
        let mut scene = Scene::new().axes(false);
        scene.add_part(Cuboid::new(Rgba::WHITE).with_id(LEFT_THIGH));
        let mut surface = RecordingSurface::new();

        scene.draw(&mut surface, 200.0, 1.0);
        assert_eq!(
            *scene.part(LEFT_THIGH).unwrap().transform(),
            Matrix4::identity()
        );

        scene.set_animating(true);
        scene.draw(&mut surface, 200.0, 1.0);
        assert_ne!(
            *scene.part(LEFT_THIGH).unwrap().transform(),
            Matrix4::identity()
        );
    }

    #[test]
    fn zoom_accumulates_and_clamps() {
        let mut scene = Scene::new().axes(false);
        let mut surface = RecordingSurface::new();

        scene.draw(&mut surface, 0.0, 2.0);
        scene.draw(&mut surface, 0.0, 1.0);
        assert_eq!(scene.zoom(), 2.0);

        let mut expected = Matrix4::identity();
        expected.scale(2.0, 2.0, 2.0);
        assert_eq!(surface.global_rotation(), Some(expected));

        for _ in 0..20 {
            scene.zoom_by(2.0);
        }
        assert_eq!(scene.zoom(), MAX_ZOOM);

        scene.zoom_by(0.0);
        scene.zoom_by(f32::NAN);
        assert_eq!(scene.zoom(), MAX_ZOOM);
    }

    #[test]
    fn commands_target_parts_by_id() {
        let mut scene = Scene::new();
        scene.add_part(torso());

        assert!(scene.apply(PartCommand::SetColor {
            id: "torso".into(),
            color: Rgba::RED,
        }));
        assert_eq!(scene.part("torso").unwrap().color(), Rgba::RED);

        assert!(!scene.apply(PartCommand::Rotate {
            id: "wing".into(),
            degrees: 10.0,
            axis: glam::Vec3::X,
        }));
    }
}
