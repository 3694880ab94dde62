//! # Figurine
//!
//! **An articulated figure built from flat-shaded primitives, turned with the mouse.**
//!
//! A [`Scene`] holds cuboids, cones and spheres, each with its own composed
//! [`Matrix4`]. Dragging the pointer spins a shared [`Camera`]; the wheel zooms; a
//! toggle swings the creature's back legs. Rendering goes through the
//! [`RenderSurface`] trait, implemented on the GPU by [`FlatPass`] and in memory by
//! [`RecordingSurface`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use figurine::{AppConfig, Scene, creature, run_with_config};
//!
//! fn main() -> figurine::Result<()> {
//!     env_logger::init();
//!     run_with_config(
//!         AppConfig::new().title("Creature").size(800, 800),
//!         Scene::with_parts(creature()),
//!     )
//! }
//! ```
//!
//! ## Headless
//!
//! ```
//! use figurine::{Cone, Drawable, RecordingSurface, Rgba, Scene};
//!
//! let mut scene = Scene::new().axes(false);
//! let mut horn = Cone::new(0.3, 1.2, Rgba::rgb(247.0, 196.0, 9.0)).with_id("horn");
//! horn.transform_mut().scale(0.1, 0.1, 0.1);
//! scene.add_part(horn);
//!
//! let mut surface = RecordingSurface::new();
//! scene.draw(&mut surface, 0.0, 1.0);
//! assert_eq!(surface.draw_count(), 2);
//! ```

mod app;
mod camera;
mod color;
mod error;
mod flat_pass;
mod gpu;
mod input;
mod matrix;
mod primitive;
pub mod scene;
mod surface;

pub use app::{AppConfig, RedrawMode, apply_action, run, run_with_config, wants_redraw};
pub use camera::{Camera, DRAG_DEGREES_PER_UNIT, Rect};
pub use color::Rgba;
pub use error::{FigurineError, Result};
pub use flat_pass::{FLAT_SHADER, FlatPass};
pub use gpu::GpuContext;
pub use input::{Input, InputAction};
pub use matrix::Matrix4;
pub use primitive::{Cone, Cuboid, Drawable, Sphere};
pub use scene::{PartCommand, Scene, creature};
pub use surface::{
    Binding, DrawCall, Geometry, ProgramBindings, RecordedDraw, RecordingSurface, RenderSurface,
    SurfaceEvent, Topology,
};

// Re-export glam math types for convenience
pub use glam::{Vec2, Vec3};
