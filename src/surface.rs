//! The renderer surface contract.
//!
//! Primitives never talk to the GPU directly. They describe each draw as a
//! [`DrawCall`] (local-space geometry, a model matrix and a flat color) and hand it
//! to whatever implements [`RenderSurface`]. The shared camera and global translate
//! matrices are set once per pass with [`RenderSurface::set_global_rotation`] and
//! [`RenderSurface::set_global_translation`].
//!
//! The vertex stage of every implementation computes
//!
//! ```text
//! clip = u_GlobalRotateMatrix * u_GlobalTranslateMatrix * u_ModelMatrix * vec4(a_Position, 1)
//! ```
//!
//! Two implementations exist: the wgpu-backed [`FlatPass`](crate::FlatPass) and
//! [`RecordingSurface`], which just remembers what it was asked to do. The latter is
//! what tests and headless callers use.

use crate::matrix::Matrix4;

/// Local-space geometry for one draw.
#[derive(Clone, Copy, Debug)]
pub enum Geometry<'a> {
    /// Every three positions form a triangle.
    Triangles(&'a [[f32; 3]]),
    /// The first position is shared by every subsequent pair.
    TriangleFan(&'a [[f32; 3]]),
    /// Triangle list over an index buffer.
    IndexedTriangles {
        positions: &'a [[f32; 3]],
        indices: &'a [u32],
    },
}

impl Geometry<'_> {
    /// Number of triangles this geometry rasterizes to.
    pub fn triangle_count(&self) -> usize {
        match self {
            Geometry::Triangles(p) => p.len() / 3,
            Geometry::TriangleFan(p) => p.len().saturating_sub(2),
            Geometry::IndexedTriangles { indices, .. } => indices.len() / 3,
        }
    }

    /// Flattens the geometry into a plain triangle list.
    ///
    /// Fans are expanded as `(0, i, i + 1)`; indexed geometry is dereferenced.
    pub fn to_triangle_list(&self) -> Vec<[f32; 3]> {
        match *self {
            Geometry::Triangles(p) => p[..p.len() / 3 * 3].to_vec(),
            Geometry::TriangleFan(p) => {
                let mut out = Vec::with_capacity(self.triangle_count() * 3);
                for i in 1..p.len().saturating_sub(1) {
                    out.push(p[0]);
                    out.push(p[i]);
                    out.push(p[i + 1]);
                }
                out
            }
            Geometry::IndexedTriangles { positions, indices } => indices
                [..indices.len() / 3 * 3]
                .iter()
                .map(|&i| positions[i as usize])
                .collect(),
        }
    }
}

/// One submission: geometry plus its per-draw uniforms.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    pub geometry: Geometry<'a>,
    /// Feeds `u_ModelMatrix`.
    pub model: Matrix4,
    /// Feeds `u_FragColor`, already normalized to 0–1.
    pub color: [f32; 4],
}

/// Something primitives can be drawn onto.
pub trait RenderSurface {
    /// Uploads `u_GlobalRotateMatrix`.
    fn set_global_rotation(&mut self, matrix: &Matrix4);
    /// Uploads `u_GlobalTranslateMatrix`.
    fn set_global_translation(&mut self, matrix: &Matrix4);
    /// Clears the color and depth buffers.
    fn clear(&mut self);
    /// Submits one draw.
    fn draw(&mut self, call: DrawCall<'_>);
}

/// Named shader inputs the surface binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Position,
    ModelMatrix,
    GlobalRotateMatrix,
    GlobalTranslateMatrix,
    FragColor,
}

impl Binding {
    pub const ALL: [Binding; 5] = [
        Binding::Position,
        Binding::ModelMatrix,
        Binding::GlobalRotateMatrix,
        Binding::GlobalTranslateMatrix,
        Binding::FragColor,
    ];

    /// The identifier the shader program must declare.
    pub fn name(self) -> &'static str {
        match self {
            Binding::Position => "a_Position",
            Binding::ModelMatrix => "u_ModelMatrix",
            Binding::GlobalRotateMatrix => "u_GlobalRotateMatrix",
            Binding::GlobalTranslateMatrix => "u_GlobalTranslateMatrix",
            Binding::FragColor => "u_FragColor",
        }
    }
}

/// Which named inputs a shader program actually declares.
///
/// Missing inputs are not fatal: they log a warning and resolve to a sentinel,
/// and every later write to that slot is silently dropped. Debug builds assert
/// instead so a broken shader is caught early.
#[derive(Clone, Copy, Debug)]
pub struct ProgramBindings {
    found: [bool; 5],
}

impl ProgramBindings {
    /// Resolves every binding against a program's source, warning about gaps.
    pub fn resolve(source: &str) -> Self {
        let bindings = Self::scan(source);
        for binding in bindings.missing() {
            log::warn!(
                "shader program has no '{}' binding; writes to it will be ignored",
                binding.name()
            );
        }
        debug_assert!(
            bindings.missing().next().is_none(),
            "shader program is missing one or more required bindings"
        );
        bindings
    }

    /// Looks for each binding name as a whole identifier, without reporting.
    pub fn scan(source: &str) -> Self {
        Self {
            found: Binding::ALL.map(|b| declares_identifier(source, b.name())),
        }
    }

    /// Whether writes to `binding` reach the program.
    pub fn is_bound(&self, binding: Binding) -> bool {
        self.found[binding as usize]
    }

    pub fn missing(&self) -> impl Iterator<Item = Binding> + '_ {
        Binding::ALL.into_iter().filter(|&b| !self.is_bound(b))
    }
}

fn declares_identifier(source: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    source.match_indices(name).any(|(at, _)| {
        let before = source[..at].chars().next_back();
        let after = source[at + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// A draw call captured by [`RecordingSurface`], with its geometry copied out.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
    pub topology: Topology,
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
    pub model: Matrix4,
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    TriangleFan,
    IndexedTriangles,
}

/// Everything a [`RecordingSurface`] has been told, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    GlobalRotation(Matrix4),
    GlobalTranslation(Matrix4),
    Clear,
    Draw(RecordedDraw),
}

/// An in-memory surface that records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Only the draw submissions.
    pub fn draws(&self) -> impl Iterator<Item = &RecordedDraw> {
        self.events.iter().filter_map(|e| match e {
            SurfaceEvent::Draw(d) => Some(d),
            _ => None,
        })
    }

    pub fn draw_count(&self) -> usize {
        self.draws().count()
    }

    /// The most recent global rotation upload, if any.
    pub fn global_rotation(&self) -> Option<Matrix4> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::GlobalRotation(m) => Some(*m),
            _ => None,
        })
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn set_global_rotation(&mut self, matrix: &Matrix4) {
        self.events.push(SurfaceEvent::GlobalRotation(*matrix));
    }

    fn set_global_translation(&mut self, matrix: &Matrix4) {
        self.events.push(SurfaceEvent::GlobalTranslation(*matrix));
    }

    fn clear(&mut self) {
        self.events.push(SurfaceEvent::Clear);
    }

    fn draw(&mut self, call: DrawCall<'_>) {
        let (topology, positions, indices) = match call.geometry {
            Geometry::Triangles(p) => (Topology::Triangles, p.to_vec(), None),
            Geometry::TriangleFan(p) => (Topology::TriangleFan, p.to_vec(), None),
            Geometry::IndexedTriangles { positions, indices } => (
                Topology::IndexedTriangles,
                positions.to_vec(),
                Some(indices.to_vec()),
            ),
        };
        self.events.push(SurfaceEvent::Draw(RecordedDraw {
            topology,
            positions,
            indices,
            model: call.model,
            color: call.color,
        }));
    }
}
