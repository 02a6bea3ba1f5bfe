//! Assembled scene graph and the emitter boundary
//!
//! The scene graph is the finished output of a conversion: a root container
//! of named object nodes, each holding named group nodes, each holding one
//! vertex pool and the primitives drawn from it. It is built once per
//! conversion and handed by value to an external [`SceneEmitter`], which
//! owns serialization and all geometry post-processing.

use crate::error::Result;
use crate::model::{ShadingRef, TextureRef, Vec2, Vec3};

/// A resolved vertex in a group's pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolVertex {
    /// Position, resolved from the document's position list
    pub position: Vec3,
    /// Texture coordinate, when the reference carried a uv index
    pub uv: Option<Vec2>,
    /// Normal, when the reference carried a normal index
    pub normal: Option<Vec3>,
}

/// A named container of resolved vertices feeding one group's primitives
#[derive(Debug, Clone)]
pub struct VertexPool {
    /// Pool name, `<object>.<group>`
    pub name: String,
    /// Vertices in insertion order; one entry per primitive vertex reference
    pub vertices: Vec<PoolVertex>,
}

impl VertexPool {
    /// Create an empty pool
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
        }
    }

    /// Append a vertex and return its pool index
    pub fn push(&mut self, vertex: PoolVertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }
}

/// Kind of an output primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// A polygon of three or more pool vertices
    Polygon,
    /// A polyline of two or more pool vertices
    Polyline,
}

/// One output primitive, referencing vertices in its group's pool
///
/// Texture reference and flat color may both be present at once; this layer
/// does not decide precedence between them, the emitter does.
#[derive(Debug, Clone)]
pub struct Primitive {
    /// Polygon or polyline
    pub kind: PrimitiveKind,
    /// Indices into the owning group's vertex pool, in declared order
    pub vertices: Vec<usize>,
    /// Texture descriptor, when the primitive's material is textured
    pub texture: Option<TextureRef>,
    /// Shading descriptor, when the primitive's material is textured
    pub shading: Option<ShadingRef>,
    /// Flat RGBA fallback color from the material's `Kd`
    pub color: Option<[f64; 4]>,
}

/// A named group node: one vertex pool plus the primitives drawn from it
#[derive(Debug, Clone)]
pub struct GroupNode {
    /// Group name as declared by `g` (or the implicit default)
    pub name: String,
    /// This group's vertex pool
    pub pool: VertexPool,
    /// Primitives in declaration order
    pub primitives: Vec<Primitive>,
}

/// A named object node holding the group nodes declared under it
#[derive(Debug, Clone)]
pub struct ObjectNode {
    /// Object name as declared by `o` (or the implicit default)
    pub name: String,
    /// Group nodes with at least one primitive
    pub groups: Vec<GroupNode>,
}

/// The root of an assembled scene
///
/// Only objects and groups that contributed at least one primitive appear;
/// empty nodes are never created.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    /// Object nodes in declaration order
    pub objects: Vec<ObjectNode>,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of primitives across all nodes
    pub fn primitive_count(&self) -> usize {
        self.objects
            .iter()
            .flat_map(|o| &o.groups)
            .map(|g| g.primitives.len())
            .sum()
    }

    /// Find an object node by name
    pub fn object(&self, name: &str) -> Option<&ObjectNode> {
        self.objects.iter().find(|o| o.name == name)
    }
}

impl ObjectNode {
    /// Find a group node by name
    pub fn group(&self, name: &str) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Post-processing request set passed to the emitter
///
/// The converter only issues these requests; the transformations themselves
/// belong to the emitter's side of the boundary.
#[derive(Debug, Clone)]
pub struct PostProcess {
    /// Regenerate vertex normals, merging faces within this angle (degrees)
    pub recompute_normals: Option<f64>,
    /// Generate tangent/binormal per vertex
    pub recompute_tangents: bool,
    /// Drop pool vertices referenced by no primitive
    pub remove_unused_vertices: bool,
    /// Split non-triangular polygons
    pub triangulate: bool,
    /// Regenerate per-polygon normals
    pub recompute_polygon_normals: bool,
}

impl Default for PostProcess {
    fn default() -> Self {
        Self {
            recompute_normals: None,
            recompute_tangents: false,
            remove_unused_vertices: true,
            triangulate: true,
            recompute_polygon_normals: false,
        }
    }
}

impl PostProcess {
    /// Create the default request set
    pub fn new() -> Self {
        Self::default()
    }

    /// Request vertex normal regeneration with the given smoothing angle
    pub fn with_normals(mut self, degrees: f64) -> Self {
        self.recompute_normals = Some(degrees);
        self
    }

    /// Request tangent/binormal generation
    pub fn with_tangents(mut self) -> Self {
        self.recompute_tangents = true;
        self
    }
}

/// The boundary an external scene serializer implements
///
/// The emitter receives the finished scene graph by value together with the
/// post-processing request set and renders it to its destination format.
pub trait SceneEmitter {
    /// Emit one assembled scene
    fn emit(&mut self, scene: SceneGraph, post: &PostProcess) -> Result<()>;
}
