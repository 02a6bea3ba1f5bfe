//! # objscene
//!
//! A pure Rust converter from Wavefront OBJ/MTL text geometry into an
//! indexed, grouped in-memory scene graph ready for an external scene-file
//! serializer.
//!
//! OBJ declares objects, groups, and materials as running state applying to
//! subsequently declared records, with per-vertex attribute indices stored
//! separately from the data they reference. This crate reconstructs a
//! normalized, queryable model from that flat, order-dependent stream:
//!
//! - parse OBJ text (importing MTL libraries on `mtllib`) into an
//!   [`ObjDocument`]
//! - assemble the document into a [`SceneGraph`] partitioned by
//!   object/group, with per-group vertex pools and material attachments
//! - hand the scene graph to a [`SceneEmitter`] together with a
//!   [`PostProcess`] request set
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> objscene::Result<()> {
//! let scene = objscene::convert("model.obj")?;
//!
//! for object in &scene.objects {
//!     for group in &object.groups {
//!         println!(
//!             "{}/{}: {} vertices, {} primitives",
//!             object.name,
//!             group.name,
//!             group.pool.vertices.len(),
//!             group.primitives.len()
//!         );
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assembler;
pub mod error;
pub mod model;
pub mod parser;
pub mod pathify;
pub mod scene;

pub use assembler::assemble;
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use model::{
    AttrValue, DEFAULT_GROUP, DEFAULT_OBJECT, FilterMode, GroupKey, Material, MaterialAttr,
    MaterialLibrary, ObjDocument, PrimitiveRecord, ShadingRef, TaggedPosition, TextureRef, Vec2,
    Vec3, VertexRef, WrapMode,
};
pub use parser::{
    ParserOptions, parse_mtl, parse_mtl_source, parse_obj, parse_obj_source,
    parse_obj_with_options,
};
pub use scene::{
    GroupNode, ObjectNode, PoolVertex, PostProcess, Primitive, PrimitiveKind, SceneEmitter,
    SceneGraph, VertexPool,
};

use std::path::Path;

/// Convert an OBJ file into a scene graph with default options
///
/// Parses the file (importing any referenced material libraries) and
/// assembles the result. Fails with [`Error::Io`] for unreadable files and
/// with the parse/assembly errors documented on [`error::Error`].
pub fn convert<P: AsRef<Path>>(path: P) -> Result<SceneGraph> {
    convert_with_options(path, &ParserOptions::default())
}

/// Convert an OBJ file into a scene graph with explicit parser options
pub fn convert_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParserOptions,
) -> Result<SceneGraph> {
    let doc = parser::parse_obj_with_options(path, options)?;
    assemble(&doc)
}
