//! Core OBJ document types
//!
//! An [`ObjDocument`] is the normalized in-memory form of one OBJ file: flat
//! attribute lists (positions, UVs, normals), primitive records annotated
//! with the object/group/material state that was current when they were
//! declared, and the flattened contents of every imported material library.

use std::collections::HashMap;

use crate::error::Diagnostic;
use crate::model::material::{Material, MaterialLibrary};

/// Name of the implicit object every document starts in
pub const DEFAULT_OBJECT: &str = "defaultobject";

/// Name of the implicit group every document starts in
pub const DEFAULT_GROUP: &str = "defaultgroup";

/// A 2D point (texture coordinate)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    /// U coordinate
    pub u: f64,
    /// V coordinate
    pub v: f64,
}

impl Vec2 {
    /// Create a new 2D point
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }
}

/// A 3D point or direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vec3 {
    /// Create a new 3D point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One `f`/`l` vertex token: up to three optional 1-based indices
///
/// Indices are stored exactly as written in the file; resolution to the
/// 0-based attribute lists happens during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    /// 1-based position index (mandatory)
    pub position: usize,
    /// 1-based texture coordinate index, absent if the component was empty
    pub uv: Option<usize>,
    /// 1-based normal index, absent if the component was empty
    pub normal: Option<usize>,
}

impl VertexRef {
    /// Create a position-only reference
    pub fn position(position: usize) -> Self {
        Self {
            position,
            uv: None,
            normal: None,
        }
    }
}

/// Snapshot of the parser's running state at a declaration
///
/// OBJ declares object, group, and material as running state that applies to
/// subsequent records. Positions carry the snapshot taken when the `v` line
/// was read; primitives carry their own snapshot taken at the `f`/`l` line,
/// independent of the snapshots on the underlying positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Current object name
    pub object: String,
    /// Current group name
    pub group: String,
    /// Current material name, if a known `usemtl` was in effect
    pub material: Option<String>,
}

impl GroupKey {
    /// The snapshot at the start of a document, before any `o`/`g`/`usemtl`
    pub fn initial() -> Self {
        Self {
            object: DEFAULT_OBJECT.to_string(),
            group: DEFAULT_GROUP.to_string(),
            material: None,
        }
    }

    /// Whether this snapshot belongs to the given object/group pair
    pub fn matches(&self, object: &str, group: &str) -> bool {
        self.object == object && self.group == group
    }
}

/// A position together with its declaration-time state snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPosition {
    /// The position itself
    pub position: Vec3,
    /// Running state when the `v` line was declared
    pub key: GroupKey,
}

/// One face (`f`) or polyline (`l`) record
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveRecord {
    /// The vertex references in declared order
    pub refs: Vec<VertexRef>,
    /// Running state when the primitive was declared
    pub key: GroupKey,
}

/// The parsed, normalized form of one OBJ file
#[derive(Debug, Clone)]
pub struct ObjDocument {
    /// Object names in declaration order, starting with the implicit default
    pub objects: Vec<String>,
    /// Group names in declaration order, starting with the implicit default
    pub groups: Vec<String>,
    /// Positions with their declaration-time snapshots; external index `i`
    /// maps to slot `i - 1`
    pub positions: Vec<TaggedPosition>,
    /// Texture coordinates, untagged, 1-indexed by OBJ convention
    pub uvs: Vec<Vec2>,
    /// Normals, untagged, 1-indexed by OBJ convention
    pub normals: Vec<Vec3>,
    /// Face records in declaration order
    pub faces: Vec<PrimitiveRecord>,
    /// Polyline records in declaration order
    pub polylines: Vec<PrimitiveRecord>,
    /// Imported material libraries in `mtllib` order
    pub libraries: Vec<MaterialLibrary>,
    /// Flattened union of all imported libraries; later imports overwrite
    /// earlier ones on name collision
    pub materials_by_name: HashMap<String, Material>,
    /// Non-fatal findings collected while parsing
    pub diagnostics: Vec<Diagnostic>,
}

impl ObjDocument {
    /// Create an empty document containing only the implicit defaults
    pub fn new() -> Self {
        Self {
            objects: vec![DEFAULT_OBJECT.to_string()],
            groups: vec![DEFAULT_GROUP.to_string()],
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            faces: Vec::new(),
            polylines: Vec::new(),
            libraries: Vec::new(),
            materials_by_name: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Record an object name, skipping a duplicate of the most recent entry
    pub fn push_object(&mut self, name: &str) {
        if self.objects.last().map(String::as_str) != Some(name) {
            self.objects.push(name.to_string());
        }
    }

    /// Record a group name, skipping a duplicate of the most recent entry
    pub fn push_group(&mut self, name: &str) {
        if self.groups.last().map(String::as_str) != Some(name) {
            self.groups.push(name.to_string());
        }
    }

    /// Merge a parsed library into the flattened name map and retain it
    pub fn import_library(&mut self, library: MaterialLibrary) {
        for name in &library.order {
            if let Some(material) = library.materials.get(name) {
                self.materials_by_name
                    .insert(name.clone(), material.clone());
            }
        }
        self.libraries.push(library);
    }

    /// Look up a material from the flattened union of imported libraries
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials_by_name.get(name)
    }
}

impl Default for ObjDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::material::{AttrValue, MaterialAttr};

    #[test]
    fn test_new_document_has_implicit_defaults() {
        let doc = ObjDocument::new();
        assert_eq!(doc.objects, vec![DEFAULT_OBJECT.to_string()]);
        assert_eq!(doc.groups, vec![DEFAULT_GROUP.to_string()]);
        assert!(doc.positions.is_empty());
        assert!(doc.faces.is_empty());
    }

    #[test]
    fn test_push_skips_consecutive_duplicates() {
        let mut doc = ObjDocument::new();
        doc.push_group("wheel");
        doc.push_group("wheel");
        doc.push_group("body");
        doc.push_group("wheel");
        assert_eq!(
            doc.groups,
            vec![
                DEFAULT_GROUP.to_string(),
                "wheel".to_string(),
                "body".to_string(),
                "wheel".to_string()
            ]
        );
    }

    #[test]
    fn test_import_library_later_wins() {
        let mut doc = ObjDocument::new();

        let mut lib1 = MaterialLibrary::new();
        let mut red = Material::new("red");
        red.set(MaterialAttr::Kd, AttrValue::Triple([1.0, 0.0, 0.0]));
        lib1.insert(red);
        doc.import_library(lib1);

        let mut lib2 = MaterialLibrary::new();
        let mut red2 = Material::new("red");
        red2.set(MaterialAttr::Kd, AttrValue::Triple([0.9, 0.1, 0.1]));
        lib2.insert(red2);
        doc.import_library(lib2);

        assert_eq!(doc.libraries.len(), 2);
        assert_eq!(
            doc.material("red")
                .unwrap()
                .get(MaterialAttr::Kd)
                .and_then(AttrValue::as_triple),
            Some([0.9, 0.1, 0.1])
        );
    }

    #[test]
    fn test_group_key_matches() {
        let key = GroupKey {
            object: "car".to_string(),
            group: "wheel".to_string(),
            material: None,
        };
        assert!(key.matches("car", "wheel"));
        assert!(!key.matches("car", "body"));
    }
}
