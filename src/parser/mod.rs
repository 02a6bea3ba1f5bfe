//! OBJ geometry document parsing
//!
//! OBJ is a stateful, line-oriented format: `o`, `g`, and `usemtl` set
//! running state that applies to records declared after them rather than
//! opening any nested structure. The parser threads that state through a
//! parser-local [`ParserState`] (one per `parse` call, never a global) and
//! snapshots it onto every position and primitive as it is declared.

mod material;

pub use material::{parse_mtl, parse_mtl_source};

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
use crate::model::{
    DEFAULT_GROUP, DEFAULT_OBJECT, GroupKey, ObjDocument, PrimitiveRecord, TaggedPosition, Vec2,
    Vec3, VertexRef,
};

/// Options controlling OBJ parsing behavior
///
/// The defaults implement the strict contract; the lenient toggle restores
/// the older drop-and-continue handling of malformed face references.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Drop a malformed vertex reference with a diagnostic instead of
    /// failing the whole file
    pub lenient_references: bool,
}

impl ParserOptions {
    /// Create options with the strict defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable lenient handling of malformed vertex references
    pub fn lenient(mut self) -> Self {
        self.lenient_references = true;
        self
    }
}

/// The closed set of OBJ directives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjDirective {
    Position,
    Uv,
    Normal,
    Face,
    Polyline,
    Group,
    Object,
    MtlLib,
    UseMtl,
    Smoothing,
    Unknown,
}

impl ObjDirective {
    fn from_token(token: &str) -> Self {
        match token {
            "v" => ObjDirective::Position,
            "vt" => ObjDirective::Uv,
            "vn" => ObjDirective::Normal,
            "f" => ObjDirective::Face,
            "l" => ObjDirective::Polyline,
            "g" => ObjDirective::Group,
            "o" => ObjDirective::Object,
            "mtllib" => ObjDirective::MtlLib,
            "usemtl" => ObjDirective::UseMtl,
            "s" => ObjDirective::Smoothing,
            _ => ObjDirective::Unknown,
        }
    }
}

/// Running parse state: the object/group/material that applies to records
/// declared from here on
struct ParserState {
    object: String,
    group: String,
    material: Option<String>,
}

impl ParserState {
    fn new() -> Self {
        Self {
            object: DEFAULT_OBJECT.to_string(),
            group: DEFAULT_GROUP.to_string(),
            material: None,
        }
    }

    fn snapshot(&self) -> GroupKey {
        GroupKey {
            object: self.object.clone(),
            group: self.group.clone(),
            material: self.material.clone(),
        }
    }
}

/// Parse an OBJ file into a document
///
/// `mtllib` references and texture paths are resolved against the file's own
/// directory. Fails with [`Error::Io`] if the file (or a referenced MTL
/// file) cannot be opened.
pub fn parse_obj<P: AsRef<Path>>(path: P) -> Result<ObjDocument> {
    parse_obj_with_options(path, &ParserOptions::default())
}

/// Parse an OBJ file with explicit options
pub fn parse_obj_with_options<P: AsRef<Path>>(
    path: P,
    options: &ParserOptions,
) -> Result<ObjDocument> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let doc = parse_obj_source(&source, base_dir, options)?;
    debug!(
        "parsed {}: {} positions, {} faces, {} polylines, {} materials",
        path.display(),
        doc.positions.len(),
        doc.faces.len(),
        doc.polylines.len(),
        doc.materials_by_name.len()
    );
    Ok(doc)
}

/// Parse OBJ source text, resolving `mtllib` paths against `base_dir`
pub fn parse_obj_source(
    source: &str,
    base_dir: &Path,
    options: &ParserOptions,
) -> Result<ObjDocument> {
    let mut doc = ObjDocument::new();
    let mut state = ParserState::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            doc.diagnostics.push(Diagnostic::comment(line_no, line));
            continue;
        }

        let mut tokens = line.split_whitespace();
        let first = match tokens.next() {
            Some(token) => token,
            None => continue,
        };

        match ObjDirective::from_token(first) {
            ObjDirective::Position => {
                let [x, y, z] = parse_floats(&mut tokens, "v", line_no)?;
                doc.positions.push(TaggedPosition {
                    position: Vec3::new(x, y, z),
                    key: state.snapshot(),
                });
            }
            ObjDirective::Uv => {
                // Optional third (w) component is accepted and dropped
                let mut floats = [0.0_f64; 2];
                for (i, slot) in floats.iter_mut().enumerate() {
                    let token = tokens
                        .next()
                        .ok_or_else(|| Error::missing_argument("vt", line_no))?;
                    *slot = token.parse().map_err(|_| {
                        Error::parse_token(["u", "v"][i], token, line_no)
                    })?;
                }
                doc.uvs.push(Vec2::new(floats[0], floats[1]));
            }
            ObjDirective::Normal => {
                let [x, y, z] = parse_floats(&mut tokens, "vn", line_no)?;
                doc.normals.push(Vec3::new(x, y, z));
            }
            ObjDirective::Face => {
                let refs = parse_refs(&mut tokens, line_no, options, &mut doc.diagnostics)?;
                doc.faces.push(PrimitiveRecord {
                    refs,
                    key: state.snapshot(),
                });
            }
            ObjDirective::Polyline => {
                let refs = parse_refs(&mut tokens, line_no, options, &mut doc.diagnostics)?;
                doc.polylines.push(PrimitiveRecord {
                    refs,
                    key: state.snapshot(),
                });
            }
            ObjDirective::Group => {
                // Close the current group; switching group leaves the
                // current object untouched
                state.group = DEFAULT_GROUP.to_string();
                if let Some(name) = tokens.next() {
                    state.group = name.to_string();
                    doc.push_group(name);
                }
            }
            ObjDirective::Object => {
                // Symmetric to `g`; does not reset the current group
                state.object = DEFAULT_OBJECT.to_string();
                if let Some(name) = tokens.next() {
                    state.object = name.to_string();
                    doc.push_object(name);
                }
            }
            ObjDirective::MtlLib => {
                let arg = tokens
                    .next()
                    .ok_or_else(|| Error::missing_argument("mtllib", line_no))?;
                let mtl_path = base_dir.join(arg);
                let library = parse_mtl(&mtl_path)?;
                doc.import_library(library);
            }
            ObjDirective::UseMtl => {
                let name = tokens
                    .next()
                    .ok_or_else(|| Error::missing_argument("usemtl", line_no))?;
                if doc.materials_by_name.contains_key(name) {
                    state.material = Some(name.to_string());
                } else {
                    warn!("line {}: usemtl names unknown material '{}'", line_no, name);
                    doc.diagnostics.push(Diagnostic::new(
                        line_no,
                        DiagnosticKind::UnknownMaterial,
                        name,
                    ));
                }
            }
            ObjDirective::Smoothing => {
                // Recognized but has no effect on the model
                doc.diagnostics.push(Diagnostic::new(
                    line_no,
                    DiagnosticKind::SmoothingGroup,
                    line,
                ));
            }
            ObjDirective::Unknown => {
                warn!("line {}: unrecognized OBJ directive '{}'", line_no, first);
                doc.diagnostics.push(Diagnostic::new(
                    line_no,
                    DiagnosticKind::UnknownDirective,
                    first,
                ));
            }
        }
    }

    Ok(doc)
}

fn parse_floats<'a, I>(tokens: &mut I, directive: &str, line: usize) -> Result<[f64; 3]>
where
    I: Iterator<Item = &'a str>,
{
    let mut floats = [0.0_f64; 3];
    for slot in &mut floats {
        let token = tokens
            .next()
            .ok_or_else(|| Error::missing_argument(directive, line))?;
        *slot = token
            .parse()
            .map_err(|_| Error::parse_token(directive, token, line))?;
    }
    Ok(floats)
}

fn parse_refs<'a, I>(
    tokens: &mut I,
    line: usize,
    options: &ParserOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<VertexRef>>
where
    I: Iterator<Item = &'a str>,
{
    let mut refs = Vec::new();
    for token in tokens {
        match parse_vertex_ref(token, line) {
            Ok(vertex_ref) => refs.push(vertex_ref),
            Err(err @ Error::MalformedVertexReference { .. }) if options.lenient_references => {
                warn!("dropping malformed reference: {}", err);
                diagnostics.push(Diagnostic::new(
                    line,
                    DiagnosticKind::MalformedReference,
                    token,
                ));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(refs)
}

/// Parse one `f`/`l` vertex token into its optional index triple
///
/// Valid tokens carry 1, 2, or 3 `/`-separated components mapping
/// positionally to (position, uv, normal); an empty component between
/// slashes means the field is absent, not zero.
fn parse_vertex_ref(token: &str, line: usize) -> Result<VertexRef> {
    let malformed = || Error::MalformedVertexReference {
        token: token.to_string(),
        line,
    };

    let parts: Vec<&str> = token.split('/').collect();
    if parts.len() > 3 || parts[0].is_empty() {
        return Err(malformed());
    }

    let position: usize = parts[0]
        .parse()
        .map_err(|_| Error::parse_token("position index", parts[0], line))?;

    let parse_opt = |part: Option<&&str>, field: &str| -> Result<Option<usize>> {
        match part {
            Some(text) if !text.is_empty() => {
                let index = text
                    .parse()
                    .map_err(|_| Error::parse_token(field, text, line))?;
                Ok(Some(index))
            }
            _ => Ok(None),
        }
    };

    Ok(VertexRef {
        position,
        uv: parse_opt(parts.get(1), "uv index")?,
        normal: parse_opt(parts.get(2), "normal index")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<ObjDocument> {
        parse_obj_source(source, Path::new("."), &ParserOptions::default())
    }

    #[test]
    fn test_reference_optionality() {
        let vr = parse_vertex_ref("5", 1).unwrap();
        assert_eq!(vr, VertexRef { position: 5, uv: None, normal: None });

        let vr = parse_vertex_ref("5/3", 1).unwrap();
        assert_eq!(vr, VertexRef { position: 5, uv: Some(3), normal: None });

        let vr = parse_vertex_ref("5//7", 1).unwrap();
        assert_eq!(vr, VertexRef { position: 5, uv: None, normal: Some(7) });

        let vr = parse_vertex_ref("5/3/7", 1).unwrap();
        assert_eq!(vr, VertexRef { position: 5, uv: Some(3), normal: Some(7) });
    }

    #[test]
    fn test_too_many_components_is_malformed() {
        let err = parse_vertex_ref("1/2/3/4", 8).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedVertexReference { line: 8, .. }
        ));
    }

    #[test]
    fn test_malformed_reference_fails_the_file() {
        let err = parse("v 0 0 0\nf 1/2/3/4\n").unwrap_err();
        assert!(matches!(err, Error::MalformedVertexReference { .. }));
    }

    #[test]
    fn test_lenient_mode_drops_malformed_reference() {
        let options = ParserOptions::new().lenient();
        let doc = parse_obj_source(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2/x/y/z 3\n",
            Path::new("."),
            &options,
        )
        .unwrap();
        assert_eq!(doc.faces.len(), 1);
        assert_eq!(doc.faces[0].refs.len(), 2);
        assert!(
            doc.diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::MalformedReference)
        );
    }

    #[test]
    fn test_default_containers() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(doc.faces.len(), 1);
        assert_eq!(doc.faces[0].key.object, DEFAULT_OBJECT);
        assert_eq!(doc.faces[0].key.group, DEFAULT_GROUP);
        assert_eq!(doc.faces[0].key.material, None);
    }

    #[test]
    fn test_transition_asymmetry_group_survives_object_switch() {
        let doc = parse(
            "o A\ng B\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no C\nf 1 2 3\n",
        )
        .unwrap();
        assert_eq!(doc.faces[0].key.object, "A");
        assert_eq!(doc.faces[0].key.group, "B");
        assert_eq!(doc.faces[1].key.object, "C");
        assert_eq!(doc.faces[1].key.group, "B");
    }

    #[test]
    fn test_positions_carry_declaration_snapshot() {
        // Positions record their own declaration-time snapshot
        let doc = parse("v 0 0 0\no A\nv 1 0 0\n").unwrap();
        assert_eq!(doc.positions[0].key.object, DEFAULT_OBJECT);
        assert_eq!(doc.positions[1].key.object, "A");
    }

    #[test]
    fn test_group_without_name_resets_to_default() {
        let doc = parse(
            "g lid\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\ng\nf 1 2 3\n",
        )
        .unwrap();
        assert_eq!(doc.faces[0].key.group, "lid");
        assert_eq!(doc.faces[1].key.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_repeated_group_name_not_duplicated() {
        let doc = parse("g a\ng a\ng b\n").unwrap();
        assert_eq!(
            doc.groups,
            vec![DEFAULT_GROUP.to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_unknown_material_is_non_fatal_and_state_unchanged() {
        let doc = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl ghost\nf 1 2 3\n",
        )
        .unwrap();
        assert_eq!(doc.faces[0].key.material, None);
        assert!(
            doc.diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::UnknownMaterial && d.message == "ghost")
        );
    }

    #[test]
    fn test_smoothing_group_recorded_but_ignored() {
        let doc = parse("s 1\nv 0 0 0\n").unwrap();
        assert_eq!(doc.positions.len(), 1);
        assert!(
            doc.diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::SmoothingGroup)
        );
    }

    #[test]
    fn test_unknown_directive_skipped() {
        let doc = parse("vp 0.5 0.5\nv 0 0 0\n").unwrap();
        assert_eq!(doc.positions.len(), 1);
        assert!(
            doc.diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::UnknownDirective && d.message == "vp")
        );
    }

    #[test]
    fn test_polylines_parsed_separately_from_faces() {
        let doc = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nl 1 2\n").unwrap();
        assert_eq!(doc.faces.len(), 1);
        assert_eq!(doc.polylines.len(), 1);
        assert_eq!(doc.polylines[0].refs.len(), 2);
    }

    #[test]
    fn test_uv_third_component_dropped() {
        let doc = parse("vt 0.25 0.75 0.0\n").unwrap();
        assert_eq!(doc.uvs[0], Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_obj("/nonexistent/model.obj").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_missing_mtllib_is_io_error() {
        let err = parse("mtllib not_there.mtl\n").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
