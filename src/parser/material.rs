//! MTL material library parsing
//!
//! Line-oriented: blank lines are skipped, `#` comment lines are recorded
//! with their 1-based line number, every other line is whitespace-tokenized
//! and dispatched on its first token. A `newmtl` record opens a new material
//! that subsequent attribute records mutate until the next `newmtl` or end
//! of file.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
use crate::model::{AttrValue, Material, MaterialAttr, MaterialLibrary};
use crate::pathify::pathify;

/// The closed set of MTL directives
///
/// Matched exhaustively; anything outside the set lands on `Unknown` and is
/// reported as a non-fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MtlDirective {
    NewMtl,
    Ns,
    D,
    Tr,
    Ni,
    Illum,
    Kd,
    Ka,
    Ks,
    Ke,
    MapKd,
    MapBump,
    MapKs,
    Bump,
    Unknown,
}

impl MtlDirective {
    fn from_token(token: &str) -> Self {
        match token {
            "newmtl" => MtlDirective::NewMtl,
            "Ns" => MtlDirective::Ns,
            "d" => MtlDirective::D,
            "Tr" => MtlDirective::Tr,
            "Ni" => MtlDirective::Ni,
            "illum" => MtlDirective::Illum,
            "Kd" => MtlDirective::Kd,
            "Ka" => MtlDirective::Ka,
            "Ks" => MtlDirective::Ks,
            "Ke" => MtlDirective::Ke,
            "map_Kd" => MtlDirective::MapKd,
            "map_Bump" | "map_bump" => MtlDirective::MapBump,
            "map_Ks" => MtlDirective::MapKs,
            "bump" => MtlDirective::Bump,
            _ => MtlDirective::Unknown,
        }
    }
}

/// Parse an MTL file into a material library
///
/// Texture paths are resolved against the file's own directory. Fails with
/// [`Error::Io`] if the file cannot be opened.
pub fn parse_mtl<P: AsRef<Path>>(path: P) -> Result<MaterialLibrary> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let library = parse_mtl_source(&source, base_dir)?;
    debug!(
        "parsed {} materials from {}",
        library.len(),
        path.display()
    );
    Ok(library)
}

/// Parse MTL source text, resolving texture paths against `base_dir`
pub fn parse_mtl_source(source: &str, base_dir: &Path) -> Result<MaterialLibrary> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<Material> = None;

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            library.diagnostics.push(Diagnostic::comment(line_no, line));
            continue;
        }

        let mut tokens = line.split_whitespace();
        let first = match tokens.next() {
            Some(token) => token,
            None => continue,
        };

        match MtlDirective::from_token(first) {
            MtlDirective::NewMtl => {
                if let Some(finished) = current.take() {
                    library.insert(finished);
                }
                let name = tokens
                    .next()
                    .ok_or_else(|| Error::missing_argument("newmtl", line_no))?;
                current = Some(Material::new(name));
            }
            MtlDirective::Ns => {
                let value = parse_scalar(&mut tokens, "Ns", line_no)?;
                target(&mut current, "Ns", line_no)?.set(MaterialAttr::Ns, value);
            }
            MtlDirective::D => {
                let value = parse_scalar(&mut tokens, "d", line_no)?;
                target(&mut current, "d", line_no)?.set(MaterialAttr::D, value);
            }
            MtlDirective::Tr => {
                let value = parse_scalar(&mut tokens, "Tr", line_no)?;
                target(&mut current, "Tr", line_no)?.set(MaterialAttr::Tr, value);
            }
            MtlDirective::Ni => {
                let value = parse_scalar(&mut tokens, "Ni", line_no)?;
                target(&mut current, "Ni", line_no)?.set(MaterialAttr::Ni, value);
            }
            MtlDirective::Illum => {
                let token = tokens
                    .next()
                    .ok_or_else(|| Error::missing_argument("illum", line_no))?;
                let value: i64 = token
                    .parse()
                    .map_err(|_| Error::parse_token("illum", token, line_no))?;
                target(&mut current, "illum", line_no)?
                    .set(MaterialAttr::Illum, AttrValue::Int(value));
            }
            MtlDirective::Kd => {
                let value = parse_triple(&mut tokens, "Kd", line_no)?;
                target(&mut current, "Kd", line_no)?.set(MaterialAttr::Kd, value);
            }
            MtlDirective::Ka => {
                let value = parse_triple(&mut tokens, "Ka", line_no)?;
                target(&mut current, "Ka", line_no)?.set(MaterialAttr::Ka, value);
            }
            MtlDirective::Ks => {
                let value = parse_triple(&mut tokens, "Ks", line_no)?;
                target(&mut current, "Ks", line_no)?.set(MaterialAttr::Ks, value);
            }
            MtlDirective::Ke => {
                let value = parse_triple(&mut tokens, "Ke", line_no)?;
                target(&mut current, "Ke", line_no)?.set(MaterialAttr::Ke, value);
            }
            MtlDirective::MapKd => {
                let value = parse_map(&mut tokens, "map_Kd", line_no, base_dir, &mut library)?;
                target(&mut current, "map_Kd", line_no)?.set(MaterialAttr::MapKd, value);
            }
            MtlDirective::MapBump => {
                let value = parse_map(&mut tokens, "map_Bump", line_no, base_dir, &mut library)?;
                target(&mut current, "map_Bump", line_no)?.set(MaterialAttr::MapBump, value);
            }
            MtlDirective::MapKs => {
                let value = parse_map(&mut tokens, "map_Ks", line_no, base_dir, &mut library)?;
                target(&mut current, "map_Ks", line_no)?.set(MaterialAttr::MapKs, value);
            }
            MtlDirective::Bump => {
                let value = parse_map(&mut tokens, "bump", line_no, base_dir, &mut library)?;
                target(&mut current, "bump", line_no)?.set(MaterialAttr::Bump, value);
            }
            MtlDirective::Unknown => {
                warn!("line {}: unrecognized MTL directive '{}'", line_no, first);
                library.diagnostics.push(Diagnostic::new(
                    line_no,
                    DiagnosticKind::UnknownDirective,
                    first,
                ));
            }
        }
    }

    if let Some(finished) = current.take() {
        library.insert(finished);
    }
    Ok(library)
}

/// Borrow the current material or fail: an attribute record with no
/// preceding `newmtl` is a structural error
fn target<'a>(
    current: &'a mut Option<Material>,
    directive: &str,
    line: usize,
) -> Result<&'a mut Material> {
    current.as_mut().ok_or_else(|| Error::NoCurrentMaterial {
        directive: directive.to_string(),
        line,
    })
}

fn parse_scalar<'a, I>(tokens: &mut I, directive: &str, line: usize) -> Result<AttrValue>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| Error::missing_argument(directive, line))?;
    let value: f64 = token
        .parse()
        .map_err(|_| Error::parse_token(directive, token, line))?;
    Ok(AttrValue::Scalar(value))
}

fn parse_triple<'a, I>(tokens: &mut I, directive: &str, line: usize) -> Result<AttrValue>
where
    I: Iterator<Item = &'a str>,
{
    let mut triple = [0.0_f64; 3];
    for slot in &mut triple {
        let token = tokens
            .next()
            .ok_or_else(|| Error::missing_argument(directive, line))?;
        *slot = token
            .parse()
            .map_err(|_| Error::parse_token(directive, token, line))?;
    }
    Ok(AttrValue::Triple(triple))
}

fn parse_map<'a, I>(
    tokens: &mut I,
    directive: &str,
    line: usize,
    base_dir: &Path,
    library: &mut MaterialLibrary,
) -> Result<AttrValue>
where
    I: Iterator<Item = &'a str>,
{
    let raw = tokens
        .next()
        .ok_or_else(|| Error::missing_argument(directive, line))?;
    let (resolved, diag) = pathify(raw, base_dir, line);
    if let Some(diag) = diag {
        library.diagnostics.push(diag);
    }
    Ok(AttrValue::Path(resolved))
}
