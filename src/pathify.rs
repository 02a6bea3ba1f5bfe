//! Best-effort texture path resolution
//!
//! MTL files frequently carry texture paths from another machine: absolute
//! Windows paths, backslash separators, mismatched case. Resolution never
//! fails; when nothing on disk matches, the final path segment is returned
//! as written so the emitter still has something to reference.

use std::path::Path;

use log::warn;

use crate::error::{Diagnostic, DiagnosticKind};

/// Resolve a raw `map_*` path against a base directory
///
/// If `base_dir/raw` names an existing file the raw path is returned
/// unchanged. Otherwise the path is lower-cased, backslashes are normalized
/// to forward slashes, and the final segment alone is retried. If that still
/// does not exist, the final segment is returned anyway together with an
/// [`UnresolvedTexturePath`](DiagnosticKind::UnresolvedTexturePath)
/// diagnostic carrying the given line number.
pub fn pathify(raw: &str, base_dir: &Path, line: usize) -> (String, Option<Diagnostic>) {
    if base_dir.join(raw).is_file() {
        return (raw.to_string(), None);
    }

    let normalized = raw.to_lowercase().replace('\\', "/");
    let basename = normalized
        .rsplit('/')
        .next()
        .unwrap_or(normalized.as_str())
        .to_string();
    if base_dir.join(&basename).is_file() {
        return (basename, None);
    }

    warn!("texture path '{}' not found, using '{}'", raw, basename);
    let diag = Diagnostic::new(
        line,
        DiagnosticKind::UnresolvedTexturePath,
        format!("'{}' not found, using '{}'", raw, basename),
    );
    (basename, Some(diag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_existing_path_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Maps")).unwrap();
        fs::write(dir.path().join("Maps/Crate.PNG"), b"png").unwrap();

        let (path, diag) = pathify("Maps/Crate.PNG", dir.path(), 1);
        assert_eq!(path, "Maps/Crate.PNG");
        assert!(diag.is_none());
    }

    #[test]
    fn test_fallback_to_lowercased_basename() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("crate.png"), b"png").unwrap();

        let (path, diag) = pathify(r"C:\Textures\Crate.PNG", dir.path(), 4);
        assert_eq!(path, "crate.png");
        assert!(diag.is_none());
    }

    #[test]
    fn test_missing_file_warns_and_returns_basename() {
        let dir = tempfile::tempdir().unwrap();

        let (path, diag) = pathify(r"old\textures\Hull.JPG", dir.path(), 9);
        assert_eq!(path, "hull.jpg");
        let diag = diag.unwrap();
        assert_eq!(diag.kind, DiagnosticKind::UnresolvedTexturePath);
        assert_eq!(diag.line, 9);
    }
}
