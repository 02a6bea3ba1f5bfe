//! Error types for OBJ/MTL conversion
//!
//! Fatal errors abort the conversion of the current input file and are
//! reported to the caller; a batch driver is expected to catch them per file
//! and continue. Non-fatal findings (unknown directives, unresolved texture
//! paths, comments) travel on the side as [`Diagnostic`] records and never
//! abort a parse.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! - **E1xxx**: I/O errors
//! - **E2xxx**: format and reference errors
//!
//! ## Fatal Error Codes
//!
//! - `E1001`: I/O error opening or reading a file
//! - `E2001`: malformed face/line vertex reference
//! - `E2002`: vertex reference index out of range
//! - `E2003`: numeric token failed to parse
//! - `E2004`: MTL attribute record before any `newmtl`

use std::io;
use thiserror::Error;

/// Result type for OBJ/MTL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort conversion of the current input file
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while opening or reading a file
    ///
    /// **Error Code**: E1001
    ///
    /// Raised for the OBJ file itself and for any MTL file referenced by a
    /// `mtllib` directive.
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// A face/line vertex token had an invalid number of `/` components
    ///
    /// **Error Code**: E2001
    ///
    /// Valid references carry 1, 2, or 3 slash-separated components mapping
    /// positionally to (position, uv, normal). Anything else is malformed.
    #[error("[E2001] malformed vertex reference '{token}' on line {line}: expected 1-3 '/'-separated components")]
    MalformedVertexReference {
        /// The offending reference token as written in the file
        token: String,
        /// 1-based source line number
        line: usize,
    },

    /// A 1-based vertex reference index resolved outside its attribute list
    ///
    /// **Error Code**: E2002
    ///
    /// Index 0 is always out of range (OBJ indices start at 1). Negative
    /// (relative) indices are not supported by this converter.
    #[error("[E2002] dangling {kind} reference: index {index} outside 1..={len}")]
    DanglingReference {
        /// Which attribute list the index pointed into ("position", "uv", "normal")
        kind: &'static str,
        /// The 1-based index as written in the file
        index: usize,
        /// Length of the attribute list at assembly time
        len: usize,
    },

    /// A numeric token failed to parse
    ///
    /// **Error Code**: E2003
    #[error("[E2003] parse error: {0}")]
    Parse(String),

    /// An MTL attribute record appeared before any `newmtl`
    ///
    /// **Error Code**: E2004
    ///
    /// MTL attribute lines mutate the current material; with no `newmtl`
    /// seen yet there is no target and the library is structurally invalid.
    #[error("[E2004] MTL directive '{directive}' on line {line} before any 'newmtl'")]
    NoCurrentMaterial {
        /// The attribute directive that had no material target
        directive: String,
        /// 1-based source line number
        line: usize,
    },
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::Parse(format!("failed to parse floating-point number: {}", err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse(format!("failed to parse integer: {}", err))
    }
}

impl Error {
    /// Create a Parse error for a named field and the token that failed
    pub fn parse_token(field: &str, token: &str, line: usize) -> Self {
        Error::Parse(format!(
            "line {}: failed to parse {} from '{}'",
            line, field, token
        ))
    }

    /// Create a Parse error for a directive missing its argument
    pub fn missing_argument(directive: &str, line: usize) -> Self {
        Error::Parse(format!(
            "line {}: directive '{}' is missing its argument",
            line, directive
        ))
    }
}

/// Classification of a non-fatal parse finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unrecognized first token in an OBJ or MTL line; line skipped
    UnknownDirective,
    /// `usemtl` named a material absent from every imported library
    UnknownMaterial,
    /// A `map_*` texture path did not resolve to an existing file
    UnresolvedTexturePath,
    /// A malformed vertex reference dropped in lenient mode
    MalformedReference,
    /// An `s` smoothing-group toggle; recognized but has no model effect
    SmoothingGroup,
    /// A `#` comment line, recorded for reference
    Comment,
}

/// A non-fatal finding collected during parsing
///
/// Diagnostics never abort a conversion. They are retained on the owning
/// [`ObjDocument`](crate::ObjDocument) or
/// [`MaterialLibrary`](crate::MaterialLibrary) and additionally logged at
/// `warn` level (comments and smoothing groups at `debug`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line number
    pub line: usize,
    /// What kind of finding this is
    pub kind: DiagnosticKind,
    /// Human-readable detail (the directive, the material name, the path)
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(line: usize, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }

    /// Record a comment line
    pub fn comment(line: usize, text: impl Into<String>) -> Self {
        Self::new(line, DiagnosticKind::Comment, text)
    }
}
