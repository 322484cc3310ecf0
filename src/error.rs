use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while encoding or decoding the COM3D2 formats.
///
/// Every error is terminal for the current call: the caller gets either a
/// fully populated value or one of these, never a partial object.
#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    #[error("read of {field} failed: {source}")]
    #[diagnostic(code("com3d2.read_failed"))]
    Read {
        field: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("write of {field} failed: {source}")]
    #[diagnostic(code("com3d2.write_failed"))]
    Write {
        field: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{field} is truncated: wanted {expected} bytes, got {actual}")]
    #[diagnostic(code("com3d2.truncated"))]
    Truncated {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{field} has a negative length {len}")]
    #[diagnostic(code("com3d2.negative_length"))]
    NegativeLength { field: &'static str, len: i32 },
    #[error("{field} does not fit in an i32: {len}")]
    #[diagnostic(code("com3d2.length_overflow"))]
    LengthOverflow { field: &'static str, len: usize },
    #[error("{field} is not valid UTF-8")]
    #[diagnostic(code("com3d2.invalid_utf8"))]
    InvalidUtf8 { field: &'static str },
    #[error("invalid {format} signature: got {found:?}, want {expected:?}")]
    #[diagnostic(code("com3d2.signature_mismatch"))]
    SignatureMismatch {
        format: &'static str,
        found: String,
        expected: &'static str,
    },
    #[error("unrecognized collider type {tag:?}")]
    #[diagnostic(code("com3d2.unknown_collider"))]
    UnknownColliderTag { tag: String },
    #[error("unknown material property type {tag:?}")]
    #[diagnostic(code("com3d2.unknown_property"))]
    UnknownPropertyTag { tag: String },
    #[error("unknown texture property sub tag {tag:?}")]
    #[diagnostic(code("com3d2.unknown_tex_sub_tag"))]
    UnknownTextureSubTag { tag: String },
    #[error("unknown texture format {value}")]
    #[diagnostic(code("com3d2.unknown_texture_format"))]
    UnknownTextureFormat { value: i32 },
    #[error("encoding a version {version} .tex is not supported: the legacy layout does not store width and height")]
    #[diagnostic(code("com3d2.legacy_tex_encode"))]
    LegacyTexEncode { version: i32 },
    #[error(".tex texture format is not set")]
    #[diagnostic(code("com3d2.missing_texture_format"))]
    MissingTextureFormat,
    #[error("{kind} at index {index}: {source}")]
    #[diagnostic(code("com3d2.element"))]
    Element {
        kind: &'static str,
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
    #[error("json error: {0}")]
    #[diagnostic(code("com3d2.json"))]
    Json(#[from] serde_json::Error),
    #[error("io error on {}: {source}", .path.display())]
    #[diagnostic(code("com3d2.io"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image error: {0}")]
    #[diagnostic(code("com3d2.image"))]
    Image(String),
    #[error("invalid dds payload: {0}")]
    #[diagnostic(code("com3d2.dds"))]
    InvalidDds(String),
}

impl CodecError {
    /// Wraps a nested codec error with the list element it occurred in.
    pub(crate) fn at_element(self, kind: &'static str, index: usize) -> Self {
        CodecError::Element {
            kind,
            index,
            source: Box::new(self),
        }
    }
}
