//! Errors raised while loading or assembling static scene data.
//!
//! Simulation itself never fails; everything here happens before the first step.

use std::fmt;
use std::path::PathBuf;

use crate::geometry::GeometryError;

#[derive(Debug)]
pub enum SceneError {
    /// Static geometry failed validation.
    Geometry(GeometryError),
    Io { path: PathBuf, source: std::io::Error },
    /// Binary scene file could not be decoded.
    Decode(String),
    /// Binary scene file could not be encoded.
    Encode(String),
    UnsupportedVersion { found: u32, expected: u32 },
    /// RON config or manifest could not be parsed.
    Config { path: PathBuf, message: String },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Geometry(e) => write!(f, "invalid scene geometry: {e}"),
            SceneError::Io { path, source } => write!(f, "failed to access {path:?}: {source}"),
            SceneError::Decode(msg) => write!(f, "bincode deserialize failed: {msg}"),
            SceneError::Encode(msg) => write!(f, "bincode serialize failed: {msg}"),
            SceneError::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported scene version {found} (expected {expected})")
            }
            SceneError::Config { path, message } => {
                write!(f, "failed to parse {path:?}: {message}")
            }
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Geometry(e) => Some(e),
            SceneError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GeometryError> for SceneError {
    fn from(e: GeometryError) -> Self {
        SceneError::Geometry(e)
    }
}
