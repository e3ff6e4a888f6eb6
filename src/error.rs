//! Error types for polygon (de)serialisation.

use std::fmt;
use std::io;

/// Errors that can occur when reading or writing a polygon stream.
///
/// The geometric core is total: construction and the boolean operations
/// handle degenerate input locally and never fail. Errors only arise at the
/// serialisation boundary.
#[derive(Debug)]
pub enum PolygonError {
    /// An underlying I/O operation failed.
    Io(io::Error),

    /// The stream ended early or contained an impossible value.
    /// This indicates a truncated or foreign stream, not a usage error.
    Malformed(&'static str),
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonError::Io(e) => write!(f, "i/o error: {}", e),
            PolygonError::Malformed(what) => write!(f, "malformed polygon stream: {}", what),
        }
    }
}

impl std::error::Error for PolygonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolygonError::Io(e) => Some(e),
            PolygonError::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for PolygonError {
    fn from(e: io::Error) -> Self {
        PolygonError::Io(e)
    }
}
