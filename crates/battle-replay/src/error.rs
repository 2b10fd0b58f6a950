//! Replay I/O error types.

use std::fmt;
use std::io;

/// Errors raised while writing replay records.
///
/// An I/O failure is retried once by [`crate::sink::ReplaySink`]; if the
/// retry also fails this is returned and the kernel stops advancing.
#[derive(Debug)]
pub enum ReplayError {
    /// The underlying writer returned an I/O error on both the original
    /// attempt and the single retry.
    Io(io::Error),
    /// A record could not be serialized to JSON. This should not happen
    /// for the record types this crate emits; surfaced defensively rather
    /// than unwrapped.
    Encode(serde_json::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "replay I/O error: {e}"),
            Self::Encode(e) => write!(f, "replay record encoding error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_mentions_underlying_message() {
        let err = ReplayError::Io(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(format!("{err}").contains("disk full"));
    }
}
