// crates/zettel-core/src/error.rs - error taxonomy for the storage core

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::zid::Zid;

/// Errors a [`crate::place::Place`] can return from any operation.
///
/// One variant per failure mode named in spec.md §7; every place
/// implementation (`ConstantPlace`, `DirectoryPlace`, `ChainPlace`) maps its
/// own internal failures onto this taxonomy so callers never need to match
/// on implementation-specific error types.
#[derive(Error, Debug, Clone)]
pub enum PlaceError {
    #[error("no zettel with id {0}")]
    UnknownId(Zid),

    #[error("invalid zid: {0}")]
    InvalidId(String),

    #[error("place is read-only")]
    ReadOnly,

    #[error("place is stopped")]
    Stopped,

    #[error("operation not allowed: {0}")]
    NotAllowed(String),

    #[error("i/o error: {0}")]
    Io(Arc<io::Error>),

    #[error("no such content format: {0}")]
    NoSuchFormat(String),

    #[error("place is empty")]
    Empty,
}

impl From<io::Error> for PlaceError {
    fn from(e: io::Error) -> Self {
        PlaceError::Io(Arc::new(e))
    }
}

pub type PlaceResult<T> = Result<T, PlaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let place_err: PlaceError = io_err.into();
        assert!(matches!(place_err, PlaceError::Io(_)));
    }

    #[test]
    fn test_unknown_id_display() {
        let zid = Zid::parse("20200101000001").unwrap();
        let err = PlaceError::UnknownId(zid);
        assert_eq!(err.to_string(), "no zettel with id 20200101000001");
    }
}
