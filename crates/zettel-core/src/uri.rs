// crates/zettel-core/src/uri.rs - place URI parsing
//
// Grounded on spec.md §6 "Place URIs" and the teacher's
// `try_load_vault_config` path-joining conventions in `config.rs`.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::StoreConfig;
use crate::const_place::ConstantPlace;
use crate::directory::DirectoryPlace;
use crate::place::Place;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("unrecognized place URI scheme: {0:?}")]
    UnknownScheme(String),

    #[error("dir: URI is missing a path")]
    MissingPath,
}

/// A parsed place URI: `dir:<path>` for a directory place, `const:` for
/// the constant place. The `?readonly` query option attaches read-only
/// mode to either scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceUri {
    Directory { path: PathBuf, read_only: bool },
    Constant { read_only: bool },
}

impl PlaceUri {
    pub fn parse(s: &str) -> Result<Self, UriError> {
        let (body, read_only) = match s.rsplit_once('?') {
            Some((body, "readonly")) => (body, true),
            Some((body, _)) => (body, false),
            None => (s, false),
        };

        if let Some(path) = body.strip_prefix("dir:") {
            if path.is_empty() {
                return Err(UriError::MissingPath);
            }
            return Ok(PlaceUri::Directory {
                path: PathBuf::from(path),
                read_only,
            });
        }
        if body == "const:" || body == "const" {
            return Ok(PlaceUri::Constant { read_only });
        }
        Err(UriError::UnknownScheme(body.to_string()))
    }

    pub fn is_read_only(&self) -> bool {
        match self {
            PlaceUri::Directory { read_only, .. } => *read_only,
            PlaceUri::Constant { read_only } => *read_only,
        }
    }

    /// Instantiate (but do not start) the `Place` this URI describes.
    /// `config` supplies the defaults a `DirectoryPlace` completes missing
    /// `syntax`/`role` metadata from (spec.md §4.5); it is ignored for
    /// `const:` URIs, which carry their own builtin defaults.
    pub fn build(&self, config: StoreConfig) -> Arc<dyn Place> {
        match self {
            PlaceUri::Directory { path, read_only } => {
                Arc::new(DirectoryPlace::new(path.clone(), config, *read_only))
            }
            PlaceUri::Constant { .. } => Arc::new(ConstantPlace::new()),
        }
    }
}

/// Build the child places a chain builder composes, in the order the
/// URIs were given (spec.md §6 "Place URIs (consumed by the chain
/// builder)"). Parsing errors abort the whole build; ordering of the
/// resulting `Vec` is exactly the ordering of `uris`, which is what
/// determines chain overlay precedence (spec.md §4.6).
pub fn build_places(uris: &[&str], config: StoreConfig) -> Result<Vec<Arc<dyn Place>>, UriError> {
    uris.iter()
        .map(|s| PlaceUri::parse(s).map(|uri| uri.build(config.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dir_uri() {
        let uri = PlaceUri::parse("dir:/var/zettel").unwrap();
        assert_eq!(
            uri,
            PlaceUri::Directory {
                path: PathBuf::from("/var/zettel"),
                read_only: false,
            }
        );
    }

    #[test]
    fn test_parse_const_uri() {
        let uri = PlaceUri::parse("const:").unwrap();
        assert_eq!(uri, PlaceUri::Constant { read_only: false });
    }

    #[test]
    fn test_parse_readonly_option() {
        let uri = PlaceUri::parse("dir:/var/zettel?readonly").unwrap();
        assert!(uri.is_read_only());
        let uri = PlaceUri::parse("const:?readonly").unwrap();
        assert!(uri.is_read_only());
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        assert!(matches!(
            PlaceUri::parse("http://example.com"),
            Err(UriError::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_dir_path() {
        assert!(matches!(PlaceUri::parse("dir:"), Err(UriError::MissingPath)));
    }

    #[test]
    fn test_build_places_preserves_order() {
        let tmp = tempfile::tempdir().unwrap();
        let dir_uri = format!("dir:{}", tmp.path().display());
        let places = build_places(&[&dir_uri, "const:"], StoreConfig::default()).unwrap();
        assert_eq!(places.len(), 2);
        assert!(places[0].location().starts_with("dir:"));
        assert_eq!(places[1].location(), "const:");
    }

    #[test]
    fn test_build_places_propagates_parse_error() {
        let result = build_places(&["not-a-scheme"], StoreConfig::default());
        assert!(result.is_err());
    }
}
