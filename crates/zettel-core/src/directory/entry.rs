// crates/zettel-core/src/directory/entry.rs - directory entries and the
// on-disk filename grammar
//
// Grounded on the filename-grammar parsing style of the teacher's
// `id.rs::IdManager::extract_from_filename` (regex-driven, config-free
// extraction of an identifier from a path), generalized from Luhmann
// components to the flat `<14-digit>(\.<ext>)?` grammar spec.md §4.3 names.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::zid::Zid;

static FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{14})(?:\.([A-Za-z0-9]+))?$").unwrap());

/// Where a directory entry's metadata lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSpec {
    /// Not yet determined (an entry that has only been partially observed).
    Unknown,
    /// No metadata: binary content with no sidecar.
    NoMeta,
    /// A `.meta` sidecar file.
    File,
    /// Embedded in the content file's header.
    Header,
}

/// One zettel's view of the directory: which files back it, and where its
/// metadata comes from (spec.md §3 "Directory entry").
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub zid: Zid,
    pub meta_spec: MetaSpec,
    pub meta_path: Option<PathBuf>,
    pub content_path: Option<PathBuf>,
    pub content_ext: Option<String>,
    pub duplicates: bool,
}

impl DirEntry {
    pub fn new(zid: Zid) -> Self {
        DirEntry {
            zid,
            meta_spec: MetaSpec::Unknown,
            meta_path: None,
            content_path: None,
            content_ext: None,
            duplicates: false,
        }
    }

    /// Merge another file's observation into this entry, updating
    /// `meta_spec`/paths/`duplicates` per spec.md §4.3's filename grammar:
    /// - `.meta` sets `MetaSpec::File`.
    /// - `.zettel` sets `MetaSpec::Header` unless already `File`.
    /// - any other extension is raw content (`MetaSpec::NoMeta` unless a
    ///   sidecar is also present); a second differing content extension
    ///   marks `duplicates`.
    pub fn observe(&mut self, path: &Path, ext: Option<&str>) {
        match ext {
            Some("meta") => {
                self.meta_path = Some(path.to_path_buf());
                self.meta_spec = MetaSpec::File;
            }
            Some("zettel") => {
                if self.content_path.is_some() && self.content_ext.as_deref() != Some("zettel") {
                    self.duplicates = true;
                }
                self.content_path = Some(path.to_path_buf());
                self.content_ext = Some("zettel".to_string());
                if self.meta_spec != MetaSpec::File {
                    self.meta_spec = MetaSpec::Header;
                }
            }
            other => {
                let ext_str = other.map(str::to_string);
                if self.content_path.is_some() && self.content_ext != ext_str {
                    self.duplicates = true;
                }
                self.content_path = Some(path.to_path_buf());
                self.content_ext = ext_str;
                if self.meta_spec == MetaSpec::Unknown {
                    self.meta_spec = MetaSpec::NoMeta;
                }
            }
        }
    }
}

/// Parse a bare filename (no directory component) against the directory
/// grammar `<14-digit>(\.<ext>)?`. Returns `None` if the name doesn't start
/// with exactly 14 digits.
pub fn parse_filename(name: &str) -> Option<(Zid, Option<String>)> {
    let caps = FILENAME_PATTERN.captures(name)?;
    let zid = Zid::parse(&caps[1]).ok()?;
    let ext = caps.get(2).map(|m| m.as_str().to_string());
    Some((zid, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filename_headered() {
        let (zid, ext) = parse_filename("20200101000001.zettel").unwrap();
        assert_eq!(zid.to_string(), "20200101000001");
        assert_eq!(ext.as_deref(), Some("zettel"));
    }

    #[test]
    fn test_parse_filename_no_extension() {
        let (zid, ext) = parse_filename("20200101000001").unwrap();
        assert_eq!(zid.to_string(), "20200101000001");
        assert_eq!(ext, None);
    }

    #[test]
    fn test_parse_filename_rejects_non_grammar() {
        assert!(parse_filename("not-a-zid.txt").is_none());
        assert!(parse_filename("123.zettel").is_none());
    }

    #[test]
    fn test_observe_sidecar_plus_content() {
        let mut entry = DirEntry::new(Zid::parse("20200101000001").unwrap());
        entry.observe(Path::new("20200101000001.meta"), Some("meta"));
        entry.observe(Path::new("20200101000001.jpg"), Some("jpg"));
        assert_eq!(entry.meta_spec, MetaSpec::File);
        assert!(!entry.duplicates);
    }

    #[test]
    fn test_observe_conflicting_content_extensions_marks_duplicates() {
        let mut entry = DirEntry::new(Zid::parse("20200101000001").unwrap());
        entry.observe(Path::new("20200101000001.jpg"), Some("jpg"));
        entry.observe(Path::new("20200101000001.png"), Some("png"));
        assert!(entry.duplicates);
    }

    #[test]
    fn test_observe_headered_zettel() {
        let mut entry = DirEntry::new(Zid::parse("20200101000001").unwrap());
        entry.observe(Path::new("20200101000001.zettel"), Some("zettel"));
        assert_eq!(entry.meta_spec, MetaSpec::Header);
        assert_eq!(entry.content_ext.as_deref(), Some("zettel"));
    }
}
