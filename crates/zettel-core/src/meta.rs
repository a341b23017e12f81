// crates/zettel-core/src/meta.rs - ordered, typed, freezable metadata

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

use crate::zid::Zid;

/// The four distinguished keys every Meta tracks as its "front pairs".
pub const FRONT_KEYS: [&str; 4] = ["title", "tags", "role", "syntax"];

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][-a-z0-9]*$").unwrap());

/// The type a metadata value is interpreted as on read.
///
/// Grounded on the teacher's `config.rs` schema-of-defaults idiom, but
/// expressed here as a lookup table (see [`key_type`]) rather than a typed
/// struct, since Meta's key set is open-ended and spec.md §3 calls for a
/// *static schema* keyed by name, not a fixed struct shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaType {
    String,
    Bool,
    Number,
    Id,
    Url,
    Word,
    WordSet,
    TagSet,
    Timestamp,
    Empty,
}

/// Look up the well-known type for a metadata key, falling back to
/// [`MetaType::String`] for anything not in the table.
///
/// The well-known set covers the keys the front pairs and the constant
/// place's built-in zettels actually use; spec.md §3 leaves the full
/// schema unenumerated ("type determined by a static schema"), so this
/// table is this spec's concrete answer to that gap.
pub fn key_type(key: &str) -> MetaType {
    match key {
        "title" => MetaType::String,
        "tags" => MetaType::TagSet,
        "role" => MetaType::Word,
        "syntax" => MetaType::Word,
        "id" => MetaType::Id,
        "url" => MetaType::Url,
        "published" | "modified" | "created" => MetaType::Timestamp,
        "no-index" | "read-only" | "precursor" => MetaType::Bool,
        "box-number" | "priority" => MetaType::Number,
        "wordset" | "words" => MetaType::WordSet,
        "empty" => MetaType::Empty,
        _ => MetaType::String,
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    #[error("meta is frozen and cannot be modified")]
    Frozen,

    #[error("invalid meta key: {0:?} (must match [a-z0-9][-a-z0-9]*)")]
    InvalidKey(String),
}

pub type MetaResult<T> = Result<T, MetaError>;

/// An ordered, typed key→value map attached to a [`Zid`].
///
/// Values are always stored as strings and interpreted on read via the
/// typed getters, matching spec.md §3: "Values are stored as strings and
/// interpreted on read." Order of insertion is preserved via
/// [`indexmap::IndexMap`], since list queries depend on stable ordering of
/// rest pairs and the front/rest split depends on nothing else.
#[derive(Debug)]
pub struct Meta {
    zid: Zid,
    pairs: IndexMap<String, String>,
    frozen: bool,
}

impl Meta {
    pub fn new(zid: Zid) -> Self {
        Meta {
            zid,
            pairs: IndexMap::new(),
            frozen: false,
        }
    }

    pub fn zid(&self) -> Zid {
        self.zid
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze this Meta in place. Idempotent: freezing an already-frozen
    /// Meta is a no-op (P3).
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Set a key's raw string value. Fails with [`MetaError::Frozen`] if
    /// this Meta is frozen, or [`MetaError::InvalidKey`] if `key` doesn't
    /// match `[a-z0-9][-a-z0-9]*`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> MetaResult<()> {
        if self.frozen {
            return Err(MetaError::Frozen);
        }
        if !KEY_PATTERN.is_match(key) {
            return Err(MetaError::InvalidKey(key.to_string()));
        }
        self.pairs.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Remove a key. Fails with [`MetaError::Frozen`] if this Meta is
    /// frozen. Removing an absent key is a no-op success.
    pub fn remove(&mut self, key: &str) -> MetaResult<()> {
        if self.frozen {
            return Err(MetaError::Frozen);
        }
        self.pairs.shift_remove(key);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(|s| s.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    /// `Bool`: true iff the value is non-empty and its first character is
    /// one of `1 t T y Y`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .and_then(|v| v.chars().next())
            .map(|c| matches!(c, '1' | 't' | 'T' | 'y' | 'Y'))
            .unwrap_or(false)
    }

    /// `Number`: a signed decimal integer, or `None` if absent/unparseable.
    pub fn get_number(&self, key: &str) -> Option<i64> {
        self.get(key)?.trim().parse().ok()
    }

    /// `WordSet`/`TagSet`: whitespace-separated tokens, in appearance order.
    pub fn get_word_set(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| v.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// `TagSet`: whitespace-separated tokens that begin with `#`, tag marker
    /// stripped.
    pub fn get_tag_set(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split_whitespace()
                    .filter(|t| t.starts_with('#'))
                    .map(|t| t.trim_start_matches('#').to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `ID`: the value as a [`Zid`], if it satisfies the Zid predicate.
    pub fn get_id(&self, key: &str) -> Option<Zid> {
        self.get(key).and_then(|v| Zid::parse(v).ok())
    }

    pub fn title(&self) -> &str {
        self.get("title").unwrap_or_default()
    }

    /// The front pairs (`title`, `tags`, `role`, `syntax`) present on this
    /// Meta, in that fixed canonical order.
    pub fn front_pairs(&self) -> Vec<(&str, &str)> {
        FRONT_KEYS
            .iter()
            .filter_map(|&k| self.pairs.get(k).map(|v| (k, v.as_str())))
            .collect()
    }

    /// Every pair not among the front keys, in insertion order.
    pub fn rest_pairs(&self) -> Vec<(&str, &str)> {
        self.pairs
            .iter()
            .filter(|(k, _)| !FRONT_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// All pairs in insertion order, front and rest interleaved as stored.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Clone preserving the frozen flag, unlike [`Clone::clone`] (which
    /// always unfreezes per P3). Used internally where a cached, frozen
    /// Meta must be handed to a caller without losing its frozen status
    /// (spec.md §4.1: `GetMeta` returns a frozen Meta).
    pub fn frozen_clone(&self) -> Meta {
        Meta {
            zid: self.zid,
            pairs: self.pairs.clone(),
            frozen: self.frozen,
        }
    }

    /// An unfrozen copy retagged with a different Zid, used when a place
    /// mints a fresh Zid for a zettel supplied with no (or a different)
    /// identifier, e.g. `CreateZettel`.
    pub fn with_zid(&self, zid: Zid) -> Meta {
        Meta {
            zid,
            pairs: self.pairs.clone(),
            frozen: false,
        }
    }
}

impl Clone for Meta {
    /// Cloning always yields an unfrozen copy that preserves key order
    /// (spec.md §3, P3).
    fn clone(&self) -> Self {
        Meta {
            zid: self.zid,
            pairs: self.pairs.clone(),
            frozen: false,
        }
    }
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.zid == other.zid && self.pairs == other.pairs
    }
}

impl Eq for Meta {}

#[cfg(test)]
mod tests {
    use super::*;

    fn zid(s: &str) -> Zid {
        Zid::parse(s).unwrap()
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("title", "Hello").unwrap();
        assert_eq!(m.get("title"), Some("Hello"));
    }

    #[test]
    fn test_invalid_key_rejected() {
        let mut m = Meta::new(zid("20200101000001"));
        assert_eq!(
            m.set("Title", "x").unwrap_err(),
            MetaError::InvalidKey("Title".to_string())
        );
        assert!(m.set("has space", "x").is_err());
    }

    #[test]
    fn test_freeze_blocks_mutation() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("title", "Hello").unwrap();
        m.freeze();
        assert_eq!(m.set("title", "Other").unwrap_err(), MetaError::Frozen);
        assert_eq!(m.remove("title").unwrap_err(), MetaError::Frozen);
    }

    #[test]
    fn test_freeze_idempotent() {
        let mut m = Meta::new(zid("20200101000001"));
        m.freeze();
        m.freeze();
        assert!(m.is_frozen());
    }

    #[test]
    fn test_clone_is_unfrozen_and_equal() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("title", "Hello").unwrap();
        m.freeze();
        let cloned = m.clone();
        assert!(!cloned.is_frozen());
        assert_eq!(cloned, m);
    }

    #[test]
    fn test_front_rest_split() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("syntax", "zmk").unwrap();
        m.set("custom-key", "x").unwrap();
        m.set("title", "Hello").unwrap();
        let front = m.front_pairs();
        assert_eq!(front, vec![("title", "Hello"), ("syntax", "zmk")]);
        let rest = m.rest_pairs();
        assert_eq!(rest, vec![("custom-key", "x")]);
    }

    #[test]
    fn test_bool_parsing() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("no-index", "true").unwrap();
        assert!(m.get_bool("no-index"));
        m.remove("no-index").unwrap();
        m.set("no-index", "false").unwrap();
        assert!(!m.get_bool("no-index"));
        assert!(!m.get_bool("missing-key"));
    }

    #[test]
    fn test_tag_set_parsing() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("tags", "#rust #storage notag").unwrap();
        assert_eq!(m.get_tag_set("tags"), vec!["rust", "storage"]);
    }

    #[test]
    fn test_frozen_clone_preserves_frozen_flag() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("title", "Hello").unwrap();
        m.freeze();
        let clone = m.frozen_clone();
        assert!(clone.is_frozen());
        assert_eq!(clone.get("title"), Some("Hello"));
    }

    #[test]
    fn test_with_zid_retags_and_unfreezes() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("title", "Hello").unwrap();
        m.freeze();
        let retagged = m.with_zid(zid("20200101000002"));
        assert_eq!(retagged.zid(), zid("20200101000002"));
        assert!(!retagged.is_frozen());
        assert_eq!(retagged.get("title"), Some("Hello"));
    }

    #[test]
    fn test_id_parsing() {
        let mut m = Meta::new(zid("20200101000001"));
        m.set("precursor-id", "20200101000002").unwrap();
        assert_eq!(m.get_id("precursor-id"), Some(zid("20200101000002")));
        m.remove("precursor-id").unwrap();
        m.set("precursor-id", "not-a-zid").unwrap();
        assert_eq!(m.get_id("precursor-id"), None);
    }
}
