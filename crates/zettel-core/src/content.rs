// crates/zettel-core/src/content.rs - opaque, octet-preserving zettel content

/// Opaque byte content. Never interpreted by the storage core beyond the
/// binary-detection heuristic in [`Content::is_binary`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content(Vec<u8>);

impl Content {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Content(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Heuristic classification: binary if the content contains a NUL byte
    /// or more than 30% of its bytes fail to decode as UTF-8 (sampled over
    /// the first 8 KiB), matching spec.md §3's "NUL or a high proportion of
    /// non-UTF-8" framing without pinning an exact threshold there.
    pub fn is_binary(&self) -> bool {
        if self.0.is_empty() {
            return false;
        }
        if self.0.contains(&0) {
            return true;
        }
        let sample = &self.0[..self.0.len().min(8192)];
        match std::str::from_utf8(sample) {
            Ok(_) => false,
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                let invalid = sample.len() - valid_up_to;
                (invalid as f64) / (sample.len() as f64) > 0.30
            }
        }
    }

    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content(s.into_bytes())
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Content {
    fn from(v: Vec<u8>) -> Self {
        Content(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_not_binary() {
        assert!(!Content::new(vec![]).is_binary());
    }

    #[test]
    fn test_nul_is_binary() {
        assert!(Content::new(vec![0u8, 1, 2]).is_binary());
    }

    #[test]
    fn test_plain_text_is_not_binary() {
        let c = Content::from("Hello, world!");
        assert!(!c.is_binary());
    }

    #[test]
    fn test_mostly_invalid_utf8_is_binary() {
        let bytes: Vec<u8> = vec![0xFF, 0xFE, 0xFD, 0xFC, 0x01, 0x02];
        assert!(Content::new(bytes).is_binary());
    }
}
