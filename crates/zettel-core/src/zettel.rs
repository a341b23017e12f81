// crates/zettel-core/src/zettel.rs - (Meta, Content) pair

use crate::content::Content;
use crate::meta::Meta;
use crate::zid::Zid;

/// A single note: metadata plus content (spec.md §3).
#[derive(Debug, Clone)]
pub struct Zettel {
    pub meta: Meta,
    pub content: Content,
}

impl Zettel {
    pub fn new(meta: Meta, content: Content) -> Self {
        Zettel { meta, content }
    }

    pub fn zid(&self) -> Zid {
        self.meta.zid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zid_delegates_to_meta() {
        let zid = Zid::parse("20200101000001").unwrap();
        let z = Zettel::new(Meta::new(zid), Content::from("body"));
        assert_eq!(z.zid(), zid);
    }
}
