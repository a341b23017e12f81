// crates/zettel-core/src/sorter.rs - ordering applied after the merge/filter

use crate::meta::Meta;

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Which key to sort by. `Zid` is the list's natural order (I5); `Key`
/// compares the raw string value of an arbitrary metadata key, unknown-key
/// ties and missing values sorting first.
#[derive(Debug, Clone)]
pub enum SortKey {
    Zid,
    Key(String),
}

/// A value object describing how `Place::select_meta` should order its
/// result after filtering. Applied *after* the descending-Zid list has
/// been produced and filtered (spec.md §4.1, I5).
#[derive(Debug, Clone)]
pub struct Sorter {
    pub key: SortKey,
    pub direction: Direction,
}

impl Sorter {
    pub fn by_zid(direction: Direction) -> Self {
        Sorter {
            key: SortKey::Zid,
            direction,
        }
    }

    pub fn by_key(key: impl Into<String>, direction: Direction) -> Self {
        Sorter {
            key: SortKey::Key(key.into()),
            direction,
        }
    }

    /// Apply this sorter to a list of Metas in place.
    pub fn sort(&self, metas: &mut [&Meta]) {
        metas.sort_by(|a, b| {
            let ord = match &self.key {
                SortKey::Zid => a.zid().cmp(&b.zid()),
                SortKey::Key(k) => a.get(k).cmp(&b.get(k)),
            };
            match self.direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });
    }
}

/// Truncate a list to at most `page_size` entries, the list-page-size knob
/// from spec.md §6's config.
pub fn paginate<'a, T>(items: Vec<T>, page_size: Option<usize>) -> Vec<T> {
    match page_size {
        Some(n) if items.len() > n => items.into_iter().take(n).collect(),
        _ => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zid::Zid;

    fn meta(zid: &str, title: &str) -> Meta {
        let mut m = Meta::new(Zid::parse(zid).unwrap());
        m.set("title", title).unwrap();
        m
    }

    #[test]
    fn test_sort_by_zid_descending() {
        let a = meta("20200101000001", "A");
        let b = meta("20200101000002", "B");
        let mut refs = vec![&a, &b];
        Sorter::by_zid(Direction::Descending).sort(&mut refs);
        assert_eq!(refs[0].zid(), b.zid());
    }

    #[test]
    fn test_sort_by_key() {
        let a = meta("20200101000001", "Zebra");
        let b = meta("20200101000002", "Apple");
        let mut refs = vec![&a, &b];
        Sorter::by_key("title", Direction::Ascending).sort(&mut refs);
        assert_eq!(refs[0].title(), "Apple");
    }

    #[test]
    fn test_paginate_truncates() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(paginate(items.clone(), Some(3)), vec![1, 2, 3]);
        assert_eq!(paginate(items, None), vec![1, 2, 3, 4, 5]);
    }
}
