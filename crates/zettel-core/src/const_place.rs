// crates/zettel-core/src/const_place.rs - read-only built-in place

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::content::Content;
use crate::error::{PlaceError, PlaceResult};
use crate::filter::Filter;
use crate::meta::Meta;
use crate::observer::{ChangeObserver, ObserverBus};
use crate::place::Place;
use crate::sorter::Sorter;
use crate::zettel::Zettel;
use crate::zid::Zid;

/// A single built-in entry: a header (parsed once into Meta pairs at
/// construction) plus opaque content bytes.
struct ConstEntry {
    header: Vec<(&'static str, &'static str)>,
    content: &'static [u8],
}

/// The fixed set of built-in zettels contributed at program init (spec.md
/// §4.2), enumerated concretely per SPEC_FULL.md §4.2: configuration
/// defaults, base HTML/list/detail/form templates, base CSS, icon SVG, and
/// the new-zettel template. The core stores and serves their bytes as-is;
/// it never interprets HTML/CSS/SVG content.
fn builtin_entries() -> Vec<(Zid, ConstEntry)> {
    vec![
        (
            Zid::parse("00000000000001").unwrap(),
            ConstEntry {
                header: vec![("title", "Configuration"), ("role", "config"), ("syntax", "meta")],
                content: b"",
            },
        ),
        (
            Zid::parse("00000000000020").unwrap(),
            ConstEntry {
                header: vec![("title", "Base HTML Template"), ("role", "template"), ("syntax", "html")],
                content: b"<!DOCTYPE html><html><head></head><body>{{content}}</body></html>",
            },
        ),
        (
            Zid::parse("00000000000021").unwrap(),
            ConstEntry {
                header: vec![("title", "List Template"), ("role", "template"), ("syntax", "html")],
                content: b"<ul>{{items}}</ul>",
            },
        ),
        (
            Zid::parse("00000000000022").unwrap(),
            ConstEntry {
                header: vec![("title", "Detail Template"), ("role", "template"), ("syntax", "html")],
                content: b"<article>{{content}}</article>",
            },
        ),
        (
            Zid::parse("00000000000023").unwrap(),
            ConstEntry {
                header: vec![("title", "Form Template"), ("role", "template"), ("syntax", "html")],
                content: b"<form>{{fields}}</form>",
            },
        ),
        (
            Zid::parse("00000000000025").unwrap(),
            ConstEntry {
                header: vec![("title", "Base Stylesheet"), ("role", "asset"), ("syntax", "css")],
                content: b"body { font-family: sans-serif; }",
            },
        ),
        (
            Zid::parse("00000000000026").unwrap(),
            ConstEntry {
                header: vec![("title", "Icon"), ("role", "asset"), ("syntax", "svg")],
                content: b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>",
            },
        ),
        (
            Zid::parse("00000000000027").unwrap(),
            ConstEntry {
                header: vec![("title", "New Zettel Template"), ("role", "template"), ("syntax", "zmk")],
                content: b"# {{title}}\n\n",
            },
        ),
    ]
}

fn entry_to_meta(zid: Zid, entry: &ConstEntry) -> Meta {
    let mut meta = Meta::new(zid);
    for (k, v) in &entry.header {
        meta.set(k, *v).expect("built-in header keys are valid");
    }
    meta.freeze();
    meta
}

/// A read-only, in-memory place seeded at build time (spec.md §4.2). All
/// mutators return [`PlaceError::ReadOnly`]; observer registration is
/// accepted and ignored since no change can ever occur.
pub struct ConstantPlace {
    entries: Vec<(Zid, ConstEntry)>,
    started: AtomicBool,
    observers: RwLock<Vec<ChangeObserver>>,
}

impl ConstantPlace {
    pub fn new() -> Self {
        ConstantPlace {
            entries: builtin_entries(),
            started: AtomicBool::new(false),
            observers: RwLock::new(Vec::new()),
        }
    }

    fn find(&self, zid: Zid) -> Option<&ConstEntry> {
        self.entries.iter().find(|(z, _)| *z == zid).map(|(_, e)| e)
    }

    fn check_started(&self) -> PlaceResult<()> {
        if !self.started.load(Ordering::SeqCst) {
            return Err(PlaceError::Stopped);
        }
        Ok(())
    }
}

impl Default for ConstantPlace {
    fn default() -> Self {
        Self::new()
    }
}

impl Place for ConstantPlace {
    fn start(&self) -> PlaceResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PlaceError::NotAllowed("already started".to_string()));
        }
        Ok(())
    }

    fn stop(&self) -> PlaceResult<()> {
        self.check_started()?;
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "const:".to_string()
    }

    fn register_change_observer(&self, observer: ChangeObserver) {
        // Accepted and ignored: no change can ever occur on this place.
        self.observers.write().unwrap().push(observer);
    }

    fn get_zettel(&self, zid: Zid) -> PlaceResult<Zettel> {
        self.check_started()?;
        let entry = self.find(zid).ok_or(PlaceError::UnknownId(zid))?;
        Ok(Zettel::new(entry_to_meta(zid, entry), Content::new(entry.content.to_vec())))
    }

    fn get_meta(&self, zid: Zid) -> PlaceResult<Meta> {
        self.check_started()?;
        let entry = self.find(zid).ok_or(PlaceError::UnknownId(zid))?;
        Ok(entry_to_meta(zid, entry))
    }

    fn select_meta(&self, filter: Option<&Filter>, sorter: Option<&Sorter>) -> PlaceResult<Vec<Meta>> {
        self.check_started()?;
        let mut metas: Vec<Meta> = self
            .entries
            .iter()
            .map(|(zid, entry)| entry_to_meta(*zid, entry))
            .collect();
        metas.sort_by(|a, b| b.zid().cmp(&a.zid()));
        if let Some(f) = filter {
            metas.retain(|m| f.matches(m));
        }
        if let Some(s) = sorter {
            let mut refs: Vec<&Meta> = metas.iter().collect();
            s.sort(&mut refs);
            metas = refs.into_iter().cloned().collect();
        }
        Ok(metas)
    }

    fn create_zettel(&self, _zettel: Zettel) -> PlaceResult<Zid> {
        self.check_started()?;
        Err(PlaceError::ReadOnly)
    }

    fn update_zettel(&self, _zettel: Zettel) -> PlaceResult<()> {
        self.check_started()?;
        Err(PlaceError::ReadOnly)
    }

    fn rename_zettel(&self, _cur: Zid, _new: Zid) -> PlaceResult<()> {
        self.check_started()?;
        Err(PlaceError::ReadOnly)
    }

    fn delete_zettel(&self, _zid: Zid) -> PlaceResult<()> {
        self.check_started()?;
        Err(PlaceError::ReadOnly)
    }

    fn reload(&self) -> PlaceResult<()> {
        self.check_started()?;
        Ok(())
    }

    fn can_create_zettel(&self) -> bool {
        false
    }
    fn can_update_zettel(&self) -> bool {
        false
    }
    fn can_rename_zettel(&self) -> bool {
        false
    }
    fn can_delete_zettel(&self) -> bool {
        false
    }
}
