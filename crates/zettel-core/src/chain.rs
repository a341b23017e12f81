// crates/zettel-core/src/chain.rs - ordered overlay composition of places
//
// Grounded on spec.md §4.6 directly; k-way merge implemented by hand over
// each child's sorted Vec<Meta> (binary-heap merge would be overkill for
// the small child counts this spec targets, so a straightforward
// scan-and-advance merge is used instead).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, error, warn};

use crate::error::{PlaceError, PlaceResult};
use crate::filter::Filter;
use crate::meta::Meta;
use crate::observer::{ChangeObserver, ObserverBus};
use crate::place::Place;
use crate::sorter::Sorter;
use crate::zettel::Zettel;
use crate::zid::Zid;

/// An ordered list of child places forming a read overlay; writes go to
/// the first child only (spec.md §4.6).
pub struct ChainPlace {
    children: Vec<Arc<dyn Place>>,
    bus: ObserverBus,
    started: AtomicBool,
    started_count: RwLock<usize>,
}

impl ChainPlace {
    pub fn new(children: Vec<Arc<dyn Place>>) -> Self {
        let bus = ObserverBus::new();
        // Cyclic-reference avoidance (spec.md §9): the chain registers a
        // closure on each child; children hold only the callback, never a
        // typed reference back to the chain.
        for child in &children {
            let bus = bus.clone();
            child.register_change_observer(Arc::new(move |all_changed, zid| {
                bus.notify(all_changed, zid);
            }));
        }
        ChainPlace {
            children,
            bus,
            started: AtomicBool::new(false),
            started_count: RwLock::new(0),
        }
    }

    fn ensure_started(&self) -> PlaceResult<()> {
        if !self.started.load(Ordering::SeqCst) {
            return Err(PlaceError::Stopped);
        }
        Ok(())
    }

    fn first_child(&self) -> PlaceResult<&Arc<dyn Place>> {
        self.children.first().ok_or(PlaceError::Empty)
    }
}

impl Place for ChainPlace {
    fn start(&self) -> PlaceResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PlaceError::NotAllowed("already started".to_string()));
        }
        debug!(children = self.children.len(), "chain starting");
        let mut started = 0;
        for child in &self.children {
            match child.start() {
                Ok(()) => started += 1,
                Err(e) => {
                    error!(index = started, error = %e, "child failed to start, rolling back");
                    // Stop the prefix already started, in reverse order,
                    // then propagate the error (spec.md §4.6).
                    for prior in self.children[..started].iter().rev() {
                        let _ = prior.stop();
                    }
                    self.started.store(false, Ordering::SeqCst);
                    return Err(e);
                }
            }
        }
        *self.started_count.write().unwrap() = started;
        debug!(started, "chain started");
        Ok(())
    }

    fn stop(&self) -> PlaceResult<()> {
        self.ensure_started()?;
        debug!(children = self.children.len(), "chain stopping");
        let mut first_err = None;
        for child in self.children.iter().rev() {
            if let Err(e) = child.stop() {
                warn!(error = %e, "child failed to stop");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        self.started.store(false, Ordering::SeqCst);
        match first_err {
            Some(e) => Err(e),
            None => {
                debug!("chain stopped");
                Ok(())
            }
        }
    }

    fn location(&self) -> String {
        let locations: Vec<String> = self.children.iter().map(|c| c.location()).collect();
        format!("chain:[{}]", locations.join(", "))
    }

    fn register_change_observer(&self, observer: ChangeObserver) {
        self.bus.register(observer);
    }

    fn get_zettel(&self, zid: Zid) -> PlaceResult<Zettel> {
        self.ensure_started()?;
        let mut first_err = None;
        for child in &self.children {
            match child.get_zettel(zid) {
                Ok(z) => return Ok(z),
                Err(PlaceError::UnknownId(_)) => continue,
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        Err(first_err.unwrap_or(PlaceError::UnknownId(zid)))
    }

    fn get_meta(&self, zid: Zid) -> PlaceResult<Meta> {
        self.ensure_started()?;
        let mut first_err = None;
        for child in &self.children {
            match child.get_meta(zid) {
                Ok(m) => return Ok(m),
                Err(PlaceError::UnknownId(_)) => continue,
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        Err(first_err.unwrap_or(PlaceError::UnknownId(zid)))
    }

    fn select_meta(
        &self,
        filter: Option<&Filter>,
        sorter: Option<&Sorter>,
    ) -> PlaceResult<Vec<Meta>> {
        self.ensure_started()?;

        // Query every child with (nil, nil); each returns a descending-Zid
        // list (spec.md §4.6).
        let mut streams: Vec<std::vec::IntoIter<Meta>> = Vec::with_capacity(self.children.len());
        for child in &self.children {
            streams.push(child.select_meta(None, None)?.into_iter());
        }

        // K-way descending merge: at each step, pick the maximum head
        // across streams; ties go to the leftmost stream, and every other
        // stream sharing that Zid is advanced past it (overlay hides
        // shadowed entries).
        let mut heads: Vec<Option<Meta>> = streams.iter_mut().map(|s| s.next()).collect();
        let mut merged = Vec::new();
        loop {
            let max_zid = heads
                .iter()
                .filter_map(|h| h.as_ref().map(Meta::zid))
                .max();
            let Some(max_zid) = max_zid else { break };

            let winner_idx = heads
                .iter()
                .position(|h| h.as_ref().is_some_and(|m| m.zid() == max_zid))
                .unwrap();

            merged.push(heads[winner_idx].take().unwrap());
            heads[winner_idx] = streams[winner_idx].next();

            for (idx, head) in heads.iter_mut().enumerate() {
                if idx == winner_idx {
                    continue;
                }
                if head.as_ref().is_some_and(|m| m.zid() == max_zid) {
                    *head = streams[idx].next();
                }
            }
        }

        let mut refs: Vec<&Meta> = merged.iter().collect();
        if let Some(f) = filter {
            refs.retain(|m| f.matches(m));
        }
        if let Some(s) = sorter {
            s.sort(&mut refs);
        }
        Ok(refs.into_iter().map(|m| m.frozen_clone()).collect())
    }

    fn create_zettel(&self, zettel: Zettel) -> PlaceResult<Zid> {
        self.ensure_started()?;
        self.first_child()?.create_zettel(zettel)
    }

    fn update_zettel(&self, zettel: Zettel) -> PlaceResult<()> {
        self.ensure_started()?;
        self.first_child()?.update_zettel(zettel)
    }

    fn rename_zettel(&self, cur: Zid, new: Zid) -> PlaceResult<()> {
        self.ensure_started()?;
        if self.children.is_empty() {
            return Err(PlaceError::Empty);
        }
        // Call RenameZettel on every child in order; success hinges on
        // child 0 only, later failures are silently ignored since they
        // merely don't own the Zid (spec.md §4.6).
        let first_result = self.children[0].rename_zettel(cur, new);
        for child in &self.children[1..] {
            let _ = child.rename_zettel(cur, new);
        }
        first_result
    }

    fn delete_zettel(&self, zid: Zid) -> PlaceResult<()> {
        self.ensure_started()?;
        self.first_child()?.delete_zettel(zid)
    }

    fn reload(&self) -> PlaceResult<()> {
        self.ensure_started()?;
        for child in &self.children {
            child.reload()?;
        }
        Ok(())
    }

    fn can_create_zettel(&self) -> bool {
        self.children.first().is_some_and(|c| c.can_create_zettel())
    }
    fn can_update_zettel(&self) -> bool {
        self.children.first().is_some_and(|c| c.can_update_zettel())
    }
    fn can_rename_zettel(&self) -> bool {
        self.children.first().is_some_and(|c| c.can_rename_zettel())
    }
    fn can_delete_zettel(&self) -> bool {
        self.children.first().is_some_and(|c| c.can_delete_zettel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::const_place::ConstantPlace;
    use crate::config::StoreConfig;
    use crate::content::Content;
    use crate::directory::DirectoryPlace;
    use tempfile::tempdir;

    fn zid(s: &str) -> Zid {
        Zid::parse(s).unwrap()
    }

    #[test]
    fn test_empty_chain_returns_empty_error() {
        let chain = ChainPlace::new(vec![]);
        chain.start().unwrap();
        assert!(matches!(
            chain.create_zettel(Zettel::new(Meta::new(Zid::INVALID), Content::default())),
            Err(PlaceError::Empty)
        ));
    }

    #[test]
    fn test_overlay_hiding_scenario_2() {
        let dir = tempdir().unwrap();
        let dir_place: Arc<dyn Place> =
            Arc::new(DirectoryPlace::new(dir.path().to_path_buf(), StoreConfig::default(), false));
        let const_place: Arc<dyn Place> = Arc::new(ConstantPlace::new());
        let chain = ChainPlace::new(vec![dir_place.clone(), const_place]);
        chain.start().unwrap();

        let config_zid = zid("00000000000001");
        assert_eq!(chain.get_meta(config_zid).unwrap().title(), "Configuration");

        let mut custom = Meta::new(config_zid);
        custom.set("title", "Custom").unwrap();
        dir_place.update_zettel(Zettel::new(custom, Content::default())).unwrap();
        assert_eq!(chain.get_meta(config_zid).unwrap().title(), "Custom");

        dir_place.delete_zettel(config_zid).unwrap();
        assert_eq!(chain.get_meta(config_zid).unwrap().title(), "Configuration");

        chain.stop().unwrap();
    }

    #[test]
    fn test_descending_merge_scenario_3() {
        let dir = tempdir().unwrap();
        let dir_place: Arc<dyn Place> =
            Arc::new(DirectoryPlace::new(dir.path().to_path_buf(), StoreConfig::default(), false));
        let const_place: Arc<dyn Place> = Arc::new(ConstantPlace::new());
        dir_place.start().unwrap();

        let a = zid("20200101000010");
        let c = zid("20200101000005");
        let shared = zid("00000000000020"); // also a ConstantPlace built-in Zid
        for (z, title) in [(a, "A"), (c, "C"), (shared, "dir wins")] {
            let mut meta = Meta::new(z);
            meta.set("title", title).unwrap();
            dir_place.update_zettel(Zettel::new(meta, Content::default())).unwrap();
        }
        // ChainPlace::start() starts every child itself; hand it a
        // stopped child rather than one already started by this test.
        dir_place.stop().unwrap();

        let chain = ChainPlace::new(vec![dir_place, const_place]);
        chain.start().unwrap();

        let metas = chain.select_meta(None, None).unwrap();
        let zids: Vec<Zid> = metas.iter().map(Meta::zid).collect();

        // Strictly descending (I5), no duplicate Zids (overlay dedup).
        assert!(zids.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(zids.len(), zids.iter().collect::<std::collections::HashSet<_>>().len());

        // Leftmost (dir) wins the shared Zid (I6).
        let winner = metas.iter().find(|m| m.zid() == shared).unwrap();
        assert_eq!(winner.title(), "dir wins");

        chain.stop().unwrap();
    }
}
