// crates/zettel-core/src/directory/mod.rs - the file-backed Place
//
// Composes `service` (4.3) + `workers` (4.4) + `cache` (4.5), grounded on
// `VaultService` in the teacher's `services/vault.rs` as the file-I/O-facing
// service this generalizes and replaces.

pub mod cache;
pub mod entry;
pub mod service;
pub mod workers;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;

use crossbeam_channel::bounded;

use crate::config::StoreConfig;
use crate::error::{PlaceError, PlaceResult};
use crate::filter::Filter;
use crate::meta::Meta;
use crate::observer::{ChangeObserver, ObserverBus};
use crate::place::Place;
use crate::sorter::Sorter;
use crate::zettel::Zettel;
use crate::zid::Zid;

use cache::MetaCache;
use entry::MetaSpec;
use service::DirectoryServiceHandle;
use workers::{FileWorkerPool, WorkerCommand};

fn apply_defaults(meta: &mut Meta, config: &StoreConfig) {
    if meta.get("syntax").unwrap_or("").is_empty() {
        let _ = meta.set("syntax", config.default_syntax.clone());
    }
    if meta.get("role").unwrap_or("").is_empty() {
        let _ = meta.set("role", config.default_role.clone());
    }
}

struct Running {
    service: DirectoryServiceHandle,
    service_join: JoinHandle<()>,
    workers: FileWorkerPool,
}

/// A `Place` backed by a single on-disk directory (spec.md §4.5). Composes
/// a [`service::DirectoryServiceHandle`] (the index actor), a
/// [`FileWorkerPool`] (sharded I/O), and a [`MetaCache`] (frozen-Meta
/// cache, invalidated by the service's own notifications).
pub struct DirectoryPlace {
    path: PathBuf,
    config: StoreConfig,
    read_only: bool,
    cache: Arc<MetaCache>,
    external_bus: ObserverBus,
    internal_bus: ObserverBus,
    running: RwLock<Option<Running>>,
}

impl DirectoryPlace {
    pub fn new(path: PathBuf, config: StoreConfig, read_only: bool) -> Self {
        let cache = Arc::new(MetaCache::new());
        let external_bus = ObserverBus::new();
        let internal_bus = ObserverBus::new();
        {
            let cache = cache.clone();
            let external_bus = external_bus.clone();
            internal_bus.register(Arc::new(move |all_changed, zid| {
                if all_changed {
                    cache.clear();
                } else {
                    cache.evict(zid);
                }
                external_bus.notify(all_changed, zid);
            }));
        }
        DirectoryPlace {
            path,
            config,
            read_only,
            cache,
            external_bus,
            internal_bus,
            running: RwLock::new(None),
        }
    }

    fn service(&self) -> PlaceResult<DirectoryServiceHandle> {
        self.running
            .read()
            .unwrap()
            .as_ref()
            .map(|r| r.service.clone())
            .ok_or(PlaceError::Stopped)
    }

    fn worker_send<T>(
        &self,
        zid: Zid,
        build: impl FnOnce(crossbeam_channel::Sender<T>) -> WorkerCommand,
    ) -> PlaceResult<T> {
        let running = self.running.read().unwrap();
        let running = running.as_ref().ok_or(PlaceError::Stopped)?;
        let (tx, rx) = bounded(1);
        running.workers.send(zid, build(tx));
        rx.recv()
            .map_err(|_| PlaceError::NotAllowed("worker reply channel closed".to_string()))
    }

    fn check_writable(&self) -> PlaceResult<()> {
        if self.read_only {
            return Err(PlaceError::ReadOnly);
        }
        Ok(())
    }

    /// Read-through: cache hit, or ask the worker pool, apply default-value
    /// completion, freeze, and cache (spec.md §4.5).
    fn load_meta(&self, zid: Zid) -> PlaceResult<Arc<Meta>> {
        if let Some(cached) = self.cache.get(zid) {
            return Ok(cached);
        }
        let service = self.service()?;
        let entry = service
            .get_entry(zid)
            .filter(|e| e.meta_spec != MetaSpec::Unknown)
            .ok_or(PlaceError::UnknownId(zid))?;
        let mut meta = self.worker_send(zid, |reply| WorkerCommand::GetMeta { entry, reply })??;
        apply_defaults(&mut meta, &self.config);
        Ok(self.cache.insert(meta))
    }
}

impl Place for DirectoryPlace {
    fn start(&self) -> PlaceResult<()> {
        let mut running = self.running.write().unwrap();
        if running.is_some() {
            return Err(PlaceError::NotAllowed("already started".to_string()));
        }
        let (service, service_join) = service::start(
            self.path.clone(),
            self.config.reload_interval(),
            self.internal_bus.clone(),
        );
        let workers = FileWorkerPool::spawn(self.config.file_worker_count);
        *running = Some(Running {
            service,
            service_join,
            workers,
        });
        Ok(())
    }

    fn stop(&self) -> PlaceResult<()> {
        let mut running = self.running.write().unwrap();
        let Running {
            service,
            service_join,
            workers,
        } = running.take().ok_or(PlaceError::Stopped)?;
        service.stop();
        let _ = service_join.join();
        workers.shutdown();
        self.cache.clear();
        Ok(())
    }

    fn location(&self) -> String {
        format!("dir:{}", self.path.display())
    }

    fn register_change_observer(&self, observer: ChangeObserver) {
        self.external_bus.register(observer);
    }

    fn get_zettel(&self, zid: Zid) -> PlaceResult<Zettel> {
        // Bypasses the cache for content (spec.md §4.5); only metadata is
        // cached, below, after the read.
        let service = self.service()?;
        let entry = service
            .get_entry(zid)
            .filter(|e| e.meta_spec != MetaSpec::Unknown)
            .ok_or(PlaceError::UnknownId(zid))?;
        let mut zettel =
            self.worker_send(zid, |reply| WorkerCommand::GetMetaContent { entry, reply })??;
        apply_defaults(&mut zettel.meta, &self.config);
        self.cache.insert(zettel.meta.frozen_clone());
        Ok(zettel)
    }

    fn get_meta(&self, zid: Zid) -> PlaceResult<Meta> {
        Ok(self.load_meta(zid)?.frozen_clone())
    }

    fn select_meta(
        &self,
        filter: Option<&Filter>,
        sorter: Option<&Sorter>,
    ) -> PlaceResult<Vec<Meta>> {
        let service = self.service()?;
        let mut metas: Vec<Arc<Meta>> = Vec::new();
        for entry in service.get_entries() {
            if entry.meta_spec == MetaSpec::Unknown {
                continue;
            }
            metas.push(self.load_meta(entry.zid)?);
        }
        metas.sort_by(|a, b| b.zid().cmp(&a.zid())); // I5: descending before sort

        let mut refs: Vec<&Meta> = metas.iter().map(|m| m.as_ref()).collect();
        if let Some(f) = filter {
            refs.retain(|m| f.matches(m));
        }
        if let Some(s) = sorter {
            s.sort(&mut refs);
        }
        Ok(refs.into_iter().map(|m| m.frozen_clone()).collect())
    }

    fn create_zettel(&self, zettel: Zettel) -> PlaceResult<Zid> {
        self.check_writable()?;
        let service = self.service()?;
        let zid = service.get_new()?;
        let mut meta = zettel.meta.with_zid(zid);
        apply_defaults(&mut meta, &self.config);
        let new_zettel = Zettel::new(meta, zettel.content);
        let entry = self.worker_send(zid, |reply| WorkerCommand::SetZettel {
            dir: self.path.clone(),
            zettel: new_zettel,
            existing: None,
            reply,
        })??;
        service.update_entry(entry);
        Ok(zid)
    }

    fn update_zettel(&self, zettel: Zettel) -> PlaceResult<()> {
        self.check_writable()?;
        let zid = zettel.zid();
        if !zid.is_valid() {
            return Err(PlaceError::InvalidId(zid.to_string()));
        }
        let service = self.service()?;
        let existing = service.get_entry(zid);
        let mut meta = zettel.meta;
        apply_defaults(&mut meta, &self.config);
        let new_zettel = Zettel::new(meta, zettel.content);
        let entry = self.worker_send(zid, |reply| WorkerCommand::SetZettel {
            dir: self.path.clone(),
            zettel: new_zettel,
            existing,
            reply,
        })??;
        service.update_entry(entry);
        Ok(())
    }

    fn rename_zettel(&self, cur: Zid, new: Zid) -> PlaceResult<()> {
        self.check_writable()?;
        if cur == new {
            return Ok(());
        }
        let service = self.service()?;
        if service.get_entry(new).is_some() {
            return Err(PlaceError::InvalidId(new.to_string()));
        }
        let cur_entry = service.get_entry(cur).ok_or(PlaceError::UnknownId(cur))?;
        let new_entry = self.worker_send(cur, |reply| WorkerCommand::RenameZettel {
            dir: self.path.clone(),
            cur_entry,
            new_zid: new,
            reply,
        })??;
        service.rename_entry(cur, new_entry)?;
        self.cache.evict(cur);
        Ok(())
    }

    fn delete_zettel(&self, zid: Zid) -> PlaceResult<()> {
        self.check_writable()?;
        let service = self.service()?;
        let entry = service.get_entry(zid);
        self.worker_send(zid, |reply| WorkerCommand::DeleteZettel { entry, reply })??;
        service.delete_entry(zid);
        self.cache.evict(zid);
        Ok(())
    }

    fn reload(&self) -> PlaceResult<()> {
        self.service()?.reload();
        Ok(())
    }

    fn can_create_zettel(&self) -> bool {
        !self.read_only
    }
    fn can_update_zettel(&self) -> bool {
        !self.read_only
    }
    fn can_rename_zettel(&self) -> bool {
        !self.read_only
    }
    fn can_delete_zettel(&self) -> bool {
        !self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;
    use tempfile::tempdir;

    fn place(dir: &std::path::Path) -> DirectoryPlace {
        DirectoryPlace::new(dir.to_path_buf(), StoreConfig::default(), false)
    }

    #[test]
    fn test_stopped_guard_before_start() {
        let dir = tempdir().unwrap();
        let place = place(dir.path());
        let result = place.get_meta(Zid::parse("20200101000001").unwrap());
        assert!(matches!(result, Err(PlaceError::Stopped)));
    }

    #[test]
    fn test_create_then_get_zettel_scenario_1() {
        let dir = tempdir().unwrap();
        let place = place(dir.path());
        place.start().unwrap();

        let mut meta = Meta::new(Zid::INVALID);
        meta.set("title", "Hello").unwrap();
        meta.set("syntax", "zmk").unwrap();
        let zettel = Zettel::new(meta, Content::from("World"));

        let zid = place.create_zettel(zettel).unwrap();
        assert!(zid.is_valid());

        let path = dir.path().join(format!("{zid}.zettel"));
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, "title: Hello\nsyntax: zmk\n\nWorld");

        let fetched = place.get_zettel(zid).unwrap();
        assert_eq!(fetched.content.as_str_lossy(), "World");

        place.stop().unwrap();
    }

    #[test]
    fn test_rename_collision_scenario_4() {
        let dir = tempdir().unwrap();
        let place = place(dir.path());
        place.start().unwrap();

        let z1 = Zid::parse("20200101000001").unwrap();
        let z2 = Zid::parse("20200101000002").unwrap();
        for z in [z1, z2] {
            let mut meta = Meta::new(z);
            meta.set("title", "x").unwrap();
            place.update_zettel(Zettel::new(meta, Content::from("body"))).unwrap();
        }

        let result = place.rename_zettel(z1, z2);
        assert!(matches!(result, Err(PlaceError::InvalidId(_))));
        assert!(dir.path().join(format!("{z1}.zettel")).exists());
        assert!(dir.path().join(format!("{z2}.zettel")).exists());

        place.stop().unwrap();
    }

    #[test]
    fn test_delete_is_idempotent_and_notifies() {
        let dir = tempdir().unwrap();
        let place = place(dir.path());
        place.start().unwrap();
        let zid = Zid::parse("20200101000001").unwrap();

        let notified = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let notified_clone = notified.clone();
        place.register_change_observer(Arc::new(move |_, _| {
            notified_clone.store(true, std::sync::atomic::Ordering::SeqCst);
        }));

        place.delete_zettel(zid).unwrap(); // absent: still succeeds
        assert!(notified.load(std::sync::atomic::Ordering::SeqCst));
        assert!(matches!(
            place.get_meta(zid),
            Err(PlaceError::UnknownId(_))
        ));

        place.stop().unwrap();
    }

    #[test]
    fn test_read_only_place_rejects_writes() {
        let dir = tempdir().unwrap();
        let place = DirectoryPlace::new(dir.path().to_path_buf(), StoreConfig::default(), true);
        place.start().unwrap();
        let meta = Meta::new(Zid::INVALID);
        let result = place.create_zettel(Zettel::new(meta, Content::default()));
        assert!(matches!(result, Err(PlaceError::ReadOnly)));
        place.stop().unwrap();
    }

    #[test]
    fn test_select_meta_default_completion() {
        let dir = tempdir().unwrap();
        let place = place(dir.path());
        place.start().unwrap();

        let mut meta = Meta::new(Zid::INVALID);
        meta.set("title", "No syntax here").unwrap();
        place.create_zettel(Zettel::new(meta, Content::from("x"))).unwrap();

        let metas = place.select_meta(None, None).unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].get("syntax"), Some("zmk"));

        place.stop().unwrap();
    }
}
