// crates/zettel-core/src/directory/service.rs - the directory index actor
//
// Grounded on the `gaspardpetit-findx` reference watcher
// (`examples/other_examples/67b767e6_...fs-mod.rs.rs`) for the
// notify-driven collector shape, composed with `crossbeam_channel::select!`
// for the three-producer actor loop spec.md §4.3 describes. One
// simplification versus that reference: notify 6's `EventHandler` trait is
// implemented for any `FnMut(Result<Event>) + Send + 'static`, so the
// crossbeam sender itself serves as the watcher callback directly — no
// intermediate `std::sync::mpsc` bridge thread is needed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::error::{PlaceError, PlaceResult};
use crate::observer::ObserverBus;
use crate::zid::{Zid, ZidMinter};

use super::entry::{parse_filename, DirEntry};

/// A coalesced filesystem event, the collector's output per spec.md §4.3.
enum FileEvent {
    Update(PathBuf),
    Delete(PathBuf),
}

fn to_file_events(event: Event) -> Vec<FileEvent> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            event.paths.into_iter().map(FileEvent::Update).collect()
        }
        EventKind::Remove(_) => event.paths.into_iter().map(FileEvent::Delete).collect(),
        _ => Vec::new(),
    }
}

/// Commands a [`DirectoryServiceHandle`] sends to the actor thread.
pub enum ServiceCommand {
    GetEntries {
        reply: Sender<Vec<DirEntry>>,
    },
    GetEntry {
        zid: Zid,
        reply: Sender<Option<DirEntry>>,
    },
    /// Mint a fresh Zid and reserve a placeholder entry for it.
    GetNew {
        reply: Sender<PlaceResult<Zid>>,
    },
    UpdateEntry {
        entry: DirEntry,
        reply: Sender<()>,
    },
    RenameEntry {
        cur: Zid,
        new_entry: DirEntry,
        reply: Sender<PlaceResult<()>>,
    },
    DeleteEntry {
        zid: Zid,
        reply: Sender<()>,
    },
    Reload {
        reply: Sender<()>,
    },
    Stop {
        reply: Sender<()>,
    },
}

/// A cheap, cloneable handle used by clients (the `DirectoryPlace` and its
/// workers) to talk to the running actor thread.
#[derive(Clone)]
pub struct DirectoryServiceHandle {
    command_tx: Sender<ServiceCommand>,
}

impl DirectoryServiceHandle {
    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> ServiceCommand) -> Option<T> {
        let (reply_tx, reply_rx) = bounded(1);
        self.command_tx.send(build(reply_tx)).ok()?;
        reply_rx.recv().ok()
    }

    pub fn get_entries(&self) -> Vec<DirEntry> {
        self.request(|reply| ServiceCommand::GetEntries { reply })
            .unwrap_or_default()
    }

    pub fn get_entry(&self, zid: Zid) -> Option<DirEntry> {
        self.request(|reply| ServiceCommand::GetEntry { zid, reply })
            .flatten()
    }

    pub fn get_new(&self) -> PlaceResult<Zid> {
        self.request(|reply| ServiceCommand::GetNew { reply })
            .unwrap_or(Err(PlaceError::Stopped))
    }

    pub fn update_entry(&self, entry: DirEntry) {
        self.request(|reply| ServiceCommand::UpdateEntry { entry, reply });
    }

    pub fn rename_entry(&self, cur: Zid, new_entry: DirEntry) -> PlaceResult<()> {
        self.request(|reply| ServiceCommand::RenameEntry {
            cur,
            new_entry,
            reply,
        })
        .unwrap_or(Err(PlaceError::Stopped))
    }

    pub fn delete_entry(&self, zid: Zid) {
        self.request(|reply| ServiceCommand::DeleteEntry { zid, reply });
    }

    pub fn reload(&self) {
        self.request(|reply| ServiceCommand::Reload { reply });
    }

    pub fn stop(&self) {
        self.request(|reply| ServiceCommand::Stop { reply });
    }
}

/// Scan `path` non-recursively, grouping files into entries per the
/// `<14-digit>(\.<ext>)?` filename grammar (spec.md §4.3).
fn scan_directory(path: &Path) -> HashMap<Zid, DirEntry> {
    let mut map: HashMap<Zid, DirEntry> = HashMap::new();
    let walker = WalkDir::new(path).min_depth(1).max_depth(1);
    for entry in walker.into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some((zid, ext)) = parse_filename(name) else {
            continue;
        };
        map.entry(zid)
            .or_insert_with(|| DirEntry::new(zid))
            .observe(entry.path(), ext.as_deref());
    }
    map
}

struct ActorState {
    path: PathBuf,
    current: HashMap<Zid, DirEntry>,
    reloading: Option<HashMap<Zid, DirEntry>>,
    minter: ZidMinter,
}

impl ActorState {
    fn active_map_mut(&mut self) -> &mut HashMap<Zid, DirEntry> {
        self.reloading.as_mut().unwrap_or(&mut self.current)
    }

    fn active_map(&self) -> &HashMap<Zid, DirEntry> {
        self.reloading.as_ref().unwrap_or(&self.current)
    }

    fn full_rescan(&mut self, observers: &ObserverBus) {
        self.reloading = Some(scan_directory(&self.path));
        self.current = self.reloading.take().unwrap();
        observers.notify(true, Zid::INVALID);
    }

    fn handle_file_event(&mut self, event: FileEvent, observers: &ObserverBus) {
        match event {
            FileEvent::Update(path) => self.handle_path_update(&path, observers),
            FileEvent::Delete(path) => self.handle_path_delete(&path, observers),
        }
    }

    fn handle_path_update(&mut self, path: &Path, observers: &ObserverBus) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let Some((zid, ext)) = parse_filename(name) else {
            return;
        };
        let reloading = self.reloading.is_some();
        self.active_map_mut()
            .entry(zid)
            .or_insert_with(|| DirEntry::new(zid))
            .observe(path, ext.as_deref());
        if !reloading {
            observers.notify(false, zid);
        }
    }

    fn handle_path_delete(&mut self, path: &Path, observers: &ObserverBus) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let Some((zid, _)) = parse_filename(name) else {
            return;
        };
        let reloading = self.reloading.is_some();
        self.active_map_mut().remove(&zid);
        if !reloading {
            observers.notify(false, zid);
        }
    }

    fn handle_command(&mut self, cmd: ServiceCommand, observers: &ObserverBus) -> bool {
        match cmd {
            ServiceCommand::GetEntries { reply } => {
                let _ = reply.send(self.active_map().values().cloned().collect());
            }
            ServiceCommand::GetEntry { zid, reply } => {
                let _ = reply.send(self.active_map().get(&zid).cloned());
            }
            ServiceCommand::GetNew { reply } => {
                let result = self.mint_and_reserve();
                match &result {
                    Ok(zid) => debug!(path = %self.path.display(), %zid, "minted new zid"),
                    Err(e) => error!(path = %self.path.display(), error = %e, "failed to mint new zid"),
                }
                let _ = reply.send(result);
            }
            ServiceCommand::UpdateEntry { entry, reply } => {
                let zid = entry.zid;
                let reloading = self.reloading.is_some();
                self.active_map_mut().insert(zid, entry);
                if !reloading {
                    observers.notify(false, zid);
                }
                debug!(%zid, "entry updated");
                let _ = reply.send(());
            }
            ServiceCommand::RenameEntry {
                cur,
                new_entry,
                reply,
            } => {
                let new_zid = new_entry.zid;
                let result = if self.active_map().contains_key(&new_zid) {
                    Err(PlaceError::InvalidId(new_zid.to_string()))
                } else {
                    let reloading = self.reloading.is_some();
                    self.active_map_mut().remove(&cur);
                    self.active_map_mut().insert(new_zid, new_entry);
                    if !reloading {
                        observers.notify(false, cur);
                        observers.notify(false, new_zid);
                    }
                    Ok(())
                };
                if let Err(e) = &result {
                    warn!(cur = %cur, new = %new_zid, error = %e, "rename rejected");
                } else {
                    debug!(cur = %cur, new = %new_zid, "entry renamed");
                }
                let _ = reply.send(result);
            }
            ServiceCommand::DeleteEntry { zid, reply } => {
                let reloading = self.reloading.is_some();
                self.active_map_mut().remove(&zid);
                if !reloading {
                    observers.notify(false, zid);
                }
                debug!(%zid, "entry deleted");
                let _ = reply.send(());
            }
            ServiceCommand::Reload { reply } => {
                self.full_rescan(observers);
                debug!(path = %self.path.display(), "full rescan completed");
                let _ = reply.send(());
            }
            ServiceCommand::Stop { reply } => {
                debug!(path = %self.path.display(), "service stopping");
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    /// `GetNew`: try the current UTC second; if taken, mint the next free
    /// value monotonically (spec.md §4.3/§9 open question (a); the
    /// non-blocking monotonic path, not sleep-and-retry — see DESIGN.md).
    fn mint_and_reserve(&mut self) -> PlaceResult<Zid> {
        loop {
            let candidate = self.minter.next_candidate();
            if !self.current.contains_key(&candidate)
                && !self.reloading.as_ref().is_some_and(|m| m.contains_key(&candidate))
            {
                self.active_map_mut()
                    .insert(candidate, DirEntry::new(candidate));
                return Ok(candidate);
            }
            // next_candidate() is already monotonic across calls on this
            // minter, so a collision here only happens against entries
            // discovered by the watcher/rescan after the minter last ran;
            // looping re-draws a fresh, necessarily-larger candidate.
        }
    }
}

fn spawn_watcher(path: &Path) -> (RecommendedWatcher, Receiver<notify::Result<Event>>) {
    let (tx, rx) = unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .expect("failed to construct filesystem watcher");
    watcher
        .watch(path, RecursiveMode::NonRecursive)
        .expect("failed to watch directory");
    (watcher, rx)
}

/// Start the directory service actor thread. Blocks until the first full
/// scan completes (spec.md §4.3: "A ready channel releases Start once the
/// first full scan completes").
pub fn start(
    path: PathBuf,
    reload_interval: Duration,
    observers: ObserverBus,
) -> (DirectoryServiceHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = unbounded();
    let (ready_tx, ready_rx) = bounded(1);

    let handle_thread = thread::spawn(move || {
        let (_watcher, watcher_rx) = spawn_watcher(&path);
        let ticker_rx = crossbeam_channel::tick(reload_interval);

        let mut state = ActorState {
            path,
            current: HashMap::new(),
            reloading: None,
            minter: ZidMinter::new(),
        };
        state.full_rescan(&observers);
        debug!(path = %state.path.display(), entries = state.current.len(), "directory service ready");
        let _ = ready_tx.send(());

        loop {
            select! {
                recv(watcher_rx) -> msg => {
                    match msg {
                        Ok(Ok(event)) => {
                            for fe in to_file_events(event) {
                                state.handle_file_event(fe, &observers);
                            }
                        }
                        Ok(Err(e)) => {
                            // watcher reported an error on an individual event;
                            // keep running (spec.md §7).
                            warn!(path = %state.path.display(), error = %e, "watcher event error");
                        }
                        Err(_) => {
                            // watcher channel disconnected: fatal to this place,
                            // but the command channel keeps the actor alive so
                            // Stop can still be delivered cleanly.
                            error!(path = %state.path.display(), "watcher channel disconnected");
                        }
                    }
                }
                recv(ticker_rx) -> _ => {
                    state.full_rescan(&observers);
                }
                recv(command_rx) -> cmd => {
                    match cmd {
                        Ok(c) => {
                            if !state.handle_command(c, &observers) {
                                break;
                            }
                        }
                        Err(_) => {
                            error!(path = %state.path.display(), "command channel disconnected");
                            break;
                        }
                    }
                }
            }
        }
        debug!(path = %state.path.display(), "directory service actor exiting");
    });

    let _ = ready_rx.recv();
    (DirectoryServiceHandle { command_tx }, handle_thread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_start_and_stop() {
        let dir = tempdir().unwrap();
        let (handle, join) = start(
            dir.path().to_path_buf(),
            Duration::from_secs(600),
            ObserverBus::new(),
        );
        assert!(handle.get_entries().is_empty());
        handle.stop();
        join.join().unwrap();
    }

    #[test]
    fn test_get_new_never_collides_under_contention() {
        let dir = tempdir().unwrap();
        let (handle, join) = start(
            dir.path().to_path_buf(),
            Duration::from_secs(600),
            ObserverBus::new(),
        );
        let handle = Arc::new(handle);
        let mut threads = Vec::new();
        for _ in 0..50 {
            let h = handle.clone();
            threads.push(thread::spawn(move || h.get_new().unwrap()));
        }
        let mut seen = HashSet::new();
        for t in threads {
            assert!(seen.insert(t.join().unwrap()));
        }
        assert_eq!(seen.len(), 50);
        handle.stop();
        join.join().unwrap();
    }

    #[test]
    fn test_rename_collision_detected() {
        let dir = tempdir().unwrap();
        let (handle, join) = start(
            dir.path().to_path_buf(),
            Duration::from_secs(600),
            ObserverBus::new(),
        );
        let cur = Zid::parse("20200101000001").unwrap();
        let new = Zid::parse("20200101000002").unwrap();
        handle.update_entry(DirEntry::new(cur));
        handle.update_entry(DirEntry::new(new));

        let result = handle.rename_entry(cur, DirEntry::new(new));
        assert!(matches!(result, Err(PlaceError::InvalidId(_))));

        handle.stop();
        join.join().unwrap();
    }

    #[test]
    fn test_update_and_delete_entry_round_trip() {
        let dir = tempdir().unwrap();
        let (handle, join) = start(
            dir.path().to_path_buf(),
            Duration::from_secs(600),
            ObserverBus::new(),
        );
        let zid = Zid::parse("20200101000001").unwrap();
        handle.update_entry(DirEntry::new(zid));
        assert!(handle.get_entry(zid).is_some());
        handle.delete_entry(zid);
        assert!(handle.get_entry(zid).is_none());
        handle.stop();
        join.join().unwrap();
    }
}
