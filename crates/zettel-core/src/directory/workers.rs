// crates/zettel-core/src/directory/workers.rs - sharded file I/O pool
//
// Grounded directly on spec.md §4.4 (no close teacher analogue beyond the
// general channel/worker idiom the teacher uses for its service layer);
// FNV-1a hashing is implemented by hand since pulling in a hashing crate
// for one function isn't justified.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::content::Content;
use crate::error::{PlaceError, PlaceResult};
use crate::meta::Meta;
use crate::metatext::{self, HeaderSeparator};
use crate::zettel::Zettel;
use crate::zid::Zid;

use super::entry::{DirEntry, MetaSpec};

/// FNV-1a over a Zid's 14-digit decimal string, matching spec.md §4.4's
/// "stable hash (FNV-1a over the Zid's decimal form)".
fn fnv1a(s: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS;
    for byte in s.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

pub fn worker_index(zid: Zid, worker_count: usize) -> usize {
    (fnv1a(&zid.to_string()) % worker_count as u64) as usize
}

/// A request sent to one shard of the pool. Every variant carries a reply
/// sender; workers always reply, including on error, then read the next
/// command (spec.md §4.4).
pub enum WorkerCommand {
    GetMetaContent {
        entry: DirEntry,
        reply: Sender<PlaceResult<Zettel>>,
    },
    GetMeta {
        entry: DirEntry,
        reply: Sender<PlaceResult<Meta>>,
    },
    SetZettel {
        dir: PathBuf,
        zettel: Zettel,
        existing: Option<DirEntry>,
        reply: Sender<PlaceResult<DirEntry>>,
    },
    RenameZettel {
        dir: PathBuf,
        cur_entry: DirEntry,
        new_zid: Zid,
        reply: Sender<PlaceResult<DirEntry>>,
    },
    DeleteZettel {
        entry: Option<DirEntry>,
        reply: Sender<PlaceResult<()>>,
    },
    Shutdown,
}

/// Per-shard remembered header-separator style, keyed by Zid, so a write
/// that follows a read of a headered entry preserves the author's
/// blank-line-vs-`---` choice (spec.md §4.4).
struct Worker {
    receiver: Receiver<WorkerCommand>,
    separators: HashMap<Zid, HeaderSeparator>,
}

impl Worker {
    fn run(mut self) {
        while let Ok(cmd) = self.receiver.recv() {
            match cmd {
                WorkerCommand::GetMetaContent { entry, reply } => {
                    debug!(zid = %entry.zid, "dispatch get_meta_content");
                    let result = self.read_zettel(&entry);
                    if let Err(e) = &result {
                        warn!(zid = %entry.zid, error = %e, "get_meta_content failed");
                    }
                    let _ = reply.send(result);
                }
                WorkerCommand::GetMeta { entry, reply } => {
                    debug!(zid = %entry.zid, "dispatch get_meta");
                    let result = self.read_meta(&entry);
                    if let Err(e) = &result {
                        warn!(zid = %entry.zid, error = %e, "get_meta failed");
                    }
                    let _ = reply.send(result);
                }
                WorkerCommand::SetZettel {
                    dir,
                    zettel,
                    existing,
                    reply,
                } => {
                    let zid = zettel.zid();
                    debug!(%zid, "dispatch set_zettel");
                    let result = self.write_zettel(&dir, zettel, existing);
                    if let Err(e) = &result {
                        warn!(%zid, error = %e, "set_zettel failed");
                    }
                    let _ = reply.send(result);
                }
                WorkerCommand::RenameZettel {
                    dir,
                    cur_entry,
                    new_zid,
                    reply,
                } => {
                    debug!(cur = %cur_entry.zid, new = %new_zid, "dispatch rename_zettel");
                    let result = self.rename_zettel(&dir, cur_entry, new_zid);
                    if let Err(e) = &result {
                        warn!(new = %new_zid, error = %e, "rename_zettel failed");
                    }
                    let _ = reply.send(result);
                }
                WorkerCommand::DeleteZettel { entry, reply } => {
                    let zid = entry.as_ref().map(|e| e.zid);
                    debug!(?zid, "dispatch delete_zettel");
                    let _ = reply.send(self.delete_zettel(entry));
                }
                WorkerCommand::Shutdown => {
                    debug!("worker shutting down");
                    break;
                }
            }
        }
    }

    fn read_meta(&mut self, entry: &DirEntry) -> PlaceResult<Meta> {
        Ok(self.read_zettel(entry)?.meta)
    }

    fn read_zettel(&mut self, entry: &DirEntry) -> PlaceResult<Zettel> {
        match entry.meta_spec {
            MetaSpec::File => {
                let meta_path = entry
                    .meta_path
                    .as_ref()
                    .ok_or_else(|| PlaceError::NotAllowed("missing sidecar path".to_string()))?;
                let meta_text = fs::read_to_string(meta_path)?;
                let meta = metatext::parse(entry.zid, &meta_text);
                let content = match &entry.content_path {
                    Some(p) => Content::new(fs::read(p)?),
                    None => Content::default(),
                };
                Ok(Zettel::new(meta, content))
            }
            MetaSpec::Header => {
                let content_path = entry
                    .content_path
                    .as_ref()
                    .ok_or_else(|| PlaceError::NotAllowed("missing content path".to_string()))?;
                let full = fs::read_to_string(content_path)?;
                let (header_text, body, sep) = metatext::split_header(&full);
                if let Some(sep) = sep {
                    self.separators.insert(entry.zid, sep);
                }
                let meta = metatext::parse(entry.zid, &header_text);
                Ok(Zettel::new(meta, Content::from(body)))
            }
            MetaSpec::NoMeta => {
                let content_path = entry
                    .content_path
                    .as_ref()
                    .ok_or_else(|| PlaceError::NotAllowed("missing content path".to_string()))?;
                let bytes = fs::read(content_path)?;
                Ok(Zettel::new(Meta::new(entry.zid), Content::new(bytes)))
            }
            MetaSpec::Unknown => Err(PlaceError::UnknownId(entry.zid)),
        }
    }

    fn write_zettel(
        &mut self,
        dir: &std::path::Path,
        zettel: Zettel,
        existing: Option<DirEntry>,
    ) -> PlaceResult<DirEntry> {
        fs::create_dir_all(dir)?;
        let zid = zettel.zid();
        let mut entry = DirEntry::new(zid);

        if zettel.content.is_binary() {
            let ext = zettel.meta.get("content-ext").unwrap_or("bin").to_string();
            let meta_path = dir.join(format!("{zid}.meta"));
            let content_path = dir.join(format!("{zid}.{ext}"));
            fs::write(&meta_path, metatext::serialize(&zettel.meta))?;
            fs::write(&content_path, zettel.content.as_bytes())?;
            entry.meta_spec = MetaSpec::File;
            entry.meta_path = Some(meta_path);
            entry.content_path = Some(content_path);
            entry.content_ext = Some(ext);
        } else {
            let sep = existing
                .as_ref()
                .and_then(|_| self.separators.get(&zid).copied())
                .unwrap_or(HeaderSeparator::BlankLine);
            let header = metatext::serialize(&zettel.meta);
            let header = header.trim_end();
            let body = zettel.content.as_str_lossy();
            let full = metatext::join_header(header, &body, sep);
            let content_path = dir.join(format!("{zid}.zettel"));
            fs::write(&content_path, full)?;
            self.separators.insert(zid, sep);
            entry.meta_spec = MetaSpec::Header;
            entry.content_path = Some(content_path);
            entry.content_ext = Some("zettel".to_string());
        }
        Ok(entry)
    }

    fn rename_zettel(
        &mut self,
        dir: &std::path::Path,
        cur_entry: DirEntry,
        new_zid: Zid,
    ) -> PlaceResult<DirEntry> {
        let mut new_entry = DirEntry::new(new_zid);

        if let Some(meta_path) = &cur_entry.meta_path {
            let new_meta_path = dir.join(format!("{new_zid}.meta"));
            fs::rename(meta_path, &new_meta_path)?;
            new_entry.meta_path = Some(new_meta_path);
        }
        if let Some(content_path) = &cur_entry.content_path {
            let ext = cur_entry
                .content_ext
                .clone()
                .unwrap_or_else(|| "zettel".to_string());
            let new_content_path = dir.join(format!("{new_zid}.{ext}"));
            fs::rename(content_path, &new_content_path)?;
            new_entry.content_path = Some(new_content_path);
            new_entry.content_ext = Some(ext);
        }
        new_entry.meta_spec = cur_entry.meta_spec;
        if let Some(sep) = self.separators.remove(&cur_entry.zid) {
            self.separators.insert(new_zid, sep);
        }
        Ok(new_entry)
    }

    fn delete_zettel(&mut self, entry: Option<DirEntry>) -> PlaceResult<()> {
        let Some(entry) = entry else {
            return Ok(()); // absence is not an error (idempotent delete)
        };
        if let Some(meta_path) = &entry.meta_path {
            let _ = fs::remove_file(meta_path);
        }
        if let Some(content_path) = &entry.content_path {
            let _ = fs::remove_file(content_path);
        }
        self.separators.remove(&entry.zid);
        Ok(())
    }
}

/// A fixed shard of `N` worker threads (default 17), each serialising all
/// I/O for a stable subset of Zids (spec.md §4.4).
pub struct FileWorkerPool {
    senders: Vec<Sender<WorkerCommand>>,
    handles: Vec<JoinHandle<()>>,
}

impl FileWorkerPool {
    pub fn spawn(worker_count: usize) -> Self {
        let mut senders = Vec::with_capacity(worker_count);
        let mut handles = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            let (tx, rx) = crossbeam_channel::unbounded();
            let worker = Worker {
                receiver: rx,
                separators: HashMap::new(),
            };
            handles.push(thread::spawn(move || worker.run()));
            senders.push(tx);
        }
        FileWorkerPool { senders, handles }
    }

    pub fn worker_count(&self) -> usize {
        self.senders.len()
    }

    pub fn send(&self, zid: Zid, cmd: WorkerCommand) {
        let idx = worker_index(zid, self.senders.len());
        // Channel is unbounded and workers never exit except on Shutdown,
        // so send cannot fail in ordinary operation.
        let _ = self.senders[idx].send(cmd);
    }

    pub fn shutdown(self) {
        for sender in &self.senders {
            let _ = sender.send(WorkerCommand::Shutdown);
        }
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use tempfile::tempdir;

    fn zid(s: &str) -> Zid {
        Zid::parse(s).unwrap()
    }

    #[test]
    fn test_fnv1a_is_deterministic() {
        assert_eq!(fnv1a("20200101000001"), fnv1a("20200101000001"));
        assert_ne!(fnv1a("20200101000001"), fnv1a("20200101000002"));
    }

    #[test]
    fn test_worker_index_is_stable_for_same_zid() {
        let a = worker_index(zid("20200101000001"), 17);
        let b = worker_index(zid("20200101000001"), 17);
        assert_eq!(a, b);
        assert!(a < 17);
    }

    #[test]
    fn test_write_then_read_headered_zettel() {
        let dir = tempdir().unwrap();
        let pool = FileWorkerPool::spawn(4);

        let mut meta = Meta::new(zid("20200101000001"));
        meta.set("title", "Hello").unwrap();
        meta.set("syntax", "zmk").unwrap();
        let zettel = Zettel::new(meta, Content::from("World"));

        let (tx, rx) = bounded(1);
        pool.send(
            zid("20200101000001"),
            WorkerCommand::SetZettel {
                dir: dir.path().to_path_buf(),
                zettel,
                existing: None,
                reply: tx,
            },
        );
        let entry = rx.recv().unwrap().unwrap();
        assert_eq!(entry.meta_spec, MetaSpec::Header);

        let (tx, rx) = bounded(1);
        pool.send(
            zid("20200101000001"),
            WorkerCommand::GetMetaContent { entry, reply: tx },
        );
        let zettel = rx.recv().unwrap().unwrap();
        assert_eq!(zettel.meta.title(), "Hello");
        assert_eq!(zettel.content.as_str_lossy(), "World");

        pool.shutdown();
    }

    #[test]
    fn test_delete_is_idempotent_on_absent_entry() {
        let pool = FileWorkerPool::spawn(2);
        let (tx, rx) = bounded(1);
        pool.send(zid("20200101000001"), WorkerCommand::DeleteZettel { entry: None, reply: tx });
        assert!(rx.recv().unwrap().is_ok());
        pool.shutdown();
    }
}
