// crates/zettel-core/src/directory/cache.rs - concurrent frozen-Meta cache

use std::sync::Arc;

use dashmap::DashMap;

use crate::meta::Meta;
use crate::zid::Zid;

/// `Zid -> frozen Meta` cache for a [`super::DirectoryPlace`] (spec.md
/// §4.5). `dashmap` was promoted from the teacher's optional `performance`
/// feature to a direct dependency here, since this cache is core
/// functionality rather than an optional speed-up (see DESIGN.md).
#[derive(Default)]
pub struct MetaCache {
    inner: DashMap<Zid, Arc<Meta>>,
}

impl MetaCache {
    pub fn new() -> Self {
        MetaCache {
            inner: DashMap::new(),
        }
    }

    pub fn get(&self, zid: Zid) -> Option<Arc<Meta>> {
        self.inner.get(&zid).map(|entry| entry.value().clone())
    }

    /// Insert a Meta, freezing it first if it wasn't already (I4: "a
    /// cached Meta is frozen").
    pub fn insert(&self, mut meta: Meta) -> Arc<Meta> {
        meta.freeze();
        let arc = Arc::new(meta);
        self.inner.insert(arc.zid(), arc.clone());
        arc
    }

    pub fn evict(&self, zid: Zid) {
        self.inner.remove(&zid);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
