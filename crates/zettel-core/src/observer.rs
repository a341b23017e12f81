// crates/zettel-core/src/observer.rs - change-notification fan-out

use std::sync::{Arc, RwLock};

use crate::zid::Zid;

/// `fn(all_changed, zid)`: `all_changed=true` means "reconsider every
/// cached derivative", `all_changed=false` identifies a single Zid
/// (spec.md §4.7).
pub type ChangeObserver = Arc<dyn Fn(bool, Zid) + Send + Sync>;

/// An append-only, read-write-mutex-guarded list of change observers
/// shared by every `Place` implementation.
///
/// Grounded on the Arc/RwLock-guarded-state idiom the teacher uses for its
/// shared service state (`context.rs`); notification clones the observer
/// slice under the read lock, drops the lock, and calls each observer
/// outside of it, so an observer that re-enters the bus (to register a new
/// observer, say) cannot deadlock against a notifier.
#[derive(Clone)]
pub struct ObserverBus {
    observers: Arc<RwLock<Vec<ChangeObserver>>>,
}

impl ObserverBus {
    pub fn new() -> Self {
        ObserverBus {
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn register(&self, observer: ChangeObserver) {
        self.observers.write().unwrap().push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify every registered observer. Observers are expected to be fast
    /// and non-reentrant on the calling place (spec.md §4.7); this bus
    /// only guarantees each is called at most once per notification.
    pub fn notify(&self, all_changed: bool, zid: Zid) {
        let snapshot: Vec<ChangeObserver> = self.observers.read().unwrap().clone();
        for observer in snapshot {
            observer(all_changed, zid);
        }
    }
}

impl Default for ObserverBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_calls_all_observers_once() {
        let bus = ObserverBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = count.clone();
        bus.register(Arc::new(move |_, _| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = count.clone();
        bus.register(Arc::new(move |_, _| {
            c2.fetch_add(1, Ordering::SeqCst);
        }));

        bus.notify(false, Zid::parse("20200101000001").unwrap());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_registration_is_append_only_and_order_preserved_by_count() {
        let bus = ObserverBus::new();
        assert!(bus.is_empty());
        bus.register(Arc::new(|_, _| {}));
        bus.register(Arc::new(|_, _| {}));
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn test_observer_can_reenter_bus_to_register() {
        let bus = ObserverBus::new();
        let bus_clone = bus.clone();
        let registered = Arc::new(AtomicUsize::new(0));
        let registered_clone = registered.clone();
        bus.register(Arc::new(move |_, zid| {
            registered_clone.fetch_add(1, Ordering::SeqCst);
            bus_clone.register(Arc::new(move |_, _| {
                let _ = zid;
            }));
        }));
        bus.notify(false, Zid::parse("20200101000001").unwrap());
        assert_eq!(registered.load(Ordering::SeqCst), 1);
        assert_eq!(bus.len(), 2);
    }
}
