// crates/zettel-core/src/place.rs - the uniform storage-backend contract

use crate::error::PlaceResult;
use crate::filter::Filter;
use crate::meta::Meta;
use crate::observer::ChangeObserver;
use crate::sorter::Sorter;
use crate::zettel::Zettel;
use crate::zid::Zid;

/// The uniform interface every storage backend implements (spec.md §4.1).
///
/// Expressed as a trait object (`Arc<dyn Place>`), per the Design Note
/// that a tagged variant and an interface-shaped trait are equally
/// acceptable; this spec picks the trait-object form because the teacher's
/// codebase favors trait-bound service boundaries throughout (e.g.
/// `IdManager<F: Fn(&str) -> bool>`, `VaultService`). Mutators take `&self`
/// with interior mutability, since every implementor is shared across
/// threads and held inside a `ChainPlace`.
pub trait Place: Send + Sync {
    /// Start the place. Starting an already-started place fails with
    /// [`crate::error::PlaceError::NotAllowed`].
    fn start(&self) -> PlaceResult<()>;

    /// Stop the place. The place is unusable after this returns; every
    /// subsequent operation must return
    /// [`crate::error::PlaceError::Stopped`] (P8).
    fn stop(&self) -> PlaceResult<()>;

    /// An opaque diagnostic string identifying this place (e.g. `dir:/path`
    /// or `const:`).
    fn location(&self) -> String;

    /// Register a change observer. Accepted even by read-only places
    /// (it is simply never invoked there).
    fn register_change_observer(&self, observer: ChangeObserver);

    fn get_zettel(&self, zid: Zid) -> PlaceResult<Zettel>;

    fn get_meta(&self, zid: Zid) -> PlaceResult<Meta>;

    /// List Metas matching `filter`, in descending-Zid order before
    /// `sorter` is applied. `filter=None, sorter=None` returns the full
    /// unfiltered descending-Zid list.
    fn select_meta(&self, filter: Option<&Filter>, sorter: Option<&Sorter>) -> PlaceResult<Vec<Meta>>;

    /// Create a new zettel; the place chooses and returns its Zid.
    fn create_zettel(&self, zettel: Zettel) -> PlaceResult<Zid>;

    /// Insert-or-replace by the zettel's own Zid; requires a valid Zid.
    fn update_zettel(&self, zettel: Zettel) -> PlaceResult<()>;

    /// Atomic rename; fails with `InvalidID` if `new` already exists;
    /// no-op success if `cur == new`.
    fn rename_zettel(&self, cur: Zid, new: Zid) -> PlaceResult<()>;

    /// Idempotent delete; fires a change event even if `zid` was absent.
    fn delete_zettel(&self, zid: Zid) -> PlaceResult<()>;

    /// Full cache flush and rescan; observer registrations survive.
    fn reload(&self) -> PlaceResult<()>;

    fn can_create_zettel(&self) -> bool;
    fn can_update_zettel(&self) -> bool;
    fn can_rename_zettel(&self) -> bool;
    fn can_delete_zettel(&self) -> bool;
}
