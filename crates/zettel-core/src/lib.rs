// crates/zettel-core/src/lib.rs - storage core for a personal knowledge server
//
// The teacher repo has no `lib.rs` of its own (its four source files are
// compiled only via `examples/playground.rs`'s ad hoc `use zettel_core::id::*`,
// which would not actually build without one) — this crate root is this
// spec's fix for that gap, not a reproduction of it.

pub mod chain;
pub mod config;
pub mod const_place;
pub mod content;
pub mod directory;
pub mod error;
pub mod filter;
pub mod meta;
pub mod metatext;
pub mod observer;
pub mod place;
pub mod sorter;
pub mod template;
pub mod uri;
pub mod zettel;
pub mod zid;

pub use chain::ChainPlace;
pub use const_place::ConstantPlace;
pub use content::Content;
pub use directory::DirectoryPlace;
pub use error::{PlaceError, PlaceResult};
pub use filter::Filter;
pub use meta::Meta;
pub use place::Place;
pub use sorter::{Sorter, SortKey};
pub use uri::PlaceUri;
pub use zettel::Zettel;
pub use zid::Zid;
