//! Concrete rule implementations
//!
//! Grouped by the structures they rewrite.

pub mod listing;
pub mod part;
pub mod prune;
pub mod quote;
pub mod rename;
pub mod table;
pub mod xref;

pub use listing::{AttachCalloutLists, FormalListings, InformalListings};
pub use part::{HoistAppendices, PartIntro};
pub use prune::{PruneMetadata, RemoveElements};
pub use quote::{FlattenAttributions, WrapBlockquotes};
pub use rename::{RenameAttribute, RenameElements};
pub use table::WrapHeaderCells;
pub use xref::LabelCrossReferences;

/// Code and screen blocks, before or after renaming
pub(crate) const CODE_BLOCKS: &str = "screen|programlisting";
