//! Document tree library
//!
//! Arena-backed XML tree with structural editing, tag-path queries and
//! libxml-compatible parsing/serialization.
//!
//! ## Philosophy
//!
//! - **Good taste**: Data structures first, algorithms follow naturally
//! - **No special cases**: Re-parenting is detach + attach, nothing else
//! - **Indices, not pointers**: Parent links are lookup aids, the arena owns
//!
//! ## Core Design
//!
//! ```text
//! XML text → DomParser → DomArena (owned) → edits → DomSerializer → XML text
//!                            ↓
//!                     NodeId (u32), Selector
//! ```

pub mod arena;
pub mod document;
pub mod error;
pub mod parser;
pub mod selector;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use document::Document;
pub use error::{DomError, Result};
pub use parser::{parse, DomParser, ParserConfig};
pub use selector::Selector;
pub use serializer::{to_xml, DomSerializer, SerializerConfig};
pub use types::*;
