//! facetdoc-text
//!
//! Tantivy-backed implementation of the search index collaborator: named
//! indexes holding encoded documents, lazy paged queries, and facet counts.

pub mod cursor;
pub mod index;
pub mod provider;
pub mod schema;
mod validate;

pub use cursor::Cursor;
pub use index::{IndexOptions, TantivyIndex};
pub use provider::TantivyIndexes;
