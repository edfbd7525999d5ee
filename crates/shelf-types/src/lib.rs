pub mod collection;
pub mod envelope;

pub use collection::{CollectionKind, FieldKind, FieldSpec};
pub use envelope::{Deleted, ErrorBody, Health, ItemEnvelope, ItemList};
