use serde::Serialize;
use shelf_types::CollectionKind;
use time::OffsetDateTime;

use crate::payload::Payload;

pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    type Create: Payload;
    type Update: Payload;

    const COLLECTION: CollectionKind;
    const REQUIRED_FIELDS: &'static [&'static str];

    fn build(id: u64, payload: Self::Create, now: OffsetDateTime) -> Self;

    fn apply(&mut self, update: Self::Update);

    fn id(&self) -> u64;

    fn created_at(&self) -> OffsetDateTime;

    fn updated_at(&self) -> OffsetDateTime;

    fn set_updated_at(&mut self, at: OffsetDateTime);

    fn label(&self) -> &str;

    fn samples() -> Vec<Self::Create>;

    fn kind_name() -> &'static str {
        Self::COLLECTION.kind_name()
    }
}
