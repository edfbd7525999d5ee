use std::collections::BTreeMap;

use time::OffsetDateTime;
use tracing::debug;

use crate::{
    entity::Entity,
    error::{Error, Result},
};

pub type Clock = Box<dyn Fn() -> OffsetDateTime + Send + Sync>;

// Ids only move forward, a deleted id is never reused.
pub struct Repository<E: Entity> {
    records: BTreeMap<u64, E>,
    next_id: u64,
    clock: Clock,
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Repository<E> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
            clock: Box::new(OffsetDateTime::now_utc),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> OffsetDateTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_sample_data(mut self) -> Self {
        for payload in E::samples() {
            self.create(payload);
        }
        debug!("Loaded {} sample {}", self.count(), E::COLLECTION);
        self
    }

    pub fn list_all(&self) -> Vec<E> {
        self.records.values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, id: u64) -> Result<E> {
        self.records
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<E>(id))
    }

    pub fn create(&mut self, payload: E::Create) -> E {
        let id = self.next_id;
        self.next_id += 1;
        let record = E::build(id, payload, (self.clock)());
        self.records.insert(id, record.clone());
        record
    }

    // updated_at is refreshed even for an update without changes and never moves backwards
    pub fn update(&mut self, id: u64, update: E::Update) -> Result<E> {
        let now = (self.clock)();
        let record = self.records.get_mut(&id).ok_or_else(|| not_found::<E>(id))?;
        record.apply(update);
        let stamp = now.max(record.updated_at());
        record.set_updated_at(stamp);
        Ok(record.clone())
    }

    pub fn delete(&mut self, id: u64) -> bool {
        self.records.remove(&id).is_some()
    }
}

fn not_found<E: Entity>(id: u64) -> Error {
    Error::RecordNotFound {
        kind: E::kind_name(),
        id,
    }
}
