// Bodies are parsed and validated before a lock is taken.

use axum::{response::IntoResponse, Json};
use http::StatusCode;
use shelf_dal::{Entity, Payload};
use shelf_types::{Deleted, ItemEnvelope, ItemList};
use tracing::{debug, info};

use super::EntityId;
use crate::{
    body::JsonBody,
    error::{ApiError, ApiResult},
    state::{Collection, Store},
};

fn noun<E: Entity>() -> String {
    E::kind_name().to_lowercase()
}

pub async fn list<E: Collection>(store: Store<E>) -> ApiResult<impl IntoResponse> {
    let items = store.read()?.list_all();
    debug!("Listing {} {}", items.len(), E::COLLECTION);
    let message = format!("Found {} {}", items.len(), E::COLLECTION);
    Ok((StatusCode::OK, Json(ItemList::new(items, message))))
}

pub async fn get<E: Collection>(
    EntityId(id): EntityId,
    store: Store<E>,
) -> ApiResult<impl IntoResponse> {
    let record = store.read()?.get(id)?;
    let message = format!("Found {}: {}", noun::<E>(), record.label());
    Ok((StatusCode::OK, Json(ItemEnvelope::new(record, message))))
}

pub async fn create<E: Collection>(
    store: Store<E>,
    JsonBody(body): JsonBody,
) -> ApiResult<impl IntoResponse> {
    let payload = E::Create::from_json(&body)?;
    let record = store.write()?.create(payload);
    info!("Created {} {}", noun::<E>(), record.id());
    let message = format!("Successfully created {}: {}", noun::<E>(), record.label());
    Ok((StatusCode::CREATED, Json(ItemEnvelope::new(record, message))))
}

pub async fn update<E: Collection>(
    EntityId(id): EntityId,
    store: Store<E>,
    JsonBody(body): JsonBody,
) -> ApiResult<impl IntoResponse> {
    let update = E::Update::from_json(&body)?;
    let record = store.write()?.update(id, update)?;
    info!("Updated {} {}", noun::<E>(), id);
    let message = format!("Successfully updated {}: {}", noun::<E>(), record.label());
    Ok((StatusCode::OK, Json(ItemEnvelope::new(record, message))))
}

pub async fn delete<E: Collection>(
    EntityId(id): EntityId,
    store: Store<E>,
) -> ApiResult<impl IntoResponse> {
    if !store.write()?.delete(id) {
        return Err(ApiError::Dal(shelf_dal::Error::RecordNotFound {
            kind: E::kind_name(),
            id,
        }));
    }
    info!("Deleted {} {}", noun::<E>(), id);
    Ok((
        StatusCode::OK,
        Json(Deleted {
            message: format!("Successfully deleted {} with ID {id}", noun::<E>()),
            deleted_id: id,
        }),
    ))
}
