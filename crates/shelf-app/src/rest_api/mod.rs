use axum::{
    extract::{FromRequestParts, Path},
    routing::get,
    Router,
};
use http::request::Parts;
use shelf_dal::{Book, Quote};
use shelf_types::CollectionKind;

use crate::{
    error::{method_not_allowed, ApiError},
    state::{AppState, Collection},
};

pub mod crud;

#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub u64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidId(e.body_text()))?;
        raw.parse::<u64>()
            .map(EntityId)
            .map_err(|_| ApiError::InvalidId(raw))
    }
}

pub fn router<E: Collection>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::list::<E>)
                .post(crud::create::<E>)
                .fallback(method_not_allowed),
        )
        .route(
            "/{id}",
            get(crud::get::<E>)
                .put(crud::update::<E>)
                .delete(crud::delete::<E>)
                .fallback(method_not_allowed),
        )
}

pub fn router_for(kind: CollectionKind) -> Router<AppState> {
    match kind {
        CollectionKind::Books => router::<Book>(),
        CollectionKind::Quotes => router::<Quote>(),
    }
}

#[cfg(test)]
mod tests;
