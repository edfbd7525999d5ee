use std::{
    convert::Infallible,
    marker::PhantomData,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use axum::extract::FromRequestParts;
use http::request::Parts;
use shelf_dal::{Book, Entity, Quote, Repository};

use crate::{
    collection_from_state,
    error::{ApiError, ApiResult},
};

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

struct AppStateInner {
    books: RwLock<Repository<Book>>,
    quotes: RwLock<Repository<Quote>>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { sample_data: true }
    }
}

impl AppState {
    pub fn new(app_config: AppConfig) -> Self {
        let (books, quotes) = if app_config.sample_data {
            (
                Repository::new().with_sample_data(),
                Repository::new().with_sample_data(),
            )
        } else {
            (Repository::new(), Repository::new())
        };
        Self::with_repositories(books, quotes)
    }

    pub fn with_repositories(books: Repository<Book>, quotes: Repository<Quote>) -> Self {
        AppState {
            state: Arc::new(AppStateInner {
                books: RwLock::new(books),
                quotes: RwLock::new(quotes),
            }),
        }
    }

    pub fn books(&self) -> &RwLock<Repository<Book>> {
        &self.state.books
    }

    pub fn quotes(&self) -> &RwLock<Repository<Quote>> {
        &self.state.quotes
    }
}

pub trait Collection: Entity {
    fn repository(state: &AppState) -> &RwLock<Repository<Self>>;
}

collection_from_state!(Book, books);
collection_from_state!(Quote, quotes);

// Guards are plain std locks, handlers must drop them before any `.await`.
pub struct Store<E> {
    state: AppState,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Collection> Store<E> {
    pub fn new(state: AppState) -> Self {
        Store {
            state,
            _entity: PhantomData,
        }
    }

    pub fn read(&self) -> ApiResult<RwLockReadGuard<'_, Repository<E>>> {
        E::repository(&self.state)
            .read()
            .map_err(|_| poisoned::<E>())
    }

    pub fn write(&self) -> ApiResult<RwLockWriteGuard<'_, Repository<E>>> {
        E::repository(&self.state)
            .write()
            .map_err(|_| poisoned::<E>())
    }
}

fn poisoned<E: Entity>() -> ApiError {
    ApiError::Internal(format!("{} repository lock is poisoned", E::kind_name()))
}

impl<E: Collection> FromRequestParts<AppState> for Store<E> {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Store::new(state.clone()))
    }
}
