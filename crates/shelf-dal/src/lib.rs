pub mod book;
pub mod entity;
pub mod error;
pub mod payload;
pub mod quote;
pub mod repository;

pub use book::{Book, CreateBook, UpdateBook};
pub use entity::Entity;
pub use error::{Error, Result, ValidationError};
pub use payload::{Change, Payload};
pub use quote::{CreateQuote, Quote, UpdateQuote};
pub use repository::{Clock, Repository};
