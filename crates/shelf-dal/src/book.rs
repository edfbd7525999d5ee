use garde::Validate;
use serde::Serialize;
use serde_json::Value;
use shelf_types::CollectionKind;
use time::OffsetDateTime;

use crate::{
    entity::Entity,
    error::ValidationError,
    payload::{Change, Fields, Payload, apply_required, check_length},
};

const FIELDS: &[&str] = &["title", "author", "year", "isbn"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub isbn: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateBook {
    #[garde(length(chars, min = 1, max = 255))]
    pub title: String,
    #[garde(length(chars, min = 1, max = 255))]
    pub author: String,
    #[garde(range(min = -5000, max = 9999))]
    pub year: i64,
    #[garde(length(chars, max = 64))]
    pub isbn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateBook {
    #[garde(length(chars, min = 1, max = 255))]
    pub title: Option<String>,
    #[garde(length(chars, min = 1, max = 255))]
    pub author: Option<String>,
    #[garde(range(min = -5000, max = 9999))]
    pub year: Option<i64>,
    #[garde(custom(valid_isbn))]
    pub isbn: Change<String>,
}

fn valid_isbn(value: &Change<String>, _context: &()) -> garde::Result {
    value.as_set().map_or(Ok(()), |isbn| check_length(isbn, 64))
}

impl Payload for CreateBook {
    fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(value)?;
        fields.require(Book::REQUIRED_FIELDS)?;
        let payload = CreateBook {
            title: fields.required_string("title")?,
            author: fields.required_string("author")?,
            year: fields.required_integer("year")?,
            isbn: fields.string("isbn")?,
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl Payload for UpdateBook {
    fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(value)?;
        if !fields.contains_any(FIELDS) {
            return Err(ValidationError::EmptyUpdate);
        }
        let payload = UpdateBook {
            title: fields.string_update("title")?,
            author: fields.string_update("author")?,
            year: fields.integer_update("year")?,
            isbn: fields.string_change("isbn")?,
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl Entity for Book {
    type Create = CreateBook;
    type Update = UpdateBook;

    const COLLECTION: CollectionKind = CollectionKind::Books;
    const REQUIRED_FIELDS: &'static [&'static str] = &["title", "author", "year"];

    fn build(id: u64, payload: CreateBook, now: OffsetDateTime) -> Self {
        Book {
            id,
            title: payload.title,
            author: payload.author,
            year: payload.year,
            isbn: payload.isbn,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, update: UpdateBook) {
        apply_required(update.title, &mut self.title);
        apply_required(update.author, &mut self.author);
        apply_required(update.year, &mut self.year);
        update.isbn.apply_to(&mut self.isbn);
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    fn set_updated_at(&mut self, at: OffsetDateTime) {
        self.updated_at = at;
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn samples() -> Vec<CreateBook> {
        [
            ("The Python Cookbook", "David Beazley", 2013, "978-1449340377"),
            (
                "Flask Web Development",
                "Miguel Grinberg",
                2018,
                "978-1491991732",
            ),
            ("Clean Code", "Robert C. Martin", 2008, "978-0132350884"),
        ]
        .into_iter()
        .map(|(title, author, year, isbn)| CreateBook {
            title: title.into(),
            author: author.into(),
            year,
            isbn: Some(isbn.into()),
        })
        .collect()
    }
}
