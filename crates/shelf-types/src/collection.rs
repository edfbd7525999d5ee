use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Books,
    Quotes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

impl FieldKind {
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

const fn field(
    name: &'static str,
    kind: FieldKind,
    required: bool,
    description: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required,
        description,
    }
}

const BOOK_FIELDS: &[FieldSpec] = &[
    field("title", FieldKind::String, true, "Title of the book"),
    field("author", FieldKind::String, true, "Author of the book"),
    field("year", FieldKind::Integer, true, "Publication year"),
    field("isbn", FieldKind::String, false, "ISBN, if known"),
];

const QUOTE_FIELDS: &[FieldSpec] = &[
    field("text", FieldKind::String, true, "Quote text"),
    field("character", FieldKind::String, true, "Character who said it"),
    field("episode", FieldKind::String, true, "Episode name"),
    field("season", FieldKind::Integer, false, "Season number"),
    field("year", FieldKind::Integer, false, "Year the episode aired"),
];

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Books, CollectionKind::Quotes];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Books => "books",
            CollectionKind::Quotes => "quotes",
        }
    }

    /// Singular, capitalized entity name used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CollectionKind::Books => "Book",
            CollectionKind::Quotes => "Quote",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            CollectionKind::Books => BOOK_FIELDS,
            CollectionKind::Quotes => QUOTE_FIELDS,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(|f| f.required)
    }

    pub fn label_field(&self) -> &'static str {
        match self {
            CollectionKind::Books => "title",
            CollectionKind::Quotes => "text",
        }
    }
}

impl Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCollection(pub String);

impl Display for UnknownCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown collection: {}", self.0)
    }
}

impl std::error::Error for UnknownCollection {}

impl FromStr for CollectionKind {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" | "book" => Ok(CollectionKind::Books),
            "quotes" | "quote" => Ok(CollectionKind::Quotes),
            other => Err(UnknownCollection(other.to_string())),
        }
    }
}
