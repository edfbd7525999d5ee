use garde::Validate;
use serde::Serialize;
use serde_json::Value;
use shelf_types::CollectionKind;
use time::OffsetDateTime;

use crate::{
    entity::Entity,
    error::ValidationError,
    payload::{Change, Fields, Payload, apply_required, check_range},
};

const FIELDS: &[&str] = &["text", "character", "episode", "season", "year"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub id: u64,
    pub text: String,
    pub character: String,
    pub episode: String,
    pub season: Option<i64>,
    pub year: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateQuote {
    #[garde(length(chars, min = 1, max = 2000))]
    pub text: String,
    #[garde(length(chars, min = 1, max = 255))]
    pub character: String,
    #[garde(length(chars, min = 1, max = 255))]
    pub episode: String,
    #[garde(range(min = 1, max = 1000))]
    pub season: Option<i64>,
    #[garde(range(min = -5000, max = 9999))]
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateQuote {
    #[garde(length(chars, min = 1, max = 2000))]
    pub text: Option<String>,
    #[garde(length(chars, min = 1, max = 255))]
    pub character: Option<String>,
    #[garde(length(chars, min = 1, max = 255))]
    pub episode: Option<String>,
    #[garde(custom(valid_season))]
    pub season: Change<i64>,
    #[garde(custom(valid_year))]
    pub year: Change<i64>,
}

fn valid_season(value: &Change<i64>, _context: &()) -> garde::Result {
    value.as_set().map_or(Ok(()), |s| check_range(*s, 1, 1000))
}

fn valid_year(value: &Change<i64>, _context: &()) -> garde::Result {
    value.as_set().map_or(Ok(()), |y| check_range(*y, -5000, 9999))
}

impl Payload for CreateQuote {
    fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(value)?;
        fields.require(Quote::REQUIRED_FIELDS)?;
        let payload = CreateQuote {
            text: fields.required_string("text")?,
            character: fields.required_string("character")?,
            episode: fields.required_string("episode")?,
            season: fields.integer("season")?,
            year: fields.integer("year")?,
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl Payload for UpdateQuote {
    fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::new(value)?;
        if !fields.contains_any(FIELDS) {
            return Err(ValidationError::EmptyUpdate);
        }
        let payload = UpdateQuote {
            text: fields.string_update("text")?,
            character: fields.string_update("character")?,
            episode: fields.string_update("episode")?,
            season: fields.integer_change("season")?,
            year: fields.integer_change("year")?,
        };
        payload.validate()?;
        Ok(payload)
    }
}

impl Entity for Quote {
    type Create = CreateQuote;
    type Update = UpdateQuote;

    const COLLECTION: CollectionKind = CollectionKind::Quotes;
    const REQUIRED_FIELDS: &'static [&'static str] = &["text", "character", "episode"];

    fn build(id: u64, payload: CreateQuote, now: OffsetDateTime) -> Self {
        Quote {
            id,
            text: payload.text,
            character: payload.character,
            episode: payload.episode,
            season: payload.season,
            year: payload.year,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, update: UpdateQuote) {
        apply_required(update.text, &mut self.text);
        apply_required(update.character, &mut self.character);
        apply_required(update.episode, &mut self.episode);
        update.season.apply_to(&mut self.season);
        update.year.apply_to(&mut self.year);
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
        &self.text
    }

    fn samples() -> Vec<CreateQuote> {
        [
            ("Bite my shiny metal ass!", "Bender", "A Fishful of Dollars"),
            ("Good news everyone!", "Professor Farnsworth", "Various Episodes"),
            ("Shut up and take my money!", "Fry", "Attack of the Killer App"),
            ("Why not Zoidberg?", "Dr. Zoidberg", "Various Episodes"),
        ]
        .into_iter()
        .map(|(text, character, episode)| CreateQuote {
            text: text.into(),
            character: character.into(),
            episode: episode.into(),
            season: None,
            year: None,
        })
        .collect()
    }
}
