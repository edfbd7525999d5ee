use serde_json::{Map, Value};

use crate::error::ValidationError;

type Result<T, E = ValidationError> = std::result::Result<T, E>;

pub trait Payload: Sized {
    fn from_json(value: &Value) -> Result<Self>;
}

/// Update of an optional field, keeps "not supplied" apart from "supplied as null".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Change<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Change<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Change::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Change::Keep => {}
            Change::Clear => *target = None,
            Change::Set(v) => *target = Some(v),
        }
    }
}

pub(crate) fn apply_required<T>(value: Option<T>, target: &mut T) {
    if let Some(v) = value {
        *target = v;
    }
}

enum Slot<'a> {
    Absent,
    Null,
    Present(&'a Value),
}

pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Fields { map }),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    fn slot(&self, name: &str) -> Slot<'a> {
        match self.map.get(name) {
            None => Slot::Absent,
            Some(Value::Null) => Slot::Null,
            Some(v) => Slot::Present(v),
        }
    }

    pub fn require(&self, required: &'static [&'static str]) -> Result<()> {
        let missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|name| !matches!(self.slot(name), Slot::Present(_)))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields { missing, required })
        }
    }

    pub fn contains_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.map.contains_key(*name))
    }

    pub fn required_string(&self, name: &'static str) -> Result<String> {
        self.string(name)?.ok_or(ValidationError::InvalidField {
            field: name,
            expected: "a non-null string",
        })
    }

    pub fn required_integer(&self, name: &'static str) -> Result<i64> {
        self.integer(name)?.ok_or(ValidationError::InvalidField {
            field: name,
            expected: "a non-null integer",
        })
    }

    pub fn string(&self, name: &'static str) -> Result<Option<String>> {
        match self.slot(name) {
            Slot::Absent | Slot::Null => Ok(None),
            Slot::Present(v) => as_string(name, v).map(Some),
        }
    }

    pub fn integer(&self, name: &'static str) -> Result<Option<i64>> {
        match self.slot(name) {
            Slot::Absent | Slot::Null => Ok(None),
            Slot::Present(v) => as_integer(name, v).map(Some),
        }
    }

    // required fields on update: may be left out, must not be null
    pub fn string_update(&self, name: &'static str) -> Result<Option<String>> {
        match self.slot(name) {
            Slot::Absent => Ok(None),
            Slot::Null => Err(ValidationError::InvalidField {
                field: name,
                expected: "a non-null string",
            }),
            Slot::Present(v) => as_string(name, v).map(Some),
        }
    }

    pub fn integer_update(&self, name: &'static str) -> Result<Option<i64>> {
        match self.slot(name) {
            Slot::Absent => Ok(None),
            Slot::Null => Err(ValidationError::InvalidField {
                field: name,
                expected: "a non-null integer",
            }),
            Slot::Present(v) => as_integer(name, v).map(Some),
        }
    }

    pub fn string_change(&self, name: &'static str) -> Result<Change<String>> {
        match self.slot(name) {
            Slot::Absent => Ok(Change::Keep),
            Slot::Null => Ok(Change::Clear),
            Slot::Present(v) => as_string(name, v).map(Change::Set),
        }
    }

    pub fn integer_change(&self, name: &'static str) -> Result<Change<i64>> {
        match self.slot(name) {
            Slot::Absent => Ok(Change::Keep),
            Slot::Null => Ok(Change::Clear),
            Slot::Present(v) => as_integer(name, v).map(Change::Set),
        }
    }
}

fn as_string(name: &'static str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::InvalidField {
            field: name,
            expected: "a string",
        }),
    }
}

// Numeric strings are accepted as well, "1965" is as good as 1965.
fn as_integer(name: &'static str, value: &Value) -> Result<i64> {
    let invalid = || ValidationError::InvalidField {
        field: name,
        expected: "a valid integer",
    };
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

pub(crate) fn check_length(value: &str, max: usize) -> garde::Result {
    if value.chars().count() > max {
        Err(garde::Error::new(format!("length is greater than {max}")))
    } else {
        Ok(())
    }
}

pub(crate) fn check_range(value: i64, min: i64, max: i64) -> garde::Result {
    if value < min {
        Err(garde::Error::new(format!("lower than {min}")))
    } else if value > max {
        Err(garde::Error::new(format!("greater than {max}")))
    } else {
        Ok(())
    }
}
