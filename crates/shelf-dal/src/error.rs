pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} with ID {id} not found")]
    RecordNotFound { kind: &'static str, id: u64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields {
        missing: Vec<&'static str>,
        required: &'static [&'static str],
    },

    #[error("Field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid field values: {0}")]
    Constraint(String),

    #[error("No update data provided")]
    EmptyUpdate,
}

impl From<garde::Report> for ValidationError {
    fn from(report: garde::Report) -> Self {
        let details = report
            .iter()
            .map(|(path, error)| format!("{path}: {error}"))
            .collect::<Vec<_>>()
            .join("; ");
        ValidationError::Constraint(details)
    }
}
