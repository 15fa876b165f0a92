use std::{collections::BTreeMap, fmt};

use thiserror::Error;
use tracing::error;

use crate::{auth::AuthError, questionnaire::QuestionnaireError, remote::RemoteError};

pub type Result<T> = core::result::Result<T, BrainError>;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unable to parse TOML: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("Unable to write TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("{0}")]
    Config(String),
}

/// Prints validation errors field by field, anything else as one line, and
/// returns the exit code of a failed command.
pub fn report(err: &BrainError) -> i16 {
    error!(%err, "command failed");
    match err {
        BrainError::Validation(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
        },
        other => eprintln!("{other}"),
    }
    1
}

/// Field-level input errors, surfaced next to the offending field and never fatal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.fields.entry(field).or_insert_with(|| message.into());
        self
    }

    /// Records `message` for `field` when `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, message);
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn into_result(self) -> core::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .fields
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{rendered}")
    }
}

impl std::error::Error for ValidationErrors {}
