use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LearningType {
    #[default]
    Book,
    Video,
    Movie,
    Course,
}

impl std::fmt::Display for LearningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLearningItem {
    pub kind: LearningType,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LearningType,
    pub title: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub completed: bool,
    pub ai_generated: bool,
}

impl LearningItem {
    pub fn new(fields: NewLearningItem, summary: String) -> Self {
        LearningItem {
            id: Uuid::new_v4().to_string(),
            kind: fields.kind,
            title: fields.title,
            description: fields.description,
            date_added: Utc::now(),
            summary,
            tags: fields.tags,
            completed: false,
            ai_generated: true,
        }
    }
}

/// Splits comma separated user input into tags, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
