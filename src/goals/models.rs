use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Timeframe {
    LongTerm,
    Yearly,
    #[default]
    Monthly,
    Weekly,
    Daily,
}

impl Timeframe {
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::LongTerm => "Long term",
            Timeframe::Yearly => "Yearly",
            Timeframe::Monthly => "Monthly",
            Timeframe::Weekly => "Weekly",
            Timeframe::Daily => "Daily",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Set by the user, independently of `progress`.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "Not started",
            GoalStatus::InProgress => "In progress",
            GoalStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// The user-supplied part of a goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub timeframe: Timeframe,
    pub status: GoalStatus,
    pub progress: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub timeframe: Timeframe,
    pub progress: u8,
    pub status: GoalStatus,
    #[serde(default)]
    pub sub_goals: Vec<Goal>,
    pub date_created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(fields: NewGoal) -> Self {
        Goal {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            timeframe: fields.timeframe,
            progress: fields.progress.min(MAX_PROGRESS),
            status: fields.status,
            sub_goals: Vec::new(),
            date_created: Utc::now(),
            date_completed: None,
        }
    }

    pub fn has_sub_goals(&self) -> bool {
        !self.sub_goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_goal_starts_as_a_leaf() {
        let goal = Goal::new(NewGoal {
            title: "Read more".to_string(),
            progress: 250,
            ..Default::default()
        });
        assert!(goal.sub_goals.is_empty());
        assert_eq!(goal.progress, MAX_PROGRESS);
        assert_eq!(goal.status, GoalStatus::NotStarted);
        assert!(goal.date_completed.is_none());
    }

    #[test]
    fn test_wire_names() {
        let goal = Goal::new(NewGoal {
            title: "Run".to_string(),
            timeframe: Timeframe::LongTerm,
            status: GoalStatus::InProgress,
            ..Default::default()
        });
        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(value["timeframe"], "long-term");
        assert_eq!(value["status"], "in-progress");
        assert!(value["subGoals"].as_array().unwrap().is_empty());
        assert!(value.get("dateCompleted").is_none());
        assert_eq!(Timeframe::LongTerm.to_string(), "long-term");
    }
}
