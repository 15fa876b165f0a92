//! The application state container.
//!
//! One [`AppState`] is created per process and handed by `&mut` to whoever
//! handles the current interaction; nothing here is global. Every mutation
//! is synchronous and total: unknown ids are ignored rather than reported.

pub mod cli;
pub mod sample;
pub mod storage;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    goals::{Goal, GoalTree, NewGoal},
    learning::{DetailLevel, LearningItem, LearningRegistry, NewLearningItem, Summarizer},
    profile::{PreferencesPatch, User},
};

pub use cli::{SectionArgs, ShowArgs};
pub use storage::FileSaver;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Learning,
    Goals,
    Personality,
    Profile,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    user: User,
    #[serde(default)]
    goals: GoalTree,
    #[serde(default)]
    learning_items: LearningRegistry,
    #[serde(default)]
    active_section: Option<Section>,
}

impl AppState {
    pub fn new(user: User, goals: GoalTree, learning_items: LearningRegistry) -> Self {
        AppState {
            user,
            goals,
            learning_items,
            active_section: None,
        }
    }

    /// The demo user with the sample goals and learning items.
    pub fn sample() -> Self {
        AppState::new(
            sample::sample_user(),
            GoalTree::new(sample::sample_goals()),
            LearningRegistry::new(sample::sample_learning_items()),
        )
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn goals(&self) -> &GoalTree {
        &self.goals
    }

    pub fn learning_items(&self) -> &LearningRegistry {
        &self.learning_items
    }

    pub fn active_section(&self) -> Option<Section> {
        self.active_section
    }

    pub fn set_active_section(&mut self, section: Option<Section>) {
        info!(section = ?section, "active section changed");
        self.active_section = section;
    }

    pub fn add_goal(&mut self, fields: NewGoal) -> &Goal {
        self.goals.add_goal(fields)
    }

    pub fn add_sub_goal(&mut self, parent_id: &str, fields: NewGoal) -> Option<&Goal> {
        self.goals.add_sub_goal(parent_id, fields)
    }

    pub fn update_goal_progress(&mut self, goal_id: &str, progress: u8) -> bool {
        self.goals.update_progress(goal_id, progress)
    }

    pub fn add_learning_item(
        &mut self,
        fields: NewLearningItem,
        detail: DetailLevel,
        summarizer: &dyn Summarizer,
    ) -> &LearningItem {
        self.learning_items.add_item(fields, detail, summarizer)
    }

    pub fn toggle_learning_item_completed(&mut self, item_id: &str) -> Option<bool> {
        self.learning_items.toggle_completed(item_id)
    }

    pub fn update_user_preferences(&mut self, patch: PreferencesPatch) {
        self.user.preferences.merge(patch);
        info!(preferences = ?self.user.preferences, "user preferences updated");
    }
}

impl FileSaver for AppState {
    fn seed() -> Self {
        AppState::sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        goals::{GoalStatus, Timeframe},
        learning::{CannedSummarizer, LearningType},
        profile::{Theme, VisibleSectionsPatch},
    };

    #[test]
    fn test_sample_state() {
        let state = AppState::sample();
        assert_eq!(state.goals().len(), 2);
        assert_eq!(state.learning_items().len(), 3);
        assert_eq!(state.active_section(), None);
        assert_eq!(state.goals().find("1").unwrap().progress, 35);
        assert_eq!(state.goals().find("2").unwrap().progress, 50);
    }

    #[test]
    fn test_set_active_section_touches_nothing_else() {
        let mut state = AppState::sample();
        let before = state.clone();

        state.set_active_section(Some(Section::Goals));
        assert_eq!(state.active_section(), Some(Section::Goals));
        assert_eq!(state.goals(), before.goals());
        assert_eq!(state.learning_items(), before.learning_items());
        assert_eq!(state.user(), before.user());

        state.set_active_section(None);
        assert_eq!(state, before);
    }

    #[test]
    fn test_sample_progress_scenario() {
        let mut state = AppState::sample();
        let spanish_children = state.goals().find("1").unwrap().sub_goals.clone();

        state.update_goal_progress("1", 70);

        assert_eq!(state.goals().find("1").unwrap().progress, 70);
        assert_eq!(state.goals().find("2").unwrap().progress, 50);
        assert_eq!(state.goals().find("1").unwrap().sub_goals, spanish_children);
    }

    #[test]
    fn test_add_goal_and_item_through_the_container() {
        let mut state = AppState::sample();
        state.add_goal(NewGoal {
            title: "Write".to_string(),
            timeframe: Timeframe::Daily,
            status: GoalStatus::NotStarted,
            ..Default::default()
        });
        state.add_learning_item(
            NewLearningItem {
                kind: LearningType::Movie,
                title: "Arrival".to_string(),
                ..Default::default()
            },
            DetailLevel::Concise,
            &CannedSummarizer,
        );
        assert_eq!(state.goals().goals().last().unwrap().title, "Write");
        assert_eq!(state.learning_items().items()[0].title, "Arrival");
    }

    #[test]
    fn test_update_user_preferences_nested_merge() {
        let mut state = AppState::sample();
        state.update_user_preferences(PreferencesPatch {
            visible_sections: Some(VisibleSectionsPatch {
                goals: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        });
        let sections = state.user().preferences.visible_sections;
        assert!(!sections.goals);
        assert!(sections.learning);
        assert!(sections.personality);
        assert_eq!(state.user().preferences.theme, Theme::Dark);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::get_or_create(dir.path()).unwrap();
        assert_eq!(state, AppState::sample());

        state.update_goal_progress("2-2", 90);
        state.set_active_section(Some(Section::Learning));
        state.save_changes(dir.path()).unwrap();

        assert!(dir.path().join("app_state.json").exists());
        let reloaded = AppState::get_or_create(dir.path()).unwrap();
        assert_eq!(reloaded, state);

        AppState::clear(dir.path()).unwrap();
        assert_eq!(AppState::get_or_create(dir.path()).unwrap(), AppState::sample());
    }
}
