use clap::Args;

use super::{AppState, Section};
use crate::{goals::cli::print_tree, learning::cli::print_items, profile::cli::print_user};

#[derive(Debug, Args, Clone)]
pub struct SectionArgs {
    /// Section to open, none to go back home
    #[arg(value_enum)]
    section: Option<Section>,
}

impl SectionArgs {
    pub fn run(&self, state: &mut AppState) -> i16 {
        state.set_active_section(self.section);
        print_section(state);
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {}

impl ShowArgs {
    pub fn run(&self, state: &mut AppState) -> i16 {
        print_section(state);
        0
    }
}

/// The home overview lists only the sections the user keeps visible.
pub fn home_lines(state: &AppState) -> Vec<String> {
    let user = state.user();
    let visible = user.preferences.visible_sections;
    let mut lines = vec![format!("Hello {}", user.name)];
    if visible.learning {
        let items = state.learning_items().items();
        let done = items.iter().filter(|item| item.completed).count();
        lines.push(format!("learning: {} items, {done} completed", items.len()));
    }
    if visible.goals {
        let goals = state.goals().goals();
        let average = if goals.is_empty() {
            0
        } else {
            goals.iter().map(|g| g.progress as usize).sum::<usize>() / goals.len()
        };
        lines.push(format!("goals: {} goals, {average}% on average", goals.len()));
    }
    if visible.personality {
        lines.push("personality: run `brain personality test`".to_string());
    }
    lines
}

pub fn print_section(state: &AppState) {
    match state.active_section() {
        None => home_lines(state).iter().for_each(|line| println!("{line}")),
        Some(Section::Learning) => print_items(&state.learning_items().filter_by_type(None)),
        Some(Section::Goals) => print_tree(state.goals()),
        Some(Section::Personality) => {
            println!("Take the test with `brain personality test`")
        },
        Some(Section::Profile) => print_user(state.user()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{PreferencesPatch, VisibleSectionsPatch};

    #[test]
    fn test_home_lists_visible_sections() {
        let state = AppState::sample();
        let lines = home_lines(&state);
        assert_eq!(lines[0], "Hello Alex Durand");
        assert_eq!(lines[1], "learning: 3 items, 1 completed");
        assert_eq!(lines[2], "goals: 2 goals, 42% on average");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_home_hides_sections() {
        let mut state = AppState::sample();
        state.update_user_preferences(PreferencesPatch {
            visible_sections: Some(VisibleSectionsPatch {
                learning: Some(false),
                personality: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        });
        let lines = home_lines(&state);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("goals:"));
    }

    #[test]
    fn test_section_args_sets_section() {
        let mut state = AppState::sample();
        let args = SectionArgs {
            section: Some(Section::Goals),
        };
        assert_eq!(args.run(&mut state), 0);
        assert_eq!(state.active_section(), Some(Section::Goals));

        SectionArgs { section: None }.run(&mut state);
        assert_eq!(state.active_section(), None);
    }
}
