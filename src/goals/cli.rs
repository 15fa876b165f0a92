use clap::{Args, Subcommand};

use super::{suggest_sub_goals, Goal, GoalStatus, GoalTree, NewGoal, Timeframe};
use crate::{
    error::{report, ValidationErrors},
    state::AppState,
};

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct GoalArgs {
    #[command(subcommand)]
    pub command: GoalCommands,
}

#[derive(Debug, Subcommand)]
pub enum GoalCommands {
    /// Create a new root level goal
    #[command(arg_required_else_help = true)]
    Add(AddGoal),

    /// Attach a sub-goal to an existing goal
    #[command(arg_required_else_help = true)]
    Sub(AddSubGoal),

    /// Set the progress of a goal, at any depth
    #[command(arg_required_else_help = true)]
    Progress(UpdateProgress),

    /// Propose sub-goals for a goal and optionally accept them
    #[command(arg_required_else_help = true)]
    Suggest(SuggestSubGoals),

    /// Print the whole goal tree
    List,

    /// Print one goal with its sub-goals
    #[command(arg_required_else_help = true)]
    Show(ShowGoal),
}

impl GoalCommands {
    pub fn handle_commands(self, state: &mut AppState) -> i16 {
        match self {
            GoalCommands::Add(args) => args.run(state),
            GoalCommands::Sub(args) => args.run(state),
            GoalCommands::Progress(args) => args.run(state),
            GoalCommands::Suggest(args) => args.run(state),
            GoalCommands::List => {
                print_tree(state.goals());
                0
            },
            GoalCommands::Show(args) => args.run(state),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct GoalFields {
    #[arg(short, long)]
    title: String,
    #[arg(short, long, default_value = "")]
    description: String,
    #[arg(short = 'f', long, value_enum, default_value_t = Timeframe::Monthly)]
    timeframe: Timeframe,
    #[arg(short, long, value_enum, default_value_t = GoalStatus::NotStarted)]
    status: GoalStatus,
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    progress: u8,
}

impl GoalFields {
    fn validate(&self) -> Result<NewGoal, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.into_result()?;
        Ok(NewGoal {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            timeframe: self.timeframe,
            status: self.status,
            progress: self.progress,
        })
    }
}

#[derive(Debug, Args, Clone)]
pub struct AddGoal {
    #[command(flatten)]
    fields: GoalFields,
}

impl AddGoal {
    fn run(&self, state: &mut AppState) -> i16 {
        let fields = match self.fields.validate() {
            Ok(fields) => fields,
            Err(errors) => return report(&errors.into()),
        };
        let goal = state.add_goal(fields);
        println!("New goal {} - {} created successfully", goal.id, goal.title);
        print_tree(state.goals());
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct AddSubGoal {
    /// Id of the parent goal
    #[arg(long)]
    parent: String,
    #[command(flatten)]
    fields: GoalFields,
}

impl AddSubGoal {
    fn run(&self, state: &mut AppState) -> i16 {
        let fields = match self.fields.validate() {
            Ok(fields) => fields,
            Err(errors) => return report(&errors.into()),
        };
        match state.add_sub_goal(&self.parent, fields) {
            Some(goal) => {
                println!("New sub-goal {} - {} created successfully", goal.id, goal.title);
                print_tree(state.goals());
                0
            },
            None => {
                eprintln!("No goal with id {}", self.parent);
                1
            },
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct UpdateProgress {
    id: String,
    /// New progress, from 0 to 100
    #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
    progress: u8,
}

impl UpdateProgress {
    fn run(&self, state: &mut AppState) -> i16 {
        // An unknown id is not an error, the tree is simply printed unchanged.
        state.update_goal_progress(&self.id, self.progress);
        print_tree(state.goals());
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct SuggestSubGoals {
    /// Id of the goal to break down
    id: String,
    /// Attach every suggestion to the goal
    #[arg(short, long, default_value_t = false)]
    accept: bool,
}

impl SuggestSubGoals {
    fn run(&self, state: &mut AppState) -> i16 {
        let Some(goal) = state.goals().find(&self.id) else {
            eprintln!("No goal with id {}", self.id);
            return 1;
        };
        let suggestions = suggest_sub_goals(&goal.title);
        println!("Suggested sub-goals for {}:", goal.title);
        for suggestion in &suggestions {
            println!(
                "  - {} ({}): {}",
                suggestion.title,
                suggestion.timeframe.label(),
                suggestion.description
            );
        }
        if self.accept {
            for suggestion in suggestions {
                state.add_sub_goal(&self.id, suggestion);
            }
            print_tree(state.goals());
        }
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct ShowGoal {
    id: String,
}

impl ShowGoal {
    fn run(&self, state: &mut AppState) -> i16 {
        match state.goals().find(&self.id) {
            Some(goal) => {
                println!("{}", describe(goal));
                if !goal.description.is_empty() {
                    println!("  {}", goal.description);
                }
                println!("  created {}", goal.date_created.format("%Y-%m-%d"));
                if let Some(done) = goal.date_completed {
                    println!("  completed {}", done.format("%Y-%m-%d"));
                }
                print_tree(&GoalTree::new(goal.sub_goals.clone()));
                0
            },
            None => {
                eprintln!("No goal with id {}", self.id);
                1
            },
        }
    }
}

fn describe(goal: &Goal) -> String {
    format!(
        "[{}] {} {:>3}% {} / {}",
        goal.id,
        goal.title,
        goal.progress,
        goal.timeframe.label(),
        goal.status.label()
    )
}

pub fn render_tree(tree: &GoalTree) -> Vec<String> {
    tree.flatten()
        .into_iter()
        .map(|(depth, goal)| format!("{}{}", "  ".repeat(depth), describe(goal)))
        .collect()
}

pub fn print_tree(tree: &GoalTree) {
    if tree.is_empty() {
        println!("No goals yet");
        return;
    }
    for line in render_tree(tree) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sample::sample_goals;

    #[test]
    fn test_render_tree_indents_children() {
        let lines = render_tree(&GoalTree::new(sample_goals()));
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("[1] Learn Spanish  35%"));
        assert!(lines[1].starts_with("  [1-1]"));
        assert!(lines[3].starts_with("[2] Run a Marathon"));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let fields = GoalFields {
            title: "  ".to_string(),
            description: String::new(),
            timeframe: Timeframe::Weekly,
            status: GoalStatus::NotStarted,
            progress: 0,
        };
        let errors = fields.validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn test_accepting_suggestions_attaches_them() {
        let mut state = AppState::sample();
        let args = SuggestSubGoals {
            id: "2".to_string(),
            accept: true,
        };
        assert_eq!(args.run(&mut state), 0);
        let marathon = state.goals().find("2").unwrap();
        assert_eq!(marathon.sub_goals.len(), 4);
        assert_eq!(marathon.sub_goals[2].title, "Establish Regular Running Schedule");
        assert_eq!(marathon.sub_goals[3].progress, 0);
    }

    #[test]
    fn test_unknown_parent_fails() {
        let mut state = AppState::sample();
        let args = AddSubGoal {
            parent: "nope".to_string(),
            fields: GoalFields {
                title: "Stretch".to_string(),
                description: String::new(),
                timeframe: Timeframe::Daily,
                status: GoalStatus::NotStarted,
                progress: 0,
            },
        };
        assert_eq!(args.run(&mut state), 1);
        assert_eq!(state.goals().flatten().len(), 6);
    }
}
