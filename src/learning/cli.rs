use clap::{Args, Subcommand};

use super::{parse_tags, CannedSummarizer, DetailLevel, LearningItem, LearningType, NewLearningItem};
use crate::{
    error::{report, ValidationErrors},
    state::AppState,
};

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct LearningArgs {
    #[command(subcommand)]
    pub command: LearningCommands,
}

#[derive(Debug, Subcommand)]
pub enum LearningCommands {
    /// Record something you read, watched or followed
    #[command(arg_required_else_help = true)]
    Add(AddItem),

    /// Mark an item as completed, or back as pending
    #[command(arg_required_else_help = true)]
    Toggle(ToggleItem),

    /// List the items, most recent first
    List(ListItems),

    /// Print one item with its summary
    #[command(arg_required_else_help = true)]
    Show(ShowItem),
}

impl LearningCommands {
    /// `detail` is the configured summary length, used when `add` gets none.
    pub fn handle_commands(self, state: &mut AppState, detail: DetailLevel) -> i16 {
        match self {
            LearningCommands::Add(args) => args.run(state, detail),
            LearningCommands::Toggle(args) => args.run(state),
            LearningCommands::List(args) => args.run(state),
            LearningCommands::Show(args) => args.run(state),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct AddItem {
    #[arg(short, long)]
    title: String,
    #[arg(short = 'k', long = "type", value_enum, default_value_t = LearningType::Book)]
    kind: LearningType,
    #[arg(short, long, default_value = "")]
    description: String,
    /// Comma separated tags
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long, value_enum)]
    detail: Option<DetailLevel>,
}

impl AddItem {
    fn validate(&self) -> Result<NewLearningItem, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title, "Title is required");
        errors.into_result()?;
        Ok(NewLearningItem {
            kind: self.kind,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            tags: parse_tags(&self.tags),
        })
    }

    fn run(&self, state: &mut AppState, detail: DetailLevel) -> i16 {
        let fields = match self.validate() {
            Ok(fields) => fields,
            Err(errors) => return report(&errors.into()),
        };
        let detail = self.detail.unwrap_or(detail);
        let item = state.add_learning_item(fields, detail, &CannedSummarizer);
        println!("New {} {} - {} added", item.kind, item.id, item.title);
        print_items(&state.learning_items().filter_by_type(None));
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct ToggleItem {
    id: String,
}

impl ToggleItem {
    fn run(&self, state: &mut AppState) -> i16 {
        if let Some(completed) = state.toggle_learning_item_completed(&self.id) {
            let label = if completed { "completed" } else { "pending" };
            println!("Item {} is now {label}", self.id);
        }
        print_items(&state.learning_items().filter_by_type(None));
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct ListItems {
    /// Only show one kind of item
    #[arg(short = 'k', long = "type", value_enum)]
    kind: Option<LearningType>,
}

impl ListItems {
    fn run(&self, state: &mut AppState) -> i16 {
        print_items(&state.learning_items().filter_by_type(self.kind));
        0
    }
}

#[derive(Debug, Args, Clone)]
pub struct ShowItem {
    id: String,
}

impl ShowItem {
    fn run(&self, state: &mut AppState) -> i16 {
        let Some(item) = state.learning_items().get(&self.id) else {
            eprintln!("No learning item with id {}", self.id);
            return 1;
        };
        println!("{}", describe(item));
        if !item.description.is_empty() {
            println!("{}", item.description);
        }
        println!();
        println!("{}", item.summary);
        0
    }
}

fn describe(item: &LearningItem) -> String {
    let mark = if item.completed { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {} {:<6} {} ({})",
        item.id,
        item.kind,
        item.title,
        item.date_added.format("%Y-%m-%d")
    );
    if !item.tags.is_empty() {
        line.push_str(&format!(" #{}", item.tags.join(" #")));
    }
    line
}

pub fn print_items(items: &[&LearningItem]) {
    if items.is_empty() {
        println!("No learning items yet");
        return;
    }
    for item in items {
        println!("{}", describe(item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::Summarizer;

    fn add(title: &str, tags: &str) -> AddItem {
        AddItem {
            title: title.to_string(),
            kind: LearningType::Video,
            description: "Y".to_string(),
            tags: tags.to_string(),
            detail: None,
        }
    }

    #[test]
    fn test_add_uses_configured_detail_and_parses_tags() {
        let mut state = AppState::sample();
        assert_eq!(add("Talk", " rust, ,async ").run(&mut state, DetailLevel::Detailed), 0);

        let item = &state.learning_items().items()[0];
        assert_eq!(item.title, "Talk");
        assert_eq!(item.tags, vec!["rust", "async"]);
        assert_eq!(item.summary, CannedSummarizer.summarize("", DetailLevel::Detailed));
    }

    #[test]
    fn test_add_without_title_is_rejected() {
        let mut state = AppState::sample();
        assert_eq!(add("", "").run(&mut state, DetailLevel::Concise), 1);
        assert_eq!(state.learning_items().len(), 3);
    }

    #[test]
    fn test_describe_marks_completed_items() {
        let state = AppState::sample();
        let line = describe(state.learning_items().get("1").unwrap());
        assert!(line.starts_with("[x] 1 book"));
        assert!(line.ends_with("#self-improvement #psychology #habits"));
    }
}
