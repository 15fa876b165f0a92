pub mod cli;
pub mod models;
pub mod suggestions;
pub mod tree;

pub use cli::GoalArgs;
pub use models::{Goal, GoalStatus, NewGoal, Timeframe, MAX_PROGRESS};
pub use suggestions::suggest_sub_goals;
pub use tree::GoalTree;
