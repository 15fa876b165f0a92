pub mod cli;
pub mod models;
pub mod registry;
pub mod summary;

pub use cli::LearningArgs;
pub use models::{parse_tags, LearningItem, LearningType, NewLearningItem};
pub use registry::LearningRegistry;
pub use summary::{CannedSummarizer, DetailLevel, Summarizer};
