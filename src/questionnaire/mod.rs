pub mod cli;
pub mod flow;
pub mod onboarding;
pub mod questions;

pub use cli::PersonalityArgs;
pub use flow::{FlowState, QuestionResponse, QuestionnaireError, QuestionnaireFlow, Step};
pub use onboarding::{OnboardingStep, OnboardingTour};
pub use questions::{Question, QUESTIONS};
