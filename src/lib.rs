pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod goals;
pub mod learning;
pub mod logging;
pub mod profile;
pub mod questionnaire;
pub mod remote;
pub mod state;
pub mod utils;

pub use error::{BrainError, Result};
