pub mod cli;
pub mod models;

pub use cli::ProfileArgs;
pub use models::{
    Gender, Preferences, PreferencesPatch, Profile, ProfilePatch, Theme, User, VisibleSections,
    VisibleSectionsPatch,
};
