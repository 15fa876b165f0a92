use clap::{ArgAction, Args, Subcommand, ValueEnum};
use tracing::warn;

use super::{Gender, PreferencesPatch, ProfilePatch, User, VisibleSectionsPatch};
use crate::{
    auth::SessionEvents,
    config::Config,
    error::{report, Result, ValidationErrors},
    remote::ProfileStore,
    state::AppState,
};

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommands,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Print the user card, with the stored profile when signed in
    Show,
    /// Change the display preferences
    #[command(arg_required_else_help = true)]
    Prefs(PrefsArgs),
    /// Update the stored profile of the signed-in user
    #[command(arg_required_else_help = true)]
    Edit(EditProfile),
}

impl ProfileCommands {
    pub async fn handle_commands(
        self,
        state: &mut AppState,
        config: &Config,
        events: &SessionEvents,
    ) -> i16 {
        let result = match self {
            ProfileCommands::Show => show(state, config, events).await,
            ProfileCommands::Prefs(args) => {
                args.run(state);
                Ok(())
            },
            ProfileCommands::Edit(args) => args.run(config, events).await,
        };
        match result {
            Ok(()) => 0,
            Err(err) => report(&err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionFlag {
    Learning,
    Goals,
    Personality,
}

#[derive(Debug, Args, Clone, Default)]
pub struct PrefsArgs {
    #[arg(long, value_enum)]
    theme: Option<super::Theme>,
    #[arg(long, action = ArgAction::Set)]
    public_profile: Option<bool>,
    /// Sections to show on the dashboard
    #[arg(long, value_enum, value_delimiter = ',')]
    show: Vec<SectionFlag>,
    /// Sections to hide from the dashboard
    #[arg(long, value_enum, value_delimiter = ',')]
    hide: Vec<SectionFlag>,
}

impl PrefsArgs {
    /// A section named in both lists ends up hidden.
    fn patch(&self) -> PreferencesPatch {
        let mut sections = VisibleSectionsPatch::default();
        let flags = self
            .show
            .iter()
            .map(|flag| (*flag, true))
            .chain(self.hide.iter().map(|flag| (*flag, false)));
        for (flag, visible) in flags {
            match flag {
                SectionFlag::Learning => sections.learning = Some(visible),
                SectionFlag::Goals => sections.goals = Some(visible),
                SectionFlag::Personality => sections.personality = Some(visible),
            }
        }
        PreferencesPatch {
            theme: self.theme,
            public_profile: self.public_profile,
            visible_sections: (!sections.is_empty()).then_some(sections),
        }
    }

    fn run(&self, state: &mut AppState) {
        state.update_user_preferences(self.patch());
        print_user(state.user());
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct EditProfile {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long, value_enum)]
    gender: Option<Gender>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    birthdate: Option<String>,
}

impl EditProfile {
    fn patch(&self) -> ProfilePatch {
        ProfilePatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender,
            phone: self.phone.clone(),
            birthdate: self.birthdate.clone(),
        }
    }

    async fn run(&self, config: &Config, events: &SessionEvents) -> Result<()> {
        let patch = self.patch();
        if patch.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("profile", "Nothing to update");
            return Err(errors.into());
        }
        let session = events.require()?;
        let client = config.client(events.clone())?;
        client.update_profile(&session.user.id, &patch).await?;
        let profile = client.fetch_profile(&session.user.id).await?;
        println!(
            "{} {} ({}) {} {}",
            profile.first_name, profile.last_name, profile.gender, profile.phone, profile.birthdate
        );
        Ok(())
    }
}

async fn show(state: &AppState, config: &Config, events: &SessionEvents) -> Result<()> {
    print_user(state.user());
    let Some(session) = events.current() else {
        return Ok(());
    };
    // The local card is still useful when the store cannot be reached.
    match config.client(events.clone()) {
        Ok(client) => match client.fetch_profile(&session.user.id).await {
            Ok(profile) => {
                println!(
                    "Stored profile: {} {} ({}), born {}, phone {}",
                    profile.first_name,
                    profile.last_name,
                    profile.gender,
                    profile.birthdate,
                    profile.phone
                );
            },
            Err(err) => warn!(%err, "unable to fetch the stored profile"),
        },
        Err(err) => warn!(%err, "no collaborator configured"),
    }
    Ok(())
}

pub fn print_user(user: &User) {
    let prefs = &user.preferences;
    let flag = |visible: bool| if visible { "shown" } else { "hidden" };
    println!("{} <{}>", user.name, user.email);
    println!("  avatar: {}", user.avatar);
    println!("  theme: {}", prefs.theme);
    println!("  public profile: {}", prefs.public_profile);
    println!("  learning: {}", flag(prefs.visible_sections.learning));
    println!("  goals: {}", flag(prefs.visible_sections.goals));
    println!("  personality: {}", flag(prefs.visible_sections.personality));
}
