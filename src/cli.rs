use std::{io, path::Path, path::PathBuf};

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use menva::read_env_file;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    auth::{self, AuthArgs, Session, SessionEvents, StoredSession},
    config::{Config, ConfigArgs},
    error::{report, Result},
    goals::GoalArgs,
    learning::LearningArgs,
    profile::ProfileArgs,
    questionnaire::PersonalityArgs,
    state::{AppState, FileSaver, SectionArgs, ShowArgs},
};

#[derive(Debug, Parser)]
#[command(name = "brain", version)]
#[command(about = "Your personal knowledge, goals and personality dashboard")]
pub struct Cli {
    /// Load this env file before anything else
    #[arg(short, long, required = false)]
    env: Option<String>,

    /// Configuration file, `$HOME/.brain/config.toml` by default
    #[arg(short, long, env = "BRAIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create and tune the configuration file
    #[command(arg_required_else_help = true)]
    Config(ConfigArgs),
    /// Track hierarchical goals and their progress
    #[command(arg_required_else_help = true)]
    Goal(GoalArgs),
    /// Keep what you read, watched and studied
    #[command(arg_required_else_help = true)]
    Learning(LearningArgs),
    /// Open a section of the dashboard
    Section(SectionArgs),
    /// Print the active section, or the home overview
    Show(ShowArgs),
    /// Your user card, preferences and stored profile
    #[command(arg_required_else_help = true)]
    Profile(ProfileArgs),
    /// Sign up, sign in and sign out
    #[command(arg_required_else_help = true)]
    Auth(AuthArgs),
    /// The onboarding intro and the personality test
    #[command(arg_required_else_help = true)]
    Personality(PersonalityArgs),
    /// Print a shell completion script
    #[command(arg_required_else_help = true)]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub async fn handle() -> i16 {
        Cli::parse().run().await
    }

    pub async fn run(self) -> i16 {
        if let Some(env) = self.env.as_ref() {
            read_env_file(env);
        }
        let path = match self.config {
            Some(path) => path,
            None => match Config::default_path() {
                Ok(path) => path,
                Err(err) => return report(&err),
            },
        };

        let command = match self.command {
            Commands::Config(args) => return args.command.handle_commands(&path),
            Commands::Completions { shell } => {
                generate(shell, &mut Cli::command(), "brain", &mut io::stdout());
                return 0;
            },
            other => other,
        };

        let config = match Config::load(&path) {
            Ok(config) => config,
            Err(err) => return report(&err),
        };
        let data_dir = match config.data_dir() {
            Ok(dir) => dir,
            Err(err) => return report(&err),
        };
        debug!(config = %path.display(), data_dir = %data_dir.display(), "running command");

        match command {
            Commands::Goal(args) => with_state(&data_dir, |state| args.command.handle_commands(state)),
            Commands::Learning(args) => with_state(&data_dir, |state| {
                args.command.handle_commands(state, config.detail_level)
            }),
            Commands::Section(args) => with_state(&data_dir, |state| args.run(state)),
            Commands::Show(args) => with_state(&data_dir, |state| args.run(state)),
            Commands::Profile(args) => {
                let mut state = match AppState::get_or_create(&data_dir) {
                    Ok(state) => state,
                    Err(err) => return report(&err),
                };
                let (events, mut watcher) = match open_session(&data_dir, &config).await {
                    Ok(opened) => opened,
                    Err(err) => return report(&err),
                };
                let code = args
                    .command
                    .handle_commands(&mut state, &config, &events)
                    .await;
                finish(code, [
                    state.save_changes(&data_dir),
                    persist_session(&data_dir, &events, &mut watcher),
                ])
            },
            Commands::Auth(args) => {
                let (events, mut watcher) = match open_session(&data_dir, &config).await {
                    Ok(opened) => opened,
                    Err(err) => return report(&err),
                };
                let code = args.command.handle_commands(&config, &events).await;
                finish(code, [persist_session(&data_dir, &events, &mut watcher)])
            },
            Commands::Personality(args) => {
                let (events, mut watcher) = match open_session(&data_dir, &config).await {
                    Ok(opened) => opened,
                    Err(err) => return report(&err),
                };
                let code = args.command.handle_commands(&config, &events).await;
                finish(code, [persist_session(&data_dir, &events, &mut watcher)])
            },
            Commands::Config(_) | Commands::Completions { .. } => 0,
        }
    }
}

/// Loads the container, runs one handler on it and writes it back.
fn with_state(dir: &Path, handler: impl FnOnce(&mut AppState) -> i16) -> i16 {
    let mut state = match AppState::get_or_create(dir) {
        Ok(state) => state,
        Err(err) => return report(&err),
    };
    let code = handler(&mut state);
    finish(code, [state.save_changes(dir)])
}

fn finish<const N: usize>(code: i16, saves: [Result<()>; N]) -> i16 {
    for save in saves {
        if let Err(err) = save {
            return report(&err);
        }
    }
    code
}

fn load_session(dir: &Path) -> Result<SessionEvents> {
    Ok(SessionEvents::new(StoredSession::get_or_create(dir)?.session))
}

/// Loads the stored session and trades it for a fresh one when its access
/// token is about to expire. The receiver sees that refresh as a change.
async fn open_session(
    dir: &Path,
    config: &Config,
) -> Result<(SessionEvents, watch::Receiver<Option<Session>>)> {
    let events = load_session(dir)?;
    let watcher = events.subscribe();
    let now = Utc::now().timestamp();
    if !events.current().is_some_and(|session| session.expires_soon(now)) {
        return Ok((events, watcher));
    }
    match config.client(events.clone()) {
        Ok(client) => {
            if let Err(err) = auth::refresh_session(&client, &events, now).await {
                warn!(%err, "session refresh failed");
                eprintln!("{err}");
            }
        },
        Err(err) => warn!(%err, "unable to refresh the session"),
    }
    Ok((events, watcher))
}

/// Writes the session back only when a sign in or sign out happened.
fn persist_session(
    dir: &Path,
    events: &SessionEvents,
    watcher: &mut watch::Receiver<Option<Session>>,
) -> Result<()> {
    if !watcher.has_changed().unwrap_or(false) {
        return Ok(());
    }
    watcher.borrow_and_update();
    let stored = StoredSession {
        session: events.current(),
    };
    match stored.session {
        Some(_) => stored.save_changes(dir),
        None => StoredSession::clear(dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_goal_progress() {
        let cli = Cli::try_parse_from(["brain", "goal", "progress", "1", "70"]).unwrap();
        assert!(matches!(cli.command, Commands::Goal(_)));
        assert!(Cli::try_parse_from(["brain", "goal", "progress", "1", "170"]).is_err());
    }

    #[test]
    fn test_with_state_persists_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let code = with_state(dir.path(), |state| {
            state.update_goal_progress("1", 70);
            0
        });
        assert_eq!(code, 0);
        let state = AppState::get_or_create(dir.path()).unwrap();
        assert_eq!(state.goals().find("1").unwrap().progress, 70);
    }

    #[tokio::test]
    async fn test_open_session_without_expiry_skips_refresh() {
        let dir = tempfile::tempdir().unwrap();
        StoredSession {
            session: Some(Session {
                access_token: "jwt".to_string(),
                refresh_token: Some("r".to_string()),
                expires_at: None,
                user: AuthUser::default(),
            }),
        }
        .save_changes(dir.path())
        .unwrap();

        // No url configured: reaching for the client would only log.
        let (events, mut watcher) = open_session(dir.path(), &Config::default())
            .await
            .unwrap();
        assert_eq!(events.current().unwrap().access_token, "jwt");
        assert!(!watcher.has_changed().unwrap());
        persist_session(dir.path(), &events, &mut watcher).unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_survives_missing_client() {
        let dir = tempfile::tempdir().unwrap();
        StoredSession {
            session: Some(Session {
                access_token: "jwt".to_string(),
                refresh_token: Some("r".to_string()),
                expires_at: Some(0),
                user: AuthUser::default(),
            }),
        }
        .save_changes(dir.path())
        .unwrap();

        let (events, mut watcher) = open_session(dir.path(), &Config::default())
            .await
            .unwrap();
        assert!(events.current().is_some());
        assert!(!watcher.has_changed().unwrap());
    }

    #[test]
    fn test_session_is_written_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let events = load_session(dir.path()).unwrap();
        let mut watcher = events.subscribe();

        persist_session(dir.path(), &events, &mut watcher).unwrap();
        assert!(!StoredSession::get_file_path(dir.path()).exists());

        events.publish(Some(Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            expires_at: None,
            user: AuthUser {
                id: "u-1".to_string(),
                email: "alex@example.com".to_string(),
            },
        }));
        persist_session(dir.path(), &events, &mut watcher).unwrap();
        let reloaded = load_session(dir.path()).unwrap();
        assert_eq!(reloaded.current().unwrap().user.id, "u-1");

        events.publish(None);
        persist_session(dir.path(), &events, &mut watcher).unwrap();
        assert!(!StoredSession::get_file_path(dir.path()).exists());
    }
}
