use std::{
    env,
    path::{Path, PathBuf},
};

use clap::{Args, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    auth::SessionEvents,
    error::{BrainError, Result},
    learning::DetailLevel,
    remote::{RemoteError, SupabaseClient, SupabaseConfig},
    utils::{home_dir, struct_to_toml, toml_to_struct},
};

const CONFIG_DIR: &str = ".brain";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
const SUPABASE_URL_ENV: &str = "SUPABASE_URL";

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write the configuration file, filling what can be guessed
    Init,
    /// Print the configuration, or a single key
    Get(GetConfig),
    /// Override some configurations
    #[command(arg_required_else_help = true)]
    Set(ConfigPatch),
}

impl ConfigCommands {
    pub fn handle_commands(self, path: &Path) -> i16 {
        let result = match self {
            ConfigCommands::Init => Config::init(path),
            ConfigCommands::Get(args) => args.run(path),
            ConfigCommands::Set(patch) => Config::set(path, patch),
        };
        match result {
            Ok(()) => 0,
            Err(err) => {
                error!(%err, "config command failed");
                eprintln!("{err}");
                1
            },
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigKey {
    DataDir,
    SupabaseUrl,
    AnonKeyEnv,
    RequestTimeoutSecs,
    DetailLevel,
}

#[derive(Debug, Args, Clone)]
pub struct GetConfig {
    #[arg(value_enum)]
    key: Option<ConfigKey>,
}

impl GetConfig {
    fn run(&self, path: &Path) -> Result<()> {
        let config = Config::load(path)?;
        match self.key {
            Some(key) => println!("{}", config.get(key)?),
            None => print!("{}", toml::to_string_pretty(&config)?),
        }
        Ok(())
    }
}

#[derive(Debug, Args, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    /// Where the local snapshots are written
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long)]
    pub supabase_url: Option<String>,
    /// Name of the environment variable holding the anon key
    #[arg(long)]
    pub anon_key_env: Option<String>,
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
    #[arg(long, value_enum)]
    pub detail_level: Option<DetailLevel>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub supabase_url: String,
    pub anon_key_env: String,
    pub request_timeout_secs: u64,
    pub detail_level: DetailLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: None,
            supabase_url: String::new(),
            anon_key_env: DEFAULT_ANON_KEY_ENV.to_string(),
            request_timeout_secs: 30,
            detail_level: DetailLevel::Concise,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        Ok(home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        toml_to_struct(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        struct_to_toml(self, path)
    }

    fn init(path: &Path) -> Result<()> {
        let mut config = Config::load(path)?;
        if config.supabase_url.is_empty() {
            if let Ok(url) = env::var(SUPABASE_URL_ENV) {
                config.supabase_url = url;
            }
        }
        let data_dir = config.data_dir()?;
        config.data_dir = Some(data_dir.clone());
        std::fs::create_dir_all(&data_dir)?;
        config.save(path)?;
        info!(path = %path.display(), "config initialised");
        println!("Configuration written to {}", path.display());
        Ok(())
    }

    fn set(path: &Path, patch: ConfigPatch) -> Result<()> {
        let mut config = Config::load(path)?;
        config.apply(patch);
        config.save(path)?;
        info!(path = %path.display(), "config updated");
        Ok(())
    }

    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(data_dir) = patch.data_dir {
            self.data_dir = Some(data_dir);
        }
        if let Some(url) = patch.supabase_url {
            self.supabase_url = url;
        }
        if let Some(name) = patch.anon_key_env {
            self.anon_key_env = name;
        }
        if let Some(secs) = patch.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(detail) = patch.detail_level {
            self.detail_level = detail;
        }
    }

    pub fn get(&self, key: ConfigKey) -> Result<String> {
        Ok(match key {
            ConfigKey::DataDir => self.data_dir()?.display().to_string(),
            ConfigKey::SupabaseUrl => self.supabase_url.clone(),
            ConfigKey::AnonKeyEnv => self.anon_key_env.clone(),
            ConfigKey::RequestTimeoutSecs => self.request_timeout_secs.to_string(),
            ConfigKey::DetailLevel => self.detail_level.to_string(),
        })
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join(CONFIG_DIR).join("data")),
        }
    }

    /// Read from the environment on every call; the key never lands in the file.
    pub fn anon_key(&self) -> core::result::Result<String, RemoteError> {
        env::var(&self.anon_key_env)
            .map_err(|_| RemoteError::MissingCredential(self.anon_key_env.clone()))
    }

    pub fn supabase(&self) -> Result<SupabaseConfig> {
        if self.supabase_url.is_empty() {
            return Err(BrainError::Config(
                "supabase_url is not set, run `brain config set --supabase-url <url>`".to_string(),
            ));
        }
        Ok(SupabaseConfig {
            url: self.supabase_url.clone(),
            anon_key: self.anon_key()?,
            timeout_secs: self.request_timeout_secs,
        })
    }

    pub fn client(&self, events: SessionEvents) -> Result<SupabaseClient> {
        Ok(SupabaseClient::new(self.supabase()?, events)?)
    }
}
