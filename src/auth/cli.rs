use clap::{Args, Subcommand};

use super::{SessionEvents, SignInForm, SignUpForm};
use crate::{
    config::Config,
    error::{report, Result},
    profile::Gender,
    remote::ProfileStore,
    utils::{ask, ask_secret},
};

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account and its profile. Missing fields are asked for
    Signup(SignUpArgs),
    /// Open a session
    Signin(SignInArgs),
    /// Close the current session
    Signout,
    /// Print who is signed in
    Whoami,
}

impl AuthCommands {
    pub async fn handle_commands(self, config: &Config, events: &SessionEvents) -> i16 {
        let result = match self {
            AuthCommands::Signup(args) => args.run(config, events).await,
            AuthCommands::Signin(args) => args.run(config, events).await,
            AuthCommands::Signout => sign_out(config, events).await,
            AuthCommands::Whoami => whoami(config, events).await,
        };
        match result {
            Ok(()) => 0,
            Err(err) => report(&err),
        }
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct SignUpArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long, value_enum, default_value_t = Gender::Other)]
    gender: Gender,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    birthdate: Option<String>,
    #[arg(long, env = "BRAIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl SignUpArgs {
    fn form(&self) -> Result<SignUpForm> {
        Ok(SignUpForm {
            first_name: ask("First name", self.first_name.as_deref())?,
            last_name: ask("Last name", self.last_name.as_deref())?,
            gender: self.gender,
            email: ask("Email", self.email.as_deref())?,
            phone: ask("Phone", self.phone.as_deref())?,
            birthdate: ask("Birthdate (YYYY-MM-DD)", self.birthdate.as_deref())?,
            password: ask_secret("Password", self.password.as_deref())?,
        })
    }

    async fn run(&self, config: &Config, events: &SessionEvents) -> Result<()> {
        let form = self.form()?;
        form.validate()?;
        let client = config.client(events.clone())?;
        let profile = super::sign_up(&client, &client, &form).await?;
        println!("Welcome {} {}!", profile.first_name, profile.last_name);
        if events.current().is_none() {
            println!("Confirm your email, then run `brain auth signin`");
        } else {
            println!("Run `brain personality onboarding` to get started");
        }
        Ok(())
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct SignInArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long, env = "BRAIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl SignInArgs {
    async fn run(&self, config: &Config, events: &SessionEvents) -> Result<()> {
        let form = SignInForm {
            email: ask("Email", self.email.as_deref())?,
            password: ask_secret("Password", self.password.as_deref())?,
        };
        form.validate()?;
        let client = config.client(events.clone())?;
        let session = super::sign_in(&client, &form).await?;
        println!("Signed in as {}", session.user.email);
        Ok(())
    }
}

async fn sign_out(config: &Config, events: &SessionEvents) -> Result<()> {
    if events.current().is_none() {
        println!("Nobody is signed in");
        return Ok(());
    }
    let client = config.client(events.clone())?;
    super::sign_out(&client).await?;
    println!("Signed out");
    Ok(())
}

async fn whoami(config: &Config, events: &SessionEvents) -> Result<()> {
    let session = events.require()?;
    let client = config.client(events.clone())?;
    let profile = client.fetch_profile(&session.user.id).await?;
    println!(
        "{} {} <{}> ({})",
        profile.first_name, profile.last_name, profile.email, session.user.id
    );
    Ok(())
}
