use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::{BrainError, Result};

/// Reads a TOML file into `T`, falling back to `T::default()` when the file
/// does not exist yet.
pub fn toml_to_struct<T>(path: &Path) -> Result<T>
where
    T: for<'a> Deserialize<'a> + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let toml_string = fs::read_to_string(path)?;
    Ok(toml::from_str(&toml_string)?)
}

pub fn struct_to_toml<T: Serialize>(instance: &T, path: &Path) -> Result<()> {
    let data = toml::to_string_pretty(instance)?;
    write_atomically(path, data.as_bytes())
}

/// Writes through a sibling `.tmp` file and renames it over `path`.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp = path.with_extension("tmp");
    let mut file = File::create(&temp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    fs::rename(temp, path)?;
    Ok(())
}

/// Returns `value` when given on the command line, otherwise asks for it.
pub fn ask(prompt: &str, value: Option<&str>) -> Result<String> {
    match value {
        Some(value) => Ok(value.to_string()),
        None => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

pub fn ask_secret(prompt: &str, value: Option<&str>) -> Result<String> {
    match value {
        Some(value) => Ok(value.to_string()),
        None => Ok(Password::new().with_prompt(prompt).interact()?),
    }
}

pub fn home_dir() -> Result<PathBuf> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|err| BrainError::Config(format!("Failed to retrieve home directory, {err}")))
}

/// `AppState` -> `app_state`
pub fn struct_to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

pub fn entity_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
