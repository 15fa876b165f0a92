use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSections {
    pub learning: bool,
    pub goals: bool,
    pub personality: bool,
}

impl Default for VisibleSections {
    fn default() -> Self {
        VisibleSections {
            learning: true,
            goals: true,
            personality: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSectionsPatch {
    pub learning: Option<bool>,
    pub goals: Option<bool>,
    pub personality: Option<bool>,
}

impl VisibleSectionsPatch {
    pub fn is_empty(&self) -> bool {
        self.learning.is_none() && self.goals.is_none() && self.personality.is_none()
    }
}

impl VisibleSections {
    pub fn merge(&mut self, patch: VisibleSectionsPatch) {
        if let Some(learning) = patch.learning {
            self.learning = learning;
        }
        if let Some(goals) = patch.goals {
            self.goals = goals;
        }
        if let Some(personality) = patch.personality {
            self.personality = personality;
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub public_profile: bool,
    pub visible_sections: VisibleSections,
}

/// A partial update of [`Preferences`]; `None` leaves the field as it is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub public_profile: Option<bool>,
    pub visible_sections: Option<VisibleSectionsPatch>,
}

impl Preferences {
    /// Shallow merge, except `visible_sections` which is merged flag by flag
    /// so a patch touching one section never resets the others.
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(public_profile) = patch.public_profile {
            self.public_profile = public_profile;
        }
        if let Some(sections) = patch.visible_sections {
            self.visible_sections.merge(sections);
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub preferences: Preferences,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// A row of the `profiles` table. `id` is the auth identity id.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
    pub birthdate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Serialize, Clone, PartialEq, Eq)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self == &ProfilePatch::default()
    }
}
