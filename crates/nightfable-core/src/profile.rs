//! Reader profile collected during setup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Fixed catalog of story themes offered at setup. The first entry is the
/// default.
pub const THEMES: [&str; 6] = [
    "Office Romance",
    "Dark Medieval Fantasy",
    "Encounter at a Bar",
    "Dystopian Science Fiction",
    "Mystery Thriller",
    "Tropical Getaway",
];

/// How the reader identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// Woman.
    #[default]
    Woman,
    /// Man.
    Man,
    /// Non-binary.
    NonBinary,
}

impl Identity {
    /// Human-readable label used in prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Woman => "woman",
            Self::Man => "man",
            Self::NonBinary => "non-binary person",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who the reader is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Men.
    #[default]
    Men,
    /// Women.
    Women,
    /// Anyone.
    All,
}

impl Orientation {
    /// Human-readable label used in prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::All => "anyone",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The reader profile that seeds a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Protagonist name.
    pub name: String,
    /// Reader identity.
    pub identity: Identity,
    /// Reader orientation.
    pub orientation: Orientation,
    /// Story theme, one of [`THEMES`].
    pub theme: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            identity: Identity::default(),
            orientation: Orientation::default(),
            theme: THEMES[0].to_owned(),
        }
    }
}

impl Profile {
    /// Checks the profile is complete enough to start a story.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank or the theme is
    /// not in the catalog.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation(
                "protagonist name must not be empty".to_owned(),
            ));
        }
        if !THEMES.contains(&self.theme.as_str()) {
            return Err(DomainError::Validation(format!(
                "unknown theme: {}",
                self.theme
            )));
        }
        Ok(())
    }
}
