use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of characters in a profile name.
pub const MAX_PROFILE_NAME_LEN: usize = 50;

/// Errors raised when building or parsing profile data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile name cannot be empty")]
    EmptyName,
    #[error("profile name is {len} characters long, limit is {max}")]
    NameTooLong { len: usize, max: usize },
    #[error("profile name contains invalid character {0:?}")]
    InvalidNameChar(char),
    #[error("unknown role {0:?} (expected coder, artist, gamer or admin)")]
    UnknownRole(String),
    #[error("unknown handedness {0:?} (expected left or right)")]
    UnknownHandedness(String),
}

/// Work style of a user; selects which rule set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coder,
    Artist,
    Gamer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Coder, Role::Artist, Role::Gamer, Role::Admin];

    /// Stable slug used as the rule join key.
    pub fn slug(self) -> &'static str {
        match self {
            Role::Coder => "coder",
            Role::Artist => "artist",
            Role::Gamer => "gamer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Role {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.slug() == wanted)
            .ok_or_else(|| ProfileError::UnknownRole(s.to_string()))
    }
}

/// Dominant hand of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    pub fn slug(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Handedness {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            _ => Err(ProfileError::UnknownHandedness(s.to_string())),
        }
    }
}

/// A named user profile.
///
/// Owned by the persistence layer; the engine only reads the role and
/// handedness through [`ProfileRef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub role: Role,
    pub handedness: Handedness,
}

impl Profile {
    /// Create a profile after validating and trimming the name.
    ///
    /// Names must be non-empty, at most [`MAX_PROFILE_NAME_LEN`] characters,
    /// and contain only letters, digits, whitespace, `-`, `_` or `.`.
    pub fn new(
        name: impl AsRef<str>,
        role: Role,
        handedness: Handedness,
    ) -> Result<Self, ProfileError> {
        let name = validate_profile_name(name.as_ref())?;
        Ok(Self {
            name,
            role,
            handedness,
        })
    }

    /// The subset of the profile the engine reads.
    pub fn engine_ref(&self) -> ProfileRef {
        ProfileRef {
            role: self.role,
            handedness: self.handedness,
        }
    }
}

/// Role and handedness of the active profile, passed by value into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileRef {
    pub role: Role,
    #[serde(default)]
    pub handedness: Handedness,
}

impl From<&Profile> for ProfileRef {
    fn from(p: &Profile) -> Self {
        p.engine_ref()
    }
}

fn validate_profile_name(raw: &str) -> Result<String, ProfileError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ProfileError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_PROFILE_NAME_LEN {
        return Err(ProfileError::NameTooLong {
            len,
            max: MAX_PROFILE_NAME_LEN,
        });
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ProfileError::InvalidNameChar(bad));
    }
    Ok(name.to_string())
}
