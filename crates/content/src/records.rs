use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// A single project card. The manifest served by the legacy data source uses
/// `imageUrl`/`projectUrl`, the hand-authored literal uses `image`/`link`;
/// both spellings deserialize into the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(alias = "imageUrl")]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "projectUrl")]
    pub link: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}

impl Project {
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.title.trim().is_empty() {
            return Err(ContentError::EmptyField("title"));
        }
        for (field, value) in [("link", &self.link), ("github", &self.github)] {
            if let Some(value) = value {
                validate_url(field, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub period: String,
    pub description: String,
}

/// Proficiency on a 1..=10 scale. `SkillLevel::clamped` saturates
/// out-of-range input; deserialization rejects it instead, so a malformed
/// manifest fails loudly rather than silently rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SkillLevel(u8);

impl SkillLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self, ContentError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ContentError::SkillLevelOutOfRange(level))
        }
    }

    pub fn clamped(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Fill fraction for the skill bar, `level / 10`.
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX)
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = ContentError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl ContactInfo {
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.email.trim().is_empty() {
            return Err(ContentError::EmptyField("email"));
        }
        for (field, value) in [("github", &self.github), ("linkedin", &self.linkedin)] {
            if let Some(value) = value {
                validate_url(field, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub about: String,
    pub contact: ContactInfo,
    pub version: String,
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ContentError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|source| ContentError::InvalidUrl {
            field,
            url: value.to_string(),
            source,
        })
}
