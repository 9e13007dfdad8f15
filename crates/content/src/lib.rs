//! Display records for the portfolio: projects, experiences, skills, and the
//! profile block, plus the JSON manifest shape the project loader consumes.
//!
//! Records carry no identity beyond array position and are never mutated
//! after the page is assembled.

pub mod error;
pub mod manifest;
pub mod records;

pub use error::ContentError;
pub use manifest::{PortfolioData, ProjectManifest};
pub use records::{ContactInfo, Experience, Profile, Project, Skill, SkillLevel};
