//! Route model for the single page's sections and the view-model behind
//! project cards.

use content::Project;
use ui_core::analytics::DEFAULT_PAGE_TITLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    About,
    Projects,
    Experience,
    Skills,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Projects,
        Section::Experience,
        Section::Skills,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Projects => "Projects",
            Section::Experience => "Experience",
            Section::Skills => "Skills",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Section::Home => "/",
            Section::About => "/about",
            Section::Projects => "/projects",
            Section::Experience => "/experience",
            Section::Skills => "/skills",
        }
    }

    /// Document title following the site's `%s | Jacco's Portfolio`
    /// template; the root keeps the bare default.
    pub fn title(self) -> String {
        match self {
            Section::Home => DEFAULT_PAGE_TITLE.to_string(),
            other => format!("{} | {}", other.label(), DEFAULT_PAGE_TITLE),
        }
    }

    pub fn from_path(path: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|section| section.path() == path)
    }
}

/// What one project card actually renders. The Code/Demo buttons exist
/// exactly when the corresponding optional URL is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCardView {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub code_url: Option<String>,
    pub demo_url: Option<String>,
}

impl ProjectCardView {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            tags: project.tags.clone(),
            code_url: project.github.clone(),
            demo_url: project.link.clone(),
        }
    }
}
