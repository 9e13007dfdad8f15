use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::records::{ContactInfo, Experience, Profile, Project, Skill, SkillLevel};

/// Wire shape of the remote project data source: `{ "projects": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Everything the page renders, supplied wholesale by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioData {
    pub profile: Profile,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
    pub skills: Vec<Skill>,
}

impl PortfolioData {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        self.profile.contact.validate()?;
        for project in &self.projects {
            project.validate()?;
        }
        Ok(())
    }

    /// The hand-authored site data literal.
    pub fn sample() -> Self {
        Self {
            profile: Profile {
                name: "Jacco".to_string(),
                headline: "Full Stack Developer".to_string(),
                about: "I'm a passionate developer with a focus on creating clean, \
                        user-friendly applications. With expertise in both frontend and \
                        backend technologies, I enjoy building complete solutions that \
                        solve real-world problems. I'm constantly learning and exploring \
                        new technologies to improve my skills."
                    .to_string(),
                contact: ContactInfo {
                    email: "jacco@example.com".to_string(),
                    github: Some("https://github.com/jacco".to_string()),
                    linkedin: Some("https://linkedin.com/in/jacco".to_string()),
                },
                version: "3.0.0".to_string(),
            },
            projects: vec![
                Project {
                    title: "Personal Blog".to_string(),
                    description: "A minimalist blog built with HTML, CSS, and vanilla \
                                  JavaScript, focusing on clean typography and user experience."
                        .to_string(),
                    image: "/images/project1.jpg".to_string(),
                    tags: vec!["HTML".to_string(), "CSS".to_string(), "JavaScript".to_string()],
                    link: Some("https://example.com/blog".to_string()),
                    github: Some("https://github.com/username/blog".to_string()),
                },
                Project {
                    title: "Weather Dashboard".to_string(),
                    description: "An interactive weather application that pulls data from a \
                                  public API and displays current conditions and forecasts."
                        .to_string(),
                    image: "/images/project2.jpg".to_string(),
                    tags: vec![
                        "React".to_string(),
                        "API Integration".to_string(),
                        "Tailwind CSS".to_string(),
                    ],
                    link: Some("https://example.com/weather".to_string()),
                    github: Some("https://github.com/username/weather".to_string()),
                },
                Project {
                    title: "Task Manager".to_string(),
                    description: "A productivity tool that helps users organize their daily \
                                  tasks with drag-and-drop functionality and localStorage \
                                  persistence."
                        .to_string(),
                    image: "/images/project3.jpg".to_string(),
                    tags: vec![
                        "TypeScript".to_string(),
                        "React".to_string(),
                        "Local Storage".to_string(),
                    ],
                    link: Some("https://example.com/tasks".to_string()),
                    github: Some("https://github.com/username/tasks".to_string()),
                },
            ],
            experiences: vec![
                Experience {
                    company: "Tech Solutions Inc.".to_string(),
                    role: "Senior Developer".to_string(),
                    period: "2022 - Present".to_string(),
                    description: "Lead development for client projects, mentor junior \
                                  developers, and implement best practices for code quality \
                                  and performance."
                        .to_string(),
                },
                Experience {
                    company: "Digital Agency XYZ".to_string(),
                    role: "Web Developer".to_string(),
                    period: "2020 - 2022".to_string(),
                    description: "Developed responsive web applications and collaborated \
                                  with designers to implement pixel-perfect interfaces."
                        .to_string(),
                },
                Experience {
                    company: "Startup ABC".to_string(),
                    role: "Frontend Developer".to_string(),
                    period: "2018 - 2020".to_string(),
                    description: "Built UI components and implemented modern frontend \
                                  development practices."
                        .to_string(),
                },
            ],
            skills: vec![
                Skill {
                    name: "JavaScript".to_string(),
                    level: SkillLevel::clamped(9),
                },
                Skill {
                    name: "TypeScript".to_string(),
                    level: SkillLevel::clamped(8),
                },
                Skill {
                    name: "React".to_string(),
                    level: SkillLevel::clamped(9),
                },
                Skill {
                    name: "Node.js".to_string(),
                    level: SkillLevel::clamped(7),
                },
                Skill {
                    name: "HTML/CSS".to_string(),
                    level: SkillLevel::clamped(9),
                },
                Skill {
                    name: "Next.js".to_string(),
                    level: SkillLevel::clamped(8),
                },
            ],
        }
    }
}
