//! UI/backend events and error modeling for the desktop shell.

use content::Project;
use ui_core::PreviewImage;

pub enum UiEvent {
    ProjectsLoaded(Vec<Project>),
    ProjectsFailed {
        reason: String,
    },
    ImageLoaded {
        index: usize,
        image: PreviewImage,
    },
    ImageFailed {
        index: usize,
        reason: String,
    },
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Network,
    Data,
    Analytics,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    LoadProjects,
    FetchImage,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("collector")
            || message_lower.contains("analytics")
            || message_lower.contains("page view")
        {
            UiErrorCategory::Analytics
        } else if message_lower.contains("manifest")
            || message_lower.contains("json")
            || message_lower.contains("decode")
            || message_lower.contains("invalid")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Data
        } else if message_lower.contains("fetch")
            || message_lower.contains("status")
            || message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unreachable")
        {
            UiErrorCategory::Network
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn category_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Network => "Network",
        UiErrorCategory::Data => "Data",
        UiErrorCategory::Analytics => "Analytics",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
