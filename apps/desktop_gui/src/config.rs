//! Settings layering: built-in defaults, then `folio.toml`, then
//! environment variables, then CLI flags.

use std::collections::HashMap;
use std::fs;

use tracing::warn;
use ui_core::analytics::{AnalyticsConfig, DEFAULT_COLLECTOR_URL, DEFAULT_SITE_ID};
use url::Url;

const CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote project manifest. `None` renders the built-in site data.
    pub projects_url: Option<String>,
    pub analytics_enabled: bool,
    pub analytics_site_id: String,
    pub analytics_collector_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            projects_url: None,
            analytics_enabled: true,
            analytics_site_id: DEFAULT_SITE_ID.to_string(),
            analytics_collector_url: DEFAULT_COLLECTOR_URL.to_string(),
        }
    }
}

/// CLI flags, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub projects_url: Option<String>,
    pub site_id: Option<String>,
    pub collector_url: Option<String>,
    pub no_analytics: bool,
}

pub fn load_settings(overrides: &Overrides) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(CONFIG_FILE) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file(&mut settings, &file_cfg);
        }
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    apply_overrides(&mut settings, overrides);
    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("projects_url") {
        settings.projects_url = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("analytics_site_id") {
        settings.analytics_site_id = v.clone();
    }
    if let Some(v) = file_cfg.get("analytics_collector_url") {
        settings.analytics_collector_url = v.clone();
    }
    if let Some(v) = file_cfg.get("analytics_enabled") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.analytics_enabled = parsed;
        }
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("FOLIO_PROJECTS_URL") {
        settings.projects_url = Some(v);
    }
    if let Some(v) = lookup("FOLIO_ANALYTICS_SITE_ID") {
        settings.analytics_site_id = v;
    }
    if let Some(v) = lookup("FOLIO_ANALYTICS_COLLECTOR_URL") {
        settings.analytics_collector_url = v;
    }
    if lookup("FOLIO_ANALYTICS_DISABLED").is_some_and(|v| !v.trim().is_empty()) {
        settings.analytics_enabled = false;
    }
}

fn apply_overrides(settings: &mut Settings, overrides: &Overrides) {
    if let Some(v) = &overrides.projects_url {
        settings.projects_url = Some(v.clone());
    }
    if let Some(v) = &overrides.site_id {
        settings.analytics_site_id = v.clone();
    }
    if let Some(v) = &overrides.collector_url {
        settings.analytics_collector_url = v.clone();
    }
    if overrides.no_analytics {
        settings.analytics_enabled = false;
    }
}

impl Settings {
    /// Parsed manifest URL; an unparseable value is logged and dropped so
    /// the app falls back to the built-in data.
    pub fn manifest_url(&self) -> Option<Url> {
        let raw = self.projects_url.as_deref()?;
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!("ignoring unparseable projects url '{raw}': {err}");
                None
            }
        }
    }

    /// Analytics configuration, or `None` when disabled or misconfigured.
    /// A bad site id or collector never gets to break the page.
    pub fn analytics_config(&self) -> Option<AnalyticsConfig> {
        if !self.analytics_enabled {
            return None;
        }
        match AnalyticsConfig::new(&self.analytics_site_id, &self.analytics_collector_url) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!("analytics disabled: {err}");
                None
            }
        }
    }
}
