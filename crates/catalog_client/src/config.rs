use std::{collections::HashMap, fs, path::Path, time::Duration};

use url::Url;

pub const SETTINGS_FILE: &str = "bookshelf.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub api_resource: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".into(),
            api_resource: "api/data".into(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Absolute URL of the books resource.
    pub fn resource_url(&self) -> Result<Url, url::ParseError> {
        let mut base = Url::parse(self.api_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(self.api_resource.trim_start_matches('/'))
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            if let Some(v) = file_cfg.get("api_url").and_then(|v| v.as_str()) {
                settings.api_url = v.to_string();
            }
            if let Some(v) = file_cfg.get("api_resource").and_then(|v| v.as_str()) {
                settings.api_resource = v.to_string();
            }
            if let Some(v) = file_cfg
                .get("request_timeout_secs")
                .and_then(|v| v.as_integer())
            {
                if let Ok(secs) = u64::try_from(v) {
                    settings.request_timeout_secs = secs;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("BOOKSHELF_API_URL") {
        settings.api_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_URL") {
        settings.api_url = v;
    }

    if let Ok(v) = std::env::var("APP__API_RESOURCE") {
        settings.api_resource = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}
