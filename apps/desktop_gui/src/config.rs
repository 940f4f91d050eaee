//! Settings resolution: defaults, then the per-user settings file, then
//! environment. CLI flags override last, in `main`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub topic: String,
    pub content_type: String,
    pub target_audience: String,
    pub tone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            topic: String::new(),
            content_type: "blog post".into(),
            target_audience: String::new(),
            tone: "informative".into(),
        }
    }
}

pub fn settings_path(data_dir: Option<&Path>) -> PathBuf {
    let root = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("content_studio"),
    };
    root.join("settings.json")
}

pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&raw) {
            Ok(file_cfg) => settings = file_cfg,
            Err(err) => warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    if let Ok(v) = std::env::var("STUDIO_SERVER_URL") {
        settings.server_url = v;
    }

    settings
}

pub fn save_settings(path: &Path, settings: &Settings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, raw)
}
