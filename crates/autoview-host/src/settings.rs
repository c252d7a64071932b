//! Settings parser for .autoview/config.toml

use std::path::{Path, PathBuf};

use autoview_core::prelude::*;
use serde::Deserialize;

const SETTINGS_DIR: &str = ".autoview";
const SETTINGS_FILE: &str = "config.toml";

/// Default upper bound for the probe ready-ack handshake.
const DEFAULT_READY_TIMEOUT_MS: u64 = 1500;

/// Default host overlay border color.
const DEFAULT_HIGHLIGHT_COLOR: &str = "#6366f1";

/// Host-side inspector settings.
///
/// Everything has a default; a missing config file is not an error. The
/// file lives at `.autoview/config.toml` under the project root:
///
/// ```toml
/// ready_timeout_ms = 800
/// highlight_color = "#22c55e"
/// source_globs = ["**/*.tsx", "**/*.ts"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectorSettings {
    /// How long the controller waits for `INSPECTOR_READY` before treating
    /// the injection as failed and falling back.
    pub ready_timeout_ms: u64,

    /// Border color of the host-rendered highlight overlay.
    pub highlight_color: String,

    /// Project root used to resolve relative source candidates.
    pub project_root: Option<PathBuf>,

    /// Scope globs handed to the text-search collaborator.
    pub source_globs: Vec<String>,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            project_root: None,
            source_globs: vec![
                "**/*.tsx".to_string(),
                "**/*.ts".to_string(),
                "**/*.jsx".to_string(),
                "**/*.js".to_string(),
            ],
        }
    }
}

impl InspectorSettings {
    /// Load settings from `.autoview/config.toml` under `project_root`.
    ///
    /// A missing file yields defaults. A malformed file is a
    /// [`Error::Config`] — the one case surfaced to the caller, since
    /// silently ignoring a typo'd config is worse than failing attach.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(SETTINGS_DIR).join(SETTINGS_FILE);
        if !path.exists() {
            debug!("no inspector config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let mut settings: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))?;
        if settings.project_root.is_none() {
            settings.project_root = Some(project_root.to_path_buf());
        }
        info!("loaded inspector config from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let settings = InspectorSettings::default();
        assert_eq!(settings.ready_timeout_ms, 1500);
        assert_eq!(settings.highlight_color, "#6366f1");
        assert!(settings.project_root.is_none());
        assert!(settings.source_globs.contains(&"**/*.tsx".to_string()));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = InspectorSettings::load(dir.path()).unwrap();
        assert_eq!(settings.ready_timeout_ms, 1500);
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(SETTINGS_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(SETTINGS_FILE), "ready_timeout_ms = 250\n").unwrap();

        let settings = InspectorSettings::load(dir.path()).unwrap();
        assert_eq!(settings.ready_timeout_ms, 250);
        // Unset fields keep their defaults; the root is backfilled.
        assert_eq!(settings.highlight_color, "#6366f1");
        assert_eq!(settings.project_root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_load_malformed_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(SETTINGS_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(SETTINGS_FILE), "ready_timeout_ms = \"soon\"\n").unwrap();

        let err = InspectorSettings::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_explicit_project_root_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(SETTINGS_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join(SETTINGS_FILE),
            "project_root = \"/srv/preview\"\n",
        )
        .unwrap();

        let settings = InspectorSettings::load(dir.path()).unwrap();
        assert_eq!(
            settings.project_root.as_deref(),
            Some(Path::new("/srv/preview"))
        );
    }
}
