//! UI framework classification for an inspected page.

use serde::{Deserialize, Serialize};

/// The UI framework family detected in the target page.
///
/// Detection is best-effort and signal-based; only React gets deep
/// component introspection. The serialized form uses the lowercase name
/// so wire payloads read `"react"`, `"vue"`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    React,
    Vue,
    Angular,
    Svelte,
    Unknown,
}

impl FrameworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detection snapshot for an inspection session.
///
/// Recomputed on demand; never cached across navigations (the target page
/// can swap frameworks entirely on reload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkInfo {
    #[serde(rename = "type")]
    pub kind: FrameworkKind,

    /// Best-effort version string (absent when not exposed by the page)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Whether a devtools hook is registered in the target global scope
    #[serde(default)]
    pub devtools_detected: bool,
}

impl FrameworkInfo {
    pub fn new(kind: FrameworkKind) -> Self {
        Self {
            kind,
            version: None,
            devtools_detected: false,
        }
    }

    pub fn unknown() -> Self {
        Self::new(FrameworkKind::Unknown)
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_devtools(mut self, detected: bool) -> Self {
        self.devtools_detected = detected;
        self
    }

    /// The snapshot reported by the fallback inspector when the target
    /// document is unreachable. The version field carries the explanation
    /// since there is nowhere else to surface it.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            kind: FrameworkKind::Unknown,
            version: Some(reason.into()),
            devtools_detected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(FrameworkKind::React).unwrap(),
            serde_json::json!("react")
        );
        assert_eq!(
            serde_json::to_value(FrameworkKind::Unknown).unwrap(),
            serde_json::json!("unknown")
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FrameworkKind::Svelte.to_string(), "svelte");
    }

    #[test]
    fn test_info_type_field_name() {
        let info = FrameworkInfo::new(FrameworkKind::Vue).with_version("3.4.21");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "vue");
        assert_eq!(json["version"], "3.4.21");
    }

    #[test]
    fn test_info_version_omitted_when_absent() {
        let json = serde_json::to_value(FrameworkInfo::unknown()).unwrap();
        assert!(json.get("version").is_none());
    }

    #[test]
    fn test_unavailable_carries_reason_in_version() {
        let info = FrameworkInfo::unavailable("cross-origin frame: content not accessible");
        assert_eq!(info.kind, FrameworkKind::Unknown);
        assert!(info.version.unwrap().contains("cross-origin"));
    }

    #[test]
    fn test_info_round_trip() {
        let info = FrameworkInfo::new(FrameworkKind::React)
            .with_version("18.3.1")
            .with_devtools(true);
        let json = serde_json::to_string(&info).unwrap();
        let back: FrameworkInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
