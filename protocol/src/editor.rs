//! Editor launch configuration and URL construction.

use serde::{Deserialize, Serialize};

/// Hostname of the partner avatar editor.
pub const EDITOR_HOST: &str = "readyplayer.me";

/// Application id placeholder shipped in sample configs. Never valid.
pub const PLACEHOLDER_APPLICATION_ID: &str = "YOUR_APP_ID";

/// Body coverage variants the editor can be launched with.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    #[default]
    Halfbody,
    Fullbody,
}

impl BodyType {
    pub const ALL: [BodyType; 2] = [BodyType::Halfbody, BodyType::Fullbody];

    /// Query-parameter value understood by the editor.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            BodyType::Halfbody => "halfbody",
            BodyType::Fullbody => "fullbody",
        }
    }

    /// Human-readable label for settings UIs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BodyType::Halfbody => "Half body",
            BodyType::Fullbody => "Full body",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            BodyType::Halfbody => BodyType::Fullbody,
            BodyType::Fullbody => BodyType::Halfbody,
        }
    }
}

/// Launch configuration for the embedded editor surface.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorConfig {
    /// Optional branded subdomain. `demo` launches the shared demo editor.
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub body_type: BodyType,
    /// Partner application id. Recorded for diagnostics, not part of the URL.
    #[serde(default)]
    pub application_id: Option<String>,
}

impl EditorConfig {
    /// URL the editor surface should be opened at.
    #[must_use]
    pub fn editor_url(&self) -> String {
        let host = match self.subdomain.as_deref() {
            Some(subdomain) if !subdomain.is_empty() => format!("{subdomain}.{EDITOR_HOST}"),
            _ => EDITOR_HOST.to_owned(),
        };
        format!(
            "https://{host}/avatar?frameApi&bodyType={}",
            self.body_type.slug()
        )
    }

    /// True when the configured application id is present and well formed.
    #[must_use]
    pub fn has_valid_application_id(&self) -> bool {
        self.application_id
            .as_deref()
            .is_some_and(is_valid_application_id)
    }
}

/// Validates the partner application id format.
#[must_use]
pub fn is_valid_application_id(id: &str) -> bool {
    !id.is_empty()
        && id != PLACEHOLDER_APPLICATION_ID
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_the_bare_host() {
        assert_eq!(
            EditorConfig::default().editor_url(),
            "https://readyplayer.me/avatar?frameApi&bodyType=halfbody"
        );
    }

    #[test]
    fn subdomain_and_body_type_shape_the_url() {
        let config = EditorConfig {
            subdomain: Some("demo".to_owned()),
            body_type: BodyType::Fullbody,
            application_id: None,
        };
        assert_eq!(
            config.editor_url(),
            "https://demo.readyplayer.me/avatar?frameApi&bodyType=fullbody"
        );
    }

    #[test]
    fn body_type_cycle_covers_all_variants() {
        let mut seen = Vec::new();
        let mut current = BodyType::default();
        for _ in 0..BodyType::ALL.len() {
            seen.push(current);
            current = current.next();
        }
        assert_eq!(current, BodyType::default());
        assert_eq!(seen, BodyType::ALL);
    }

    #[test]
    fn application_id_validation() {
        assert!(is_valid_application_id("69039770ce04903d21dc1c5b"));
        assert!(is_valid_application_id("app_id-42"));
        assert!(!is_valid_application_id(""));
        assert!(!is_valid_application_id("YOUR_APP_ID"));
        assert!(!is_valid_application_id("not valid!"));
    }
}
