//! Wire messages exchanged with the embedded avatar editor.

use serde::{Deserialize, Serialize};

use crate::reference::AssetReference;

/// Source tag carried by every message the partner editor emits.
pub const TRUSTED_SOURCE: &str = "readyplayerme";

/// Emitted once the editor surface has finished booting. Informational.
pub const FRAME_READY_EVENT: &str = "v1.frame.ready";

/// Emitted when the user finishes designing and exports an avatar.
pub const AVATAR_EXPORTED_EVENT: &str = "v1.avatar.exported";

/// Raw JSON envelope posted by the editor surface.
///
/// Field names follow the editor's camelCase wire format. The inbound channel
/// is shared with arbitrary producers, so every field past `source` is
/// optional and unknown fields are tolerated; validation happens in the codec,
/// not the deserializer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditorEnvelope {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ExportData>,
}

/// Payload block attached to export events.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportData {
    #[serde(default)]
    pub url: Option<String>,
}

impl EditorEnvelope {
    /// Well-formed frame-ready announcement.
    #[must_use]
    pub fn frame_ready() -> Self {
        Self {
            source: Some(TRUSTED_SOURCE.to_owned()),
            event_name: Some(FRAME_READY_EVENT.to_owned()),
            data: None,
        }
    }

    /// Well-formed export announcement carrying the produced avatar url.
    #[must_use]
    pub fn avatar_exported(url: impl Into<String>) -> Self {
        Self {
            source: Some(TRUSTED_SOURCE.to_owned()),
            event_name: Some(AVATAR_EXPORTED_EVENT.to_owned()),
            data: Some(ExportData {
                url: Some(url.into()),
            }),
        }
    }

    /// True when the message claims to come from the trusted editor.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.source.as_deref() == Some(TRUSTED_SOURCE)
    }
}

/// Editor events this application reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// The editor surface finished loading.
    FrameReady,
    /// The user exported an avatar; `reference` locates the produced model.
    AvatarExported { reference: AssetReference },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_stamp_the_trusted_source() {
        assert!(EditorEnvelope::frame_ready().is_trusted());
        assert!(EditorEnvelope::avatar_exported("https://x/a.glb").is_trusted());
    }

    #[test]
    fn envelope_uses_camel_case_field_names() {
        let json = serde_json::to_string(&EditorEnvelope::frame_ready()).unwrap();
        assert!(json.contains("\"eventName\""));
        assert!(!json.contains("event_name"));
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let envelope: EditorEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope, EditorEnvelope::default());
        assert!(!envelope.is_trusted());
    }
}
