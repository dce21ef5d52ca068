//! Defensive decoding of editor messages arriving on the shared inbound
//! channel.

use crate::message::{
    AVATAR_EXPORTED_EVENT, EditorEnvelope, EditorEvent, FRAME_READY_EVENT, TRUSTED_SOURCE,
};
use crate::reference::AssetReference;

/// Errors raised for messages that are recognizably the editor's but broken.
///
/// Anything that is not recognizably the editor's never errors; it decodes to
/// `None` and is dropped in silence.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("trusted editor message carries no event name")]
    MissingEventName,

    #[error("export event {event:?} carries no avatar url")]
    MissingExportReference { event: String },
}

/// Filter that turns raw inbound text into typed editor events.
#[derive(Clone, Debug)]
pub struct EditorMessageFilter {
    trusted_source: String,
}

impl Default for EditorMessageFilter {
    fn default() -> Self {
        Self {
            trusted_source: TRUSTED_SOURCE.to_owned(),
        }
    }
}

impl EditorMessageFilter {
    #[must_use]
    pub fn new(trusted_source: impl Into<String>) -> Self {
        Self {
            trusted_source: trusted_source.into(),
        }
    }

    #[must_use]
    pub fn trusted_source(&self) -> &str {
        &self.trusted_source
    }

    /// Decodes one raw inbound message.
    ///
    /// Returns `Ok(Some(event))` for the events this integration handles and
    /// `Ok(None)` for everything to be ignored: non-JSON text, JSON of a
    /// different shape, untrusted sources and unhandled event names.
    pub fn decode(&self, raw: &str) -> Result<Option<EditorEvent>, HandshakeError> {
        let Ok(envelope) = serde_json::from_str::<EditorEnvelope>(raw) else {
            return Ok(None);
        };
        self.decode_envelope(&envelope)
    }

    /// Decodes an already-parsed envelope.
    pub fn decode_envelope(
        &self,
        envelope: &EditorEnvelope,
    ) -> Result<Option<EditorEvent>, HandshakeError> {
        if envelope.source.as_deref() != Some(self.trusted_source.as_str()) {
            return Ok(None);
        }

        let Some(event) = envelope.event_name.as_deref() else {
            return Err(HandshakeError::MissingEventName);
        };

        match event {
            FRAME_READY_EVENT => Ok(Some(EditorEvent::FrameReady)),
            AVATAR_EXPORTED_EVENT => {
                let url = envelope
                    .data
                    .as_ref()
                    .and_then(|data| data.url.as_deref())
                    .filter(|url| !url.is_empty());
                match url {
                    Some(url) => Ok(Some(EditorEvent::AvatarExported {
                        reference: AssetReference::new(url),
                    })),
                    None => Err(HandshakeError::MissingExportReference {
                        event: event.to_owned(),
                    }),
                }
            }
            _ => Ok(None),
        }
    }
}

/// Decodes one raw message against the default trusted source.
pub fn decode_editor_message(raw: &str) -> Result<Option<EditorEvent>, HandshakeError> {
    EditorMessageFilter::default().decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_message_decodes_to_a_reference() {
        let raw = serde_json::to_string(&EditorEnvelope::avatar_exported(
            "https://models.example.com/abc.glb",
        ))
        .unwrap();

        let event = decode_editor_message(&raw).unwrap().unwrap();
        assert_eq!(
            event,
            EditorEvent::AvatarExported {
                reference: AssetReference::new("https://models.example.com/abc.glb"),
            }
        );
    }

    #[test]
    fn non_json_text_is_dropped_silently() {
        assert_eq!(decode_editor_message("hello there").unwrap(), None);
    }

    #[test]
    fn custom_trusted_source_filters_the_default_one() {
        let filter = EditorMessageFilter::new("partner-editor");
        let raw = serde_json::to_string(&EditorEnvelope::frame_ready()).unwrap();
        assert_eq!(filter.decode(&raw).unwrap(), None);
    }
}
