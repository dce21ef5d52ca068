//! Shared types for the memory-room viewer: opaque asset references and the
//! avatar-editor handshake (wire envelope, defensive decoding, launch URLs).

pub mod codec;
pub mod editor;
pub mod message;
pub mod reference;

pub use codec::{EditorMessageFilter, HandshakeError, decode_editor_message};
pub use editor::{BodyType, EditorConfig, is_valid_application_id};
pub use message::{
    AVATAR_EXPORTED_EVENT, EditorEnvelope, EditorEvent, ExportData, FRAME_READY_EVENT,
    TRUSTED_SOURCE,
};
pub use reference::AssetReference;

/// Returns the protocol crate version string.
pub fn protocol_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_pkg() {
        assert_eq!(protocol_version(), env!("CARGO_PKG_VERSION"));
    }
}
