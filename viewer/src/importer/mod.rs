//! The avatar-editor import session: one editor surface at a time, fed by
//! raw messages from the shared inbound channel. Only trusted, well-formed
//! export events reach the rest of the app, already persisted.

use bevy::prelude::*;
use protocol::{AssetReference, EditorConfig, EditorEvent, decode_editor_message};

use crate::profile::ProfileResource;

/// Request to open the editor surface. Ignored while one is already open.
#[derive(Message, Default)]
pub struct OpenImportSession;

/// Request to close the editor surface without importing.
#[derive(Message, Default)]
pub struct CancelImportSession;

/// One raw text message from the shared inbound channel. Anything may post
/// here; validation happens downstream.
#[derive(Message, Clone)]
pub struct EditorPayloadReceived {
    pub raw: String,
}

/// A trusted export completed. Carries the reference to the produced model.
#[derive(Message, Clone)]
pub struct AvatarImported {
    pub reference: AssetReference,
}

/// The single editor surface this view may have open.
#[derive(Resource, Default)]
pub struct ImportSession {
    config: EditorConfig,
    open: bool,
    frame_ready: bool,
}

impl ImportSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            open: false,
            frame_ready: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// True once the open editor has announced it finished booting.
    pub fn is_frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn editor_url(&self) -> String {
        self.config.editor_url()
    }
}

/// Opens and closes the session on user request. A second open request
/// while the surface is up is ignored with a warning.
pub fn handle_session_requests(
    mut opens: MessageReader<OpenImportSession>,
    mut cancels: MessageReader<CancelImportSession>,
    mut session: ResMut<ImportSession>,
) {
    for _ in opens.read() {
        if session.open {
            warn!("Avatar editor is already open; ignoring the second open request");
            continue;
        }
        session.open = true;
        session.frame_ready = false;
        info!("Avatar editor opened at {}", session.editor_url());
    }
    for _ in cancels.read() {
        if session.open {
            session.open = false;
            session.frame_ready = false;
            info!("Avatar editor closed without an import");
        }
    }
}

/// Decodes raw channel traffic while a session is open. Untrusted or
/// unrelated messages are dropped in silence; a trusted export persists the
/// reference, announces the import and closes the session.
pub fn process_editor_payloads(
    mut payloads: MessageReader<EditorPayloadReceived>,
    mut session: ResMut<ImportSession>,
    mut profile: ResMut<ProfileResource>,
    mut imports: MessageWriter<AvatarImported>,
) {
    for payload in payloads.read() {
        if !session.open {
            continue;
        }
        match decode_editor_message(&payload.raw) {
            Ok(Some(EditorEvent::FrameReady)) => {
                session.frame_ready = true;
                info!("Avatar editor frame is ready");
            }
            Ok(Some(EditorEvent::AvatarExported { reference })) => {
                info!("Avatar exported: {reference}");
                if let Err(error) = profile.remember_imported_avatar(&reference) {
                    warn!("Failed to persist the imported avatar reference: {error}");
                }
                imports.write(AvatarImported { reference });
                session.open = false;
                session.frame_ready = false;
            }
            Ok(None) => {}
            Err(error) => {
                warn!("Editor message rejected: {error}");
            }
        }
    }
}

pub struct ImporterPlugin;

impl Plugin for ImporterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImportSession>()
            .add_message::<OpenImportSession>()
            .add_message::<CancelImportSession>()
            .add_message::<EditorPayloadReceived>()
            .add_message::<AvatarImported>()
            .add_systems(
                Update,
                (handle_session_requests, process_editor_payloads).chain(),
            );
    }
}
