use bevy::prelude::*;

use protocol::{AVATAR_EXPORTED_EVENT, AssetReference, EditorEnvelope, TRUSTED_SOURCE};
use viewer::importer::{
    AvatarImported, CancelImportSession, EditorPayloadReceived, ImportSession, ImporterPlugin,
    OpenImportSession,
};
use viewer::profile::{MemoryProfileStore, ProfileResource};

#[derive(Resource, Default)]
struct ImportedLog(Vec<AssetReference>);

fn record_imports(mut imports: MessageReader<AvatarImported>, mut log: ResMut<ImportedLog>) {
    for import in imports.read() {
        log.0.push(import.reference.clone());
    }
}

fn session_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(ProfileResource::new(MemoryProfileStore::default()))
        .init_resource::<ImportedLog>()
        .add_plugins(ImporterPlugin)
        .add_systems(Update, record_imports);
    app
}

fn post_payload(app: &mut App, raw: impl Into<String>) {
    app.world_mut()
        .write_message(EditorPayloadReceived { raw: raw.into() });
}

#[test]
fn open_and_cancel_round_trip() {
    let mut app = session_test_app();

    app.world_mut().write_message(OpenImportSession);
    app.update();
    {
        let session = app.world().resource::<ImportSession>();
        assert!(session.is_open());
        assert!(!session.is_frame_ready());
    }

    app.world_mut().write_message(CancelImportSession);
    app.update();
    assert!(!app.world().resource::<ImportSession>().is_open());
    assert!(app.world().resource::<ImportedLog>().0.is_empty());
}

#[test]
fn a_second_open_request_leaves_the_session_alone() {
    let mut app = session_test_app();

    app.world_mut().write_message(OpenImportSession);
    let raw = serde_json::to_string(&EditorEnvelope::frame_ready()).unwrap();
    post_payload(&mut app, raw);
    app.update();
    assert!(app.world().resource::<ImportSession>().is_frame_ready());

    app.world_mut().write_message(OpenImportSession);
    app.update();
    let session = app.world().resource::<ImportSession>();
    assert!(session.is_open());
    assert!(session.is_frame_ready());
}

#[test]
fn a_trusted_export_imports_persists_and_closes() {
    let mut app = session_test_app();

    app.world_mut().write_message(OpenImportSession);
    app.update();

    let raw = serde_json::to_string(&EditorEnvelope::avatar_exported(
        "https://models.readyplayer.me/abc123.glb",
    ))
    .unwrap();
    post_payload(&mut app, raw);
    app.update();

    assert!(!app.world().resource::<ImportSession>().is_open());
    assert_eq!(
        app.world()
            .resource::<ProfileResource>()
            .imported_avatar()
            .map(|reference| reference.into_inner()),
        Some("https://models.readyplayer.me/abc123.glb".to_string())
    );

    // The announcement crosses the message buffers on the next frame.
    app.update();
    let log = app.world().resource::<ImportedLog>();
    assert_eq!(log.0.len(), 1);
    assert_eq!(log.0[0].as_str(), "https://models.readyplayer.me/abc123.glb");
}

#[test]
fn exports_from_untrusted_sources_are_dropped() {
    let mut app = session_test_app();

    app.world_mut().write_message(OpenImportSession);
    app.update();

    let mut envelope = EditorEnvelope::avatar_exported("https://models.example.com/evil.glb");
    envelope.source = Some("somebody-else".to_owned());
    post_payload(&mut app, serde_json::to_string(&envelope).unwrap());
    app.update();
    app.update();

    assert!(app.world().resource::<ImportSession>().is_open());
    assert!(
        app.world()
            .resource::<ProfileResource>()
            .imported_avatar()
            .is_none()
    );
    assert!(app.world().resource::<ImportedLog>().0.is_empty());
}

#[test]
fn payloads_while_closed_are_dropped() {
    let mut app = session_test_app();

    let raw = serde_json::to_string(&EditorEnvelope::avatar_exported(
        "https://models.readyplayer.me/sneaky.glb",
    ))
    .unwrap();
    post_payload(&mut app, raw);
    app.update();
    app.update();

    assert!(!app.world().resource::<ImportSession>().is_open());
    assert!(
        app.world()
            .resource::<ProfileResource>()
            .imported_avatar()
            .is_none()
    );
    assert!(app.world().resource::<ImportedLog>().0.is_empty());
}

#[test]
fn a_broken_export_keeps_the_session_open() {
    let mut app = session_test_app();

    app.world_mut().write_message(OpenImportSession);
    app.update();

    let broken = EditorEnvelope {
        source: Some(TRUSTED_SOURCE.to_owned()),
        event_name: Some(AVATAR_EXPORTED_EVENT.to_owned()),
        data: None,
    };
    post_payload(&mut app, serde_json::to_string(&broken).unwrap());
    app.update();

    assert!(app.world().resource::<ImportSession>().is_open());
    assert!(
        app.world()
            .resource::<ProfileResource>()
            .imported_avatar()
            .is_none()
    );
}

#[test]
fn reopening_forgets_the_previous_frame_ready() {
    let mut app = session_test_app();

    app.world_mut().write_message(OpenImportSession);
    post_payload(
        &mut app,
        serde_json::to_string(&EditorEnvelope::frame_ready()).unwrap(),
    );
    app.update();
    assert!(app.world().resource::<ImportSession>().is_frame_ready());

    app.world_mut().write_message(CancelImportSession);
    app.update();
    app.world_mut().write_message(OpenImportSession);
    app.update();

    let session = app.world().resource::<ImportSession>();
    assert!(session.is_open());
    assert!(!session.is_frame_ready());
}
