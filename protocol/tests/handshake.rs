use protocol::codec::{EditorMessageFilter, HandshakeError, decode_editor_message};
use protocol::editor::{BodyType, EditorConfig};
use protocol::message::{EditorEnvelope, EditorEvent, ExportData, TRUSTED_SOURCE};
use protocol::reference::AssetReference;

fn sample_export_url() -> &'static str {
    "https://models.readyplayer.me/64bfa15f0e72c63d7c3934a6.glb"
}

fn sample_export_raw() -> String {
    serde_json::to_string(&EditorEnvelope::avatar_exported(sample_export_url())).unwrap()
}

fn sample_frame_ready_raw() -> String {
    serde_json::to_string(&EditorEnvelope::frame_ready()).unwrap()
}

#[test]
fn frame_ready_decodes_to_the_informational_event() {
    let event = decode_editor_message(&sample_frame_ready_raw())
        .unwrap()
        .unwrap();
    assert_eq!(event, EditorEvent::FrameReady);
}

#[test]
fn avatar_export_decodes_to_a_reference() {
    let event = decode_editor_message(&sample_export_raw()).unwrap().unwrap();
    assert!(matches!(
        event,
        EditorEvent::AvatarExported { ref reference } if reference.as_str() == sample_export_url()
    ));
}

#[test]
fn hand_written_wire_text_decodes_like_the_builders() {
    let raw = format!(
        "{{\"source\":\"readyplayerme\",\"eventName\":\"v1.avatar.exported\",\
         \"data\":{{\"url\":\"{}\"}}}}",
        sample_export_url()
    );
    let event = decode_editor_message(&raw).unwrap().unwrap();
    assert_eq!(
        event,
        EditorEvent::AvatarExported {
            reference: AssetReference::new(sample_export_url()),
        }
    );
}

#[test]
fn untrusted_source_is_silently_discarded() {
    let mut envelope = EditorEnvelope::avatar_exported(sample_export_url());
    envelope.source = Some("someone-else".to_owned());
    let raw = serde_json::to_string(&envelope).unwrap();

    assert_eq!(decode_editor_message(&raw).unwrap(), None);
}

#[test]
fn missing_source_is_silently_discarded() {
    let raw = "{\"eventName\":\"v1.avatar.exported\",\"data\":{\"url\":\"https://x/a.glb\"}}";
    assert_eq!(decode_editor_message(raw).unwrap(), None);
}

#[test]
fn unhandled_event_from_the_trusted_source_is_ignored() {
    let mut envelope = EditorEnvelope::frame_ready();
    envelope.event_name = Some("v1.user.set".to_owned());
    let raw = serde_json::to_string(&envelope).unwrap();

    assert_eq!(decode_editor_message(&raw).unwrap(), None);
}

#[test]
fn non_json_and_non_object_payloads_are_ignored() {
    assert_eq!(decode_editor_message("").unwrap(), None);
    assert_eq!(decode_editor_message("not json at all").unwrap(), None);
    assert_eq!(decode_editor_message("[1,2,3]").unwrap(), None);
    assert_eq!(decode_editor_message("42").unwrap(), None);
}

#[test]
fn trusted_message_without_event_name_is_an_error() {
    let raw = format!("{{\"source\":\"{TRUSTED_SOURCE}\"}}");
    let err = decode_editor_message(&raw).unwrap_err();
    assert!(matches!(err, HandshakeError::MissingEventName));
}

#[test]
fn export_without_url_is_an_error() {
    let mut envelope = EditorEnvelope::avatar_exported(sample_export_url());
    envelope.data = Some(ExportData { url: None });
    let raw = serde_json::to_string(&envelope).unwrap();

    let err = decode_editor_message(&raw).unwrap_err();
    assert!(matches!(err, HandshakeError::MissingExportReference { .. }));
}

#[test]
fn export_with_empty_url_is_an_error() {
    let mut envelope = EditorEnvelope::avatar_exported("");
    envelope.data = Some(ExportData {
        url: Some(String::new()),
    });
    let raw = serde_json::to_string(&envelope).unwrap();

    assert!(decode_editor_message(&raw).is_err());
}

#[test]
fn unknown_extra_fields_are_tolerated() {
    let raw = format!(
        "{{\"source\":\"{TRUSTED_SOURCE}\",\"eventName\":\"v1.frame.ready\",\
         \"origin\":\"https://readyplayer.me\",\"timestamp\":123}}"
    );
    assert_eq!(
        decode_editor_message(&raw).unwrap(),
        Some(EditorEvent::FrameReady)
    );
}

#[test]
fn filter_source_can_be_overridden() {
    let filter = EditorMessageFilter::new("partner-editor");
    assert_eq!(filter.trusted_source(), "partner-editor");

    let mut envelope = EditorEnvelope::frame_ready();
    envelope.source = Some("partner-editor".to_owned());
    let raw = serde_json::to_string(&envelope).unwrap();

    assert_eq!(filter.decode(&raw).unwrap(), Some(EditorEvent::FrameReady));
    assert_eq!(
        filter.decode(&sample_frame_ready_raw()).unwrap(),
        None,
        "default source must not pass a custom filter"
    );
}

#[test]
fn editor_urls_cover_both_body_types() {
    let half = EditorConfig::default();
    let full = EditorConfig {
        body_type: BodyType::Fullbody,
        ..EditorConfig::default()
    };

    assert_eq!(
        half.editor_url(),
        "https://readyplayer.me/avatar?frameApi&bodyType=halfbody"
    );
    assert_eq!(
        full.editor_url(),
        "https://readyplayer.me/avatar?frameApi&bodyType=fullbody"
    );
}

#[test]
fn demo_subdomain_matches_the_shared_editor_url() {
    let config = EditorConfig {
        subdomain: Some("demo".to_owned()),
        ..EditorConfig::default()
    };
    assert_eq!(
        config.editor_url(),
        "https://demo.readyplayer.me/avatar?frameApi&bodyType=halfbody"
    );
}

#[test]
fn config_application_id_validation() {
    let mut config = EditorConfig::default();
    assert!(!config.has_valid_application_id());

    config.application_id = Some("YOUR_APP_ID".to_owned());
    assert!(!config.has_valid_application_id());

    config.application_id = Some("69039770ce04903d21dc1c5b".to_owned());
    assert!(config.has_valid_application_id());
}
