use bevy::gltf::Gltf;
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use bevy::state::app::AppExtStates;

use protocol::AssetReference;
use viewer::AppState;
use viewer::assets::{AssetLoadState, PhotoLibrary, PhotoLibraryState};
use viewer::avatar::{AvatarKind, AvatarModel, PlaceholderTint, Representation, spawn_avatar};
use viewer::importer::{AvatarImported, ImporterPlugin};
use viewer::profile::{MemoryProfileStore, ProfileResource};
use viewer::scenes::ScenePlugin;
use viewer::scenes::loading::LoadingScene;
use viewer::scenes::registration::register_room_runtime;
use viewer::scenes::room::{COMPANION_MODEL_REFERENCE, DEFAULT_USER_MODEL_REFERENCE, RoomScene};
use viewer::settings::{SettingsResource, ViewerSettings};
use viewer::ui::UiPointerCapture;

fn room_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        bevy::state::app::StatesPlugin,
        bevy::input::InputPlugin,
        bevy::asset::AssetPlugin::default(),
    ))
    .init_asset::<Mesh>()
    .init_asset::<StandardMaterial>()
    .init_asset::<Image>()
    .init_asset::<Gltf>()
    .init_asset::<AnimationGraph>()
    .init_asset::<PhotoLibrary>()
    .init_resource::<GlobalAmbientLight>()
    .init_resource::<PhotoLibraryState>()
    .init_resource::<UiPointerCapture>()
    .insert_resource(SettingsResource::new(ViewerSettings::default()))
    .insert_resource(ProfileResource::new(MemoryProfileStore::default()))
    .init_state::<AppState>()
    .add_plugins(ImporterPlugin)
    .add_plugins(ScenePlugin::<LoadingScene>::default())
    .add_plugins(ScenePlugin::<RoomScene>::default());
    register_room_runtime(&mut app);
    app
}

#[test]
fn the_user_model_defaults_to_the_bundled_reference() {
    let mut app = room_test_app();
    app.update();
    app.update();

    let mut avatars = app.world_mut().query::<(&AvatarKind, &AvatarModel)>();
    for (kind, model) in avatars.iter(app.world()) {
        let expected = match kind {
            AvatarKind::User => DEFAULT_USER_MODEL_REFERENCE,
            AvatarKind::Companion => COMPANION_MODEL_REFERENCE,
        };
        assert_eq!(model.reference().map(|r| r.as_str()), Some(expected));
    }
}

#[test]
fn a_remembered_import_wins_over_the_bundled_model() {
    let mut app = room_test_app();
    app.world_mut()
        .resource_mut::<ProfileResource>()
        .remember_imported_avatar(&AssetReference::new(
            "https://models.readyplayer.me/saved.glb",
        ))
        .unwrap();

    app.update();
    app.update();

    let mut avatars = app.world_mut().query::<(&AvatarKind, &AvatarModel)>();
    let user_reference = avatars
        .iter(app.world())
        .find(|(kind, _)| matches!(kind, AvatarKind::User))
        .and_then(|(_, model)| model.reference().cloned());
    assert_eq!(
        user_reference.map(|r| r.into_inner()),
        Some("https://models.readyplayer.me/saved.glb".to_string())
    );
}

#[test]
fn an_import_restarts_only_the_user_model() {
    let mut app = room_test_app();
    app.update();
    app.update();

    let imported = AssetReference::new("https://models.readyplayer.me/abc123.glb");
    app.world_mut().write_message(AvatarImported {
        reference: imported.clone(),
    });
    app.update();
    app.update();

    let mut avatars = app.world_mut().query::<(&AvatarKind, &AvatarModel)>();
    for (kind, model) in avatars.iter(app.world()) {
        match kind {
            AvatarKind::User => {
                assert_eq!(model.reference(), Some(&imported));
                // The fresh reference went back through the request pass.
                assert!(!matches!(model.load, AssetLoadState::Missing));
            }
            AvatarKind::Companion => {
                assert_eq!(
                    model.reference().map(|r| r.as_str()),
                    Some(COMPANION_MODEL_REFERENCE)
                );
            }
        }
    }
}

#[test]
fn a_missing_reference_shows_the_palette_silhouette() {
    let mut app = room_test_app();
    app.update();
    app.update();

    let extra = {
        let mut commands = app.world_mut().commands();
        spawn_avatar(
            &mut commands,
            AvatarKind::User,
            Vec3::new(0.0, 0.0, 2.0),
            None,
        )
    };
    app.world_mut().flush();
    app.update();

    let model = app.world().get::<AvatarModel>(extra).expect("avatar model");
    assert!(matches!(model.load, AssetLoadState::Missing));
    assert_eq!(
        model.shown(),
        Representation::Placeholder(PlaceholderTint::Palette)
    );
}
