use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy_egui::EguiPlugin;

use crate::AppState;
use crate::app::plugins::{build_bevy_plugins, create_winit_settings};
use crate::assets::PhotoLibraryPlugin;
use crate::avatar::SessionIdentity;
use crate::importer::ImporterPlugin;
use crate::profile::{FileProfileStore, ProfileResource};
use crate::scenes::ScenePlugin;
use crate::scenes::loading::LoadingScene;
use crate::scenes::registration::register_room_runtime;
use crate::scenes::room::RoomScene;
use crate::settings::{SettingsPlugin, SettingsResource, ViewerSettings};
use crate::ui::HudPlugin;

pub fn configure_viewer_app(app: &mut App, startup_settings: &ViewerSettings) {
    app.insert_resource(SettingsResource::new(startup_settings.clone()))
        .add_plugins(build_bevy_plugins(startup_settings))
        .insert_resource(create_winit_settings(startup_settings))
        .add_plugins(bevy::diagnostic::FrameTimeDiagnosticsPlugin::default())
        .add_plugins(EguiPlugin::default())
        .add_plugins(SettingsPlugin)
        .add_plugins(PhotoLibraryPlugin)
        .add_plugins(ImporterPlugin)
        .add_plugins(HudPlugin)
        .insert_resource(ProfileResource::new(FileProfileStore::load_or_default()))
        .insert_resource(SessionIdentity::from_env())
        .init_state::<AppState>()
        .add_plugins(ScenePlugin::<LoadingScene>::default())
        .add_plugins(ScenePlugin::<RoomScene>::default());

    register_room_runtime(app);
}
