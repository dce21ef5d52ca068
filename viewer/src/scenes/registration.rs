//! Wires the room runtime into the frame pipeline: asset polling first,
//! then spawning, behavior, interaction and finally the camera.

use bevy::prelude::*;

use super::pipeline::RoomPipelineSet;
use super::room::camera;
use crate::avatar;
use crate::gallery;

fn room_is_active(state: Res<State<crate::AppState>>) -> bool {
    matches!(state.get(), crate::AppState::Room)
}

pub fn register_room_runtime(app: &mut App) {
    app.init_resource::<avatar::PlaceholderAssets>()
        .init_resource::<gallery::GalleryStatus>()
        .add_message::<gallery::PhotoSelected>()
        .configure_sets(
            Update,
            (
                RoomPipelineSet::AssetLoad,
                RoomPipelineSet::WorldSpawn,
                RoomPipelineSet::Behavior,
                RoomPipelineSet::Interaction,
                RoomPipelineSet::Camera,
            )
                .chain(),
        )
        .add_systems(Startup, camera::spawn_room_camera)
        .add_systems(
            Update,
            (
                avatar::request_avatar_models,
                avatar::poll_avatar_models,
                avatar::prepare_avatar_animation_graphs,
                gallery::request_frame_textures,
                gallery::poll_frame_textures,
            )
                .chain()
                .in_set(RoomPipelineSet::AssetLoad)
                .run_if(room_is_active),
        )
        .add_systems(
            Update,
            (
                gallery::build_photo_wall_when_ready,
                avatar::sync_avatar_representation,
                avatar::bind_avatar_animation_players,
                gallery::apply_frame_textures,
            )
                .chain()
                .in_set(RoomPipelineSet::WorldSpawn)
                .run_if(room_is_active),
        )
        .add_systems(
            Update,
            (
                avatar::advance_reaction_schedules,
                avatar::apply_behavior_animation,
                avatar::drive_avatar_motion,
                avatar::lift_companion_tail,
            )
                .chain()
                .in_set(RoomPipelineSet::Behavior)
                .run_if(room_is_active),
        )
        .add_systems(
            Update,
            (
                avatar::apply_imported_avatar_references,
                gallery::update_frame_hover,
                gallery::animate_frame_hover,
                gallery::report_photo_clicks,
            )
                .chain()
                .in_set(RoomPipelineSet::Interaction)
                .run_if(room_is_active),
        )
        .add_systems(
            Update,
            (camera::orbit_camera_input, camera::apply_orbit_camera)
                .chain()
                .in_set(RoomPipelineSet::Camera)
                .run_if(room_is_active),
        );
}
