//! The memory room scene: static geometry, lighting, both avatars and the
//! photo wall, torn down entity-by-entity on exit.

pub mod camera;
pub mod geometry;
pub mod lighting;

use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, OnExit};
use protocol::AssetReference;

use super::SceneBuilder;
use crate::avatar::{AvatarKind, spawn_avatar};
use crate::profile::ProfileResource;

pub const USER_AVATAR_POSITION: Vec3 = Vec3::new(-1.5, 0.0, 0.0);
pub const COMPANION_AVATAR_POSITION: Vec3 = Vec3::new(1.5, 0.0, 0.0);
pub const COMPANION_MODEL_REFERENCE: &str = "models/bruno-shih-tzu.glb";
pub const DEFAULT_USER_MODEL_REFERENCE: &str = "models/user-avatar.glb";

/// Everything spawned for the room carries this marker so cleanup is a
/// single query.
#[derive(Component)]
pub struct RoomSceneEntity;

pub struct RoomScene;

impl SceneBuilder for RoomScene {
    fn register(app: &mut App) {
        app.add_systems(
            OnEnter(crate::AppState::Room),
            (
                geometry::spawn_room_geometry,
                lighting::spawn_room_lighting,
                spawn_room_avatars,
            ),
        )
        .add_systems(OnExit(crate::AppState::Room), cleanup_room_scene);
    }
}

/// Places the user avatar on the left and the companion on the right. The
/// user's model comes from a previously imported reference when one is on
/// file, otherwise the bundled default.
fn spawn_room_avatars(mut commands: Commands, profile: Res<ProfileResource>) {
    let user_reference = profile
        .imported_avatar()
        .unwrap_or_else(|| AssetReference::new(DEFAULT_USER_MODEL_REFERENCE));
    info!("Spawning avatars (user model '{user_reference}')");

    let user = spawn_avatar(
        &mut commands,
        AvatarKind::User,
        USER_AVATAR_POSITION,
        Some(user_reference),
    );
    let companion = spawn_avatar(
        &mut commands,
        AvatarKind::Companion,
        COMPANION_AVATAR_POSITION,
        Some(AssetReference::new(COMPANION_MODEL_REFERENCE)),
    );
    commands.entity(user).insert(RoomSceneEntity);
    commands.entity(companion).insert(RoomSceneEntity);
}

fn cleanup_room_scene(mut commands: Commands, query: Query<Entity, With<RoomSceneEntity>>) {
    info!("Cleaning up room scene");
    for entity in &query {
        commands.entity(entity).try_despawn();
    }
}
