//! Room lighting: warm ambient fill, one shadow-casting key light and a
//! shadowless point fill opposite it so the back corner never reads black.

use bevy::light::{CascadeShadowConfigBuilder, GlobalAmbientLight};
use bevy::prelude::*;

use super::RoomSceneEntity;

const AMBIENT_COLOR: Color = Color::srgb(1.0, 0.98, 0.94);
const AMBIENT_BRIGHTNESS: f32 = 300.0;
const KEY_LIGHT_ILLUMINANCE: f32 = 5_000.0;
const FILL_LIGHT_INTENSITY: f32 = 150_000.0;

#[derive(Component)]
pub struct RoomKeyLight;

pub fn spawn_room_lighting(mut commands: Commands, mut ambient: ResMut<GlobalAmbientLight>) {
    ambient.color = AMBIENT_COLOR;
    ambient.brightness = AMBIENT_BRIGHTNESS;
    ambient.affects_lightmapped_meshes = true;

    commands.spawn((
        RoomSceneEntity,
        RoomKeyLight,
        DirectionalLight {
            color: Color::srgb(1.0, 0.98, 0.94),
            illuminance: KEY_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        CascadeShadowConfigBuilder {
            num_cascades: 1,
            minimum_distance: 0.1,
            maximum_distance: 40.0,
            first_cascade_far_bound: 40.0,
            overlap_proportion: 0.15,
        }
        .build(),
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        Visibility::default(),
    ));

    commands.spawn((
        RoomSceneEntity,
        PointLight {
            color: Color::srgb(0.9, 0.94, 1.0),
            intensity: FILL_LIGHT_INTENSITY,
            range: 20.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-5.0, 3.0, -5.0),
        Visibility::default(),
    ));
}
