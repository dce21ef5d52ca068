//! The orbit camera: left-drag rotates, right-drag pans, scroll zooms, all
//! damped toward goal values. Pitch and distance bounds keep the view above
//! the floor and inside a sensible range of the room.

use bevy::camera::{Camera, Camera3d, ClearColorConfig, PerspectiveProjection, Projection};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::settings::SettingsResource;
use crate::ui::UiPointerCapture;

pub const CAMERA_START_EYE: Vec3 = Vec3::new(0.0, 1.6, 5.0);
pub const CAMERA_START_TARGET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const CAMERA_FOV_DEGREES: f32 = 75.0;
const ROOM_CLEAR_COLOR: Color = Color::srgb(0.102, 0.102, 0.18);

const MIN_PITCH: f32 = 0.02;
const MAX_PITCH: f32 = FRAC_PI_2 - 0.03;
const PAN_BOUND_XZ: f32 = 4.5;
const PAN_BOUND_Y_MIN: f32 = 0.2;
const PAN_BOUND_Y_MAX: f32 = 4.5;

const ROTATE_SENSITIVITY: f32 = 0.005;
const PAN_SENSITIVITY: f32 = 0.002;
const ZOOM_SENSITIVITY: f32 = 0.1;

#[derive(Component)]
pub struct RoomCamera;

/// Spherical orbit state around a pan target. `goal_*` fields take input
/// directly; the rendered pose chases them with damping.
#[derive(Component)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub goal_target: Vec3,
    pub yaw: f32,
    pub goal_yaw: f32,
    pub pitch: f32,
    pub goal_pitch: f32,
    pub distance: f32,
    pub goal_distance: f32,
}

impl OrbitCamera {
    pub fn from_eye_target(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-4);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).asin();
        Self {
            target,
            goal_target: target,
            yaw,
            goal_yaw: yaw,
            pitch,
            goal_pitch: pitch,
            distance,
            goal_distance: distance,
        }
    }

    /// World-space eye position for the current (damped) orbit state.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }
}

/// Spawned once at startup; the camera survives scene changes so overlay
/// rendering works on the loading screen too.
pub fn spawn_room_camera(mut commands: Commands) {
    commands.spawn((
        RoomCamera,
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(ROOM_CLEAR_COLOR),
            ..default()
        },
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        OrbitCamera::from_eye_target(CAMERA_START_EYE, CAMERA_START_TARGET),
        Transform::from_translation(CAMERA_START_EYE).looking_at(CAMERA_START_TARGET, Vec3::Y),
    ));
}

/// Feeds mouse input into the orbit goals. Input the overlay UI has claimed
/// is ignored entirely.
pub fn orbit_camera_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    pointer_capture: Res<UiPointerCapture>,
    settings: Res<SettingsResource>,
    mut cameras: Query<&mut OrbitCamera, With<RoomCamera>>,
) {
    let Ok(mut orbit) = cameras.single_mut() else {
        return;
    };
    if pointer_capture.captured {
        return;
    }

    let camera_settings = settings.current.camera.sanitized();

    if buttons.pressed(MouseButton::Left) {
        let delta = mouse_motion.delta;
        orbit.goal_yaw -= delta.x * ROTATE_SENSITIVITY;
        orbit.goal_pitch =
            (orbit.goal_pitch + delta.y * ROTATE_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
    }

    if buttons.pressed(MouseButton::Right) {
        let delta = mouse_motion.delta;
        let right = Vec3::new(orbit.goal_yaw.cos(), 0.0, -orbit.goal_yaw.sin());
        let pan_scale = PAN_SENSITIVITY * orbit.goal_distance;
        orbit.goal_target -= right * (delta.x * pan_scale);
        orbit.goal_target += Vec3::Y * (delta.y * pan_scale);
        orbit.goal_target.x = orbit.goal_target.x.clamp(-PAN_BOUND_XZ, PAN_BOUND_XZ);
        orbit.goal_target.y = orbit.goal_target.y.clamp(PAN_BOUND_Y_MIN, PAN_BOUND_Y_MAX);
        orbit.goal_target.z = orbit.goal_target.z.clamp(-PAN_BOUND_XZ, PAN_BOUND_XZ);
    }

    let scroll = mouse_scroll.delta.y;
    if scroll != 0.0 {
        orbit.goal_distance = (orbit.goal_distance * (1.0 - scroll * ZOOM_SENSITIVITY))
            .clamp(camera_settings.min_distance, camera_settings.max_distance);
    }
}

/// Damps the orbit state toward its goals and writes the camera transform.
pub fn apply_orbit_camera(
    time: Res<Time>,
    settings: Res<SettingsResource>,
    mut cameras: Query<(&mut OrbitCamera, &mut Transform), With<RoomCamera>>,
) {
    let Ok((mut orbit, mut transform)) = cameras.single_mut() else {
        return;
    };

    let damping = settings.current.camera.sanitized().damping;
    let blend = (time.delta_secs() * 60.0 * damping).clamp(0.0, 1.0);

    orbit.yaw += (orbit.goal_yaw - orbit.yaw) * blend;
    orbit.pitch += (orbit.goal_pitch - orbit.pitch) * blend;
    orbit.distance += (orbit.goal_distance - orbit.distance) * blend;
    orbit.target = orbit.target.lerp(orbit.goal_target, blend);

    let eye = orbit.eye();
    *transform = Transform::from_translation(eye).looking_at(orbit.target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_state_reproduces_the_starting_eye() {
        let orbit = OrbitCamera::from_eye_target(CAMERA_START_EYE, CAMERA_START_TARGET);
        let eye = orbit.eye();
        assert!((eye - CAMERA_START_EYE).length() < 1e-4, "eye drifted to {eye:?}");
    }

    #[test]
    fn orbit_round_trips_an_off_axis_pose() {
        let eye = Vec3::new(3.0, 2.5, -1.0);
        let target = Vec3::new(0.5, 1.0, 0.5);
        let orbit = OrbitCamera::from_eye_target(eye, target);
        assert!((orbit.eye() - eye).length() < 1e-4);
        assert!((orbit.distance - (eye - target).length()).abs() < 1e-4);
    }
}
