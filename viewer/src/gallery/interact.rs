//! Pointer interaction with photo frames: cursor-ray picking for hover and
//! left-click selection. Selection is reported as a message; nothing here
//! touches the photo records themselves.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::frame::{FrameHover, PHOTO_HALF_EXTENT, PhotoFrame};
use crate::assets::PhotoRecord;
use crate::scenes::room::camera::RoomCamera;
use crate::ui::UiPointerCapture;

/// A photo frame was clicked. Carries the full record so consumers need no
/// second lookup.
#[derive(Message, Clone)]
pub struct PhotoSelected {
    pub record: PhotoRecord,
}

/// Casts the cursor ray against every frame's photo plane and flags the
/// nearest hit as hovered. Pointer capture by the overlay UI clears all
/// hover so frames behind dialogs never react.
pub fn update_frame_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<RoomCamera>>,
    pointer_capture: Res<UiPointerCapture>,
    mut frames: Query<(Entity, &GlobalTransform, &mut FrameHover)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let hovered_frame = window
        .cursor_position()
        .filter(|_| !pointer_capture.captured)
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor).ok())
        .and_then(|ray| pick_nearest_frame(ray, frames.iter().map(|(e, t, _)| (e, t))));

    for (entity, _, mut hover) in &mut frames {
        let hovered = hovered_frame == Some(entity);
        if hover.hovered != hovered {
            hover.hovered = hovered;
        }
    }
}

/// Nearest frame whose photo plane the ray crosses inside the photo's
/// bounds, if any.
fn pick_nearest_frame<'a>(
    ray: Ray3d,
    frames: impl Iterator<Item = (Entity, &'a GlobalTransform)>,
) -> Option<Entity> {
    let mut nearest: Option<(Entity, f32)> = None;
    for (entity, transform) in frames {
        let origin = transform.translation();
        let normal = *transform.back();
        let denominator = ray.direction.dot(normal);
        if denominator.abs() < 1e-6 {
            continue;
        }
        let t = (origin - ray.origin).dot(normal) / denominator;
        if t <= 0.0 {
            continue;
        }
        let local = ray.origin + *ray.direction * t - origin;
        let x = local.dot(*transform.right());
        let y = local.dot(*transform.up());
        if x.abs() > PHOTO_HALF_EXTENT || y.abs() > PHOTO_HALF_EXTENT {
            continue;
        }
        if nearest.is_none_or(|(_, best)| t < best) {
            nearest = Some((entity, t));
        }
    }
    nearest.map(|(entity, _)| entity)
}

/// Reports a left click on the hovered frame. Clicks the overlay UI has
/// already claimed are ignored.
pub fn report_photo_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    pointer_capture: Res<UiPointerCapture>,
    frames: Query<(&PhotoFrame, &FrameHover)>,
    mut selections: MessageWriter<PhotoSelected>,
) {
    if !buttons.just_pressed(MouseButton::Left) || pointer_capture.captured {
        return;
    }
    for (frame, hover) in &frames {
        if hover.hovered {
            info!("Photo '{}' selected", frame.record.display_name);
            selections.write(PhotoSelected {
                record: frame.record.clone(),
            });
        }
    }
}
