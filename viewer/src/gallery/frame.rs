//! Photo frame entities: wooden chrome around a 1x1 photo surface. The
//! surface shows a neutral placeholder until the texture load settles and
//! keeps it forever if the load fails, so the grid never shifts.

use bevy::mesh::Mesh3d;
use bevy::pbr::MeshMaterial3d;
use bevy::prelude::*;

use crate::assets::{AssetLoadState, LoadTransition, PhotoRecord};
use crate::avatar::placeholder::{
    PartShape, PlaceholderAssets, frame_chrome_material, photo_surface_placeholder_material,
};

pub const FRAME_COLUMNS: usize = 3;
pub const FRAME_CELL_WIDTH: f32 = 1.5;
pub const FRAME_CELL_HEIGHT: f32 = 1.2;
pub const PHOTO_SURFACE_BASE_Z: f32 = 0.03;
pub const PHOTO_HALF_EXTENT: f32 = 0.5;

const HOVER_FLOAT_AMPLITUDE: f32 = 0.05;
const HOVER_FLOAT_FREQUENCY: f32 = 2.0;
const HOVER_SCALE: f32 = 1.05;

/// Grid offset for a visible slot, local to the wall group. Rows stack
/// upward from the wall's center line.
pub fn slot_offset(slot: usize) -> Vec3 {
    let column = slot % FRAME_COLUMNS;
    let row = slot / FRAME_COLUMNS;
    Vec3::new(
        column as f32 * FRAME_CELL_WIDTH - FRAME_CELL_WIDTH,
        row as f32 * FRAME_CELL_HEIGHT,
        0.0,
    )
}

/// A mounted photo: the record it displays and which visible slot it fills.
#[derive(Component)]
pub struct PhotoFrame {
    pub record: PhotoRecord,
    pub slot: usize,
}

/// Texture lifecycle for a frame's photo surface.
#[derive(Component, Default)]
pub struct FrameTexture {
    pub load: AssetLoadState<Image>,
    requested: bool,
}

/// Pointer hover flag, written by the interaction pass.
#[derive(Component, Default)]
pub struct FrameHover {
    pub hovered: bool,
}

/// Marks the photo quad child of a frame.
#[derive(Component)]
pub struct FrameSurface;

/// Child lookup so frame systems can reach the surface without walking
/// the hierarchy.
#[derive(Component)]
pub struct PhotoFrameParts {
    pub surface: Entity,
}

/// Spawns a frame for `record` in `slot`, returning the frame root. The
/// root carries the chrome box; the photo surface hangs just in front.
pub fn spawn_photo_frame(
    commands: &mut Commands,
    cache: &mut PlaceholderAssets,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    record: PhotoRecord,
    slot: usize,
) -> Entity {
    let surface = commands
        .spawn((
            FrameSurface,
            Mesh3d(cache.mesh(meshes, PartShape::PhotoSurface)),
            MeshMaterial3d(photo_surface_placeholder_material(cache, materials)),
            Transform::from_xyz(0.0, 0.0, PHOTO_SURFACE_BASE_Z),
            Visibility::default(),
        ))
        .id();

    let frame = commands
        .spawn((
            PhotoFrame { record, slot },
            FrameTexture::default(),
            FrameHover::default(),
            PhotoFrameParts { surface },
            Mesh3d(cache.mesh(meshes, PartShape::FrameChrome)),
            MeshMaterial3d(frame_chrome_material(cache, materials)),
            Transform::from_translation(slot_offset(slot)),
            Visibility::default(),
        ))
        .id();
    commands.entity(frame).add_child(surface);
    frame
}

/// Issues texture loads for frames that have not requested one yet. A
/// record without an asset reference settles as `Missing` and keeps the
/// neutral surface.
pub fn request_frame_textures(
    asset_server: Res<AssetServer>,
    mut frames: Query<(&PhotoFrame, &mut FrameTexture)>,
) {
    for (frame, mut texture) in &mut frames {
        if texture.requested {
            continue;
        }
        match frame.record.asset_reference.clone() {
            Some(reference) => {
                info!(
                    "Loading photo '{}' texture '{}'",
                    frame.record.display_name, reference
                );
                texture.load =
                    AssetLoadState::begin(asset_server.load(reference.as_str().to_string()));
            }
            None => {
                texture.load = AssetLoadState::Missing;
            }
        }
        texture.requested = true;
    }
}

/// Settles pending texture loads.
pub fn poll_frame_textures(
    asset_server: Res<AssetServer>,
    mut frames: Query<(&PhotoFrame, &mut FrameTexture)>,
) {
    for (frame, mut texture) in &mut frames {
        if !texture.load.is_pending() {
            continue;
        }
        match texture.load.poll(&asset_server) {
            Some(LoadTransition::Ready) => {
                info!("Photo '{}' texture ready", frame.record.display_name);
            }
            Some(LoadTransition::Failed(failure)) => {
                warn!(
                    "Photo '{}' texture failed to load: {failure}",
                    frame.record.display_name
                );
            }
            None => {}
        }
    }
}

/// Swaps a frame's surface material to the loaded photo texture. Runs off
/// change detection, so the swap happens exactly once per settled load.
pub fn apply_frame_textures(
    mut materials: ResMut<Assets<StandardMaterial>>,
    frames: Query<(&FrameTexture, &PhotoFrameParts), Changed<FrameTexture>>,
    mut surfaces: Query<&mut MeshMaterial3d<StandardMaterial>, With<FrameSurface>>,
) {
    for (texture, parts) in &frames {
        let Some(image) = texture.load.ready_handle() else {
            continue;
        };
        let Ok(mut surface_material) = surfaces.get_mut(parts.surface) else {
            continue;
        };
        surface_material.0 = materials.add(StandardMaterial {
            base_color_texture: Some(image.clone()),
            perceptual_roughness: 0.9,
            ..default()
        });
    }
}

/// Floats and enlarges the photo surface while hovered. The offset is a
/// pure function of elapsed time, and unhovering snaps straight back to
/// the resting pose.
pub fn animate_frame_hover(
    time: Res<Time>,
    frames: Query<(&FrameHover, &PhotoFrameParts)>,
    mut surfaces: Query<&mut Transform, With<FrameSurface>>,
) {
    for (hover, parts) in &frames {
        let Ok(mut transform) = surfaces.get_mut(parts.surface) else {
            continue;
        };
        if hover.hovered {
            transform.translation.z = PHOTO_SURFACE_BASE_Z
                + (time.elapsed_secs() * HOVER_FLOAT_FREQUENCY).sin() * HOVER_FLOAT_AMPLITUDE;
            transform.scale = Vec3::splat(HOVER_SCALE);
        } else if transform.translation.z != PHOTO_SURFACE_BASE_Z || transform.scale != Vec3::ONE {
            transform.translation.z = PHOTO_SURFACE_BASE_Z;
            transform.scale = Vec3::ONE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_form_a_three_column_grid() {
        assert_eq!(slot_offset(0), Vec3::new(-1.5, 0.0, 0.0));
        assert_eq!(slot_offset(1), Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(slot_offset(2), Vec3::new(1.5, 0.0, 0.0));
        assert_eq!(slot_offset(3), Vec3::new(-1.5, 1.2, 0.0));
        assert_eq!(slot_offset(5), Vec3::new(1.5, 1.2, 0.0));
    }

    #[test]
    fn second_row_sits_above_the_first() {
        assert!(slot_offset(4).y > slot_offset(1).y);
    }
}
