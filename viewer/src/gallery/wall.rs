//! The photo wall: one frame per visible library record, arranged on a
//! 3-column grid centered on the back wall.

use bevy::prelude::*;

use super::frame::spawn_photo_frame;
use crate::assets::{PhotoLibrary, PhotoLibraryState};
use crate::avatar::placeholder::PlaceholderAssets;
use crate::scenes::room::RoomSceneEntity;

pub const PHOTO_WALL_POSITION: Vec3 = Vec3::new(0.0, 2.0, -4.8);
pub const VISIBLE_SLOT_CAP: usize = 6;

/// Marks the wall group entity that frames hang under.
#[derive(Component)]
pub struct PhotoWall;

/// What the gallery ended up showing, for the HUD.
#[derive(Resource, Default)]
pub struct GalleryStatus {
    pub total_records: usize,
    pub visible: usize,
}

/// Builds the wall once the photo library has settled. Only the first
/// `VISIBLE_SLOT_CAP` records get a frame; the rest are ignored with a
/// warning. Runs again after a scene teardown since the wall entity is
/// gone by then.
pub fn build_photo_wall_when_ready(
    mut commands: Commands,
    library_state: Res<PhotoLibraryState>,
    libraries: Res<Assets<PhotoLibrary>>,
    mut cache: ResMut<PlaceholderAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut status: ResMut<GalleryStatus>,
    walls: Query<(), With<PhotoWall>>,
) {
    if !walls.is_empty() || !library_state.is_settled() {
        return;
    }

    let records = library_state.records(&libraries);
    status.total_records = records.len();
    status.visible = records.len().min(VISIBLE_SLOT_CAP);
    if records.len() > VISIBLE_SLOT_CAP {
        warn!(
            "Photo library holds {} photos; showing the first {} and ignoring {}",
            records.len(),
            VISIBLE_SLOT_CAP,
            records.len() - VISIBLE_SLOT_CAP
        );
    }

    let wall = commands
        .spawn((
            PhotoWall,
            RoomSceneEntity,
            Transform::from_translation(PHOTO_WALL_POSITION),
            Visibility::default(),
        ))
        .id();
    for (slot, record) in records.iter().take(VISIBLE_SLOT_CAP).enumerate() {
        let frame = spawn_photo_frame(
            &mut commands,
            &mut cache,
            &mut meshes,
            &mut materials,
            record.clone(),
            slot,
        );
        commands.entity(wall).add_child(frame);
    }
    info!("Photo wall built with {} of {} photos", status.visible, status.total_records);
}
