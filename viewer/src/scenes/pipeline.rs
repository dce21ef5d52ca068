use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RoomPipelineSet {
    AssetLoad,
    WorldSpawn,
    Behavior,
    Interaction,
    Camera,
}
