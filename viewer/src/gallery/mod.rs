pub mod frame;
pub mod interact;
pub mod wall;

pub use frame::{
    FrameHover, FrameSurface, FrameTexture, PhotoFrame, PhotoFrameParts, animate_frame_hover,
    apply_frame_textures, poll_frame_textures, request_frame_textures, slot_offset,
    spawn_photo_frame,
};
pub use interact::{PhotoSelected, report_photo_clicks, update_frame_hover};
pub use wall::{
    GalleryStatus, PHOTO_WALL_POSITION, PhotoWall, VISIBLE_SLOT_CAP, build_photo_wall_when_ready,
};
