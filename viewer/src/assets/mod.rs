pub mod library;
pub mod tracker;

pub use library::{
    PhotoLibrary, PhotoLibraryPlugin, PhotoLibraryState, PhotoRecord, photo_library_path,
};
pub use tracker::{AssetFailure, AssetLoadState, LoadTransition};
