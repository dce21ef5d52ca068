//! The photo manifest. A read-only JSON document under the asset root lists
//! the photos hung on the gallery wall; the room renders whatever subset of
//! it resolves and never writes back.

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, AsyncReadExt, LoadContext};
use bevy::prelude::*;
use protocol::AssetReference;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tracker::{AssetLoadState, LoadTransition};

pub const PHOTO_LIBRARY_FILE: &str = "photo_library.json";

/// Environment override for the manifest path, resolved against the asset root.
pub const PHOTO_LIBRARY_PATH_ENV: &str = "MEMORY_ROOM_LIBRARY";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub asset_reference: Option<AssetReference>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Asset, TypePath, Serialize, Deserialize, Clone, Debug, Default)]
pub struct PhotoLibrary {
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

#[derive(Default)]
pub struct PhotoLibraryLoader;

#[derive(Debug, Error)]
pub enum PhotoLibraryLoaderError {
    #[error("Could not read photo library: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse photo library: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssetLoader for PhotoLibraryLoader {
    type Asset = PhotoLibrary;
    type Settings = ();
    type Error = PhotoLibraryLoaderError;

    async fn load<'a>(
        &'a self,
        reader: &'a mut Reader<'_>,
        _settings: &'a (),
        _load_context: &'a mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let library = serde_json::from_slice::<PhotoLibrary>(&bytes)?;
        Ok(library)
    }

    fn extensions(&self) -> &[&str] {
        &[PHOTO_LIBRARY_FILE]
    }
}

/// Tracks the manifest load. An unavailable manifest settles as an empty
/// library rather than blocking room construction.
#[derive(Resource, Default)]
pub struct PhotoLibraryState {
    pub load: AssetLoadState<PhotoLibrary>,
}

impl PhotoLibraryState {
    pub fn is_settled(&self) -> bool {
        self.load.is_settled()
    }

    /// Records to hang, empty when the manifest is absent or broken.
    pub fn records<'a>(&self, libraries: &'a Assets<PhotoLibrary>) -> &'a [PhotoRecord] {
        self.load
            .ready_handle()
            .and_then(|handle| libraries.get(handle))
            .map(|library| library.photos.as_slice())
            .unwrap_or(&[])
    }
}

pub fn photo_library_path() -> String {
    std::env::var(PHOTO_LIBRARY_PATH_ENV).unwrap_or_else(|_| PHOTO_LIBRARY_FILE.to_string())
}

pub struct PhotoLibraryPlugin;

impl Plugin for PhotoLibraryPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<PhotoLibrary>()
            .init_asset_loader::<PhotoLibraryLoader>()
            .init_resource::<PhotoLibraryState>()
            .add_systems(Startup, request_photo_library)
            .add_systems(Update, poll_photo_library);
    }
}

fn request_photo_library(mut state: ResMut<PhotoLibraryState>, asset_server: Res<AssetServer>) {
    let path = photo_library_path();
    info!("Loading photo library from '{path}'");
    state.load = AssetLoadState::begin(asset_server.load(path));
}

fn poll_photo_library(mut state: ResMut<PhotoLibraryState>, asset_server: Res<AssetServer>) {
    if state.load.is_settled() {
        return;
    }

    match state.load.poll(&asset_server) {
        Some(LoadTransition::Ready) => info!("Photo library loaded"),
        Some(LoadTransition::Failed(failure)) => {
            warn!("Photo library unavailable ({failure}); continuing with an empty library");
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_records_use_camel_case_keys() {
        let raw = r#"{
            "photos": [
                {
                    "id": "p1",
                    "displayName": "Beach day",
                    "assetReference": "photos/beach.png",
                    "createdAt": "2024-06-01"
                },
                {
                    "id": "p2",
                    "displayName": "Still empty",
                    "assetReference": null
                }
            ]
        }"#;

        let library: PhotoLibrary = serde_json::from_str(raw).unwrap();

        assert_eq!(library.photos.len(), 2);
        assert_eq!(library.photos[0].display_name, "Beach day");
        assert_eq!(
            library.photos[0].asset_reference.as_ref().map(|r| r.as_str()),
            Some("photos/beach.png")
        );
        assert!(library.photos[1].asset_reference.is_none());
        assert!(library.photos[1].created_at.is_none());
    }

    #[test]
    fn empty_document_parses_to_empty_library() {
        let library: PhotoLibrary = serde_json::from_str("{}").unwrap();
        assert!(library.photos.is_empty());
    }

    #[test]
    fn default_state_reports_no_records() {
        let state = PhotoLibraryState::default();
        let libraries = Assets::<PhotoLibrary>::default();
        assert!(state.records(&libraries).is_empty());
    }
}
