#![allow(clippy::type_complexity)]

//! 3D memory room viewer: a small Bevy app that composes a furnished room,
//! two animated avatars and a photo gallery wall from a JSON photo manifest,
//! and drives the Ready Player Me avatar import handshake.

pub mod app;
pub mod assets;
pub mod avatar;
pub mod composition;
pub mod gallery;
pub mod importer;
pub mod profile;
pub mod scenes;
pub mod settings;
pub mod ui;

pub use app::state::AppState;
