/// Top level application state.
///
/// The viewer boots into `Loading` until the photo manifest has settled
/// (loaded or failed), then enters the room and stays there.
#[derive(bevy::prelude::States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Loading,
    Room,
}
