use super::SceneBuilder;
use crate::assets::PhotoLibraryState;
use bevy::prelude::*;
use bevy::state::prelude::{NextState, OnEnter, OnExit, in_state};

const LOADING_TIMEOUT_SECS: f32 = 5.0;

#[derive(Resource)]
struct LoadingTimeout(Timer);

pub struct LoadingScene;

impl SceneBuilder for LoadingScene {
    fn register(app: &mut App) {
        app.add_systems(OnEnter(crate::AppState::Loading), start_loading_timeout)
            .add_systems(
                Update,
                advance_to_room_when_ready.run_if(in_state(crate::AppState::Loading)),
            )
            .add_systems(OnExit(crate::AppState::Loading), clear_loading_timeout);
    }
}

fn start_loading_timeout(mut commands: Commands) {
    commands.insert_resource(LoadingTimeout(Timer::from_seconds(
        LOADING_TIMEOUT_SECS,
        TimerMode::Once,
    )));
}

/// Enters the room as soon as the photo library settles, or after the
/// timeout if it never does. The gallery catches up on its own once the
/// library arrives late.
fn advance_to_room_when_ready(
    time: Res<Time>,
    library: Res<PhotoLibraryState>,
    mut timeout: ResMut<LoadingTimeout>,
    mut next_state: ResMut<NextState<crate::AppState>>,
) {
    let timed_out = timeout.0.tick(time.delta()).just_finished();
    if library.is_settled() {
        next_state.set(crate::AppState::Room);
    } else if timed_out {
        warn!(
            "Photo library still pending after {LOADING_TIMEOUT_SECS}s; entering the room anyway"
        );
        next_state.set(crate::AppState::Room);
    }
}

fn clear_loading_timeout(mut commands: Commands) {
    commands.remove_resource::<LoadingTimeout>();
}
