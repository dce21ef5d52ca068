use bevy::prelude::App;

use crate::composition::viewer_runtime::configure_viewer_app;
use crate::settings::{self, ViewerSettings};

pub fn run_viewer_app() {
    let startup_settings = load_startup_settings();
    let mut app = App::new();
    configure_viewer_app(&mut app, &startup_settings);
    app.run();
}

fn load_startup_settings() -> ViewerSettings {
    let startup_settings = settings::load_settings_or_default();
    if let Err(error) = settings::ensure_settings_file_exists(&startup_settings) {
        eprintln!(
            "Failed to ensure startup settings file '{}': {}",
            settings::SETTINGS_FILE_PATH,
            error
        );
    }
    startup_settings
}
