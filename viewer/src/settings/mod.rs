use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode, WindowResolution};
use bevy::winit::{UpdateMode, WinitSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SETTINGS_FILE_PATH: &str = "./settings.yaml";

const RESOLUTION_PRESETS: [ResolutionSetting; 4] = [
    ResolutionSetting {
        width: 1280,
        height: 720,
    },
    ResolutionSetting {
        width: 1600,
        height: 900,
    },
    ResolutionSetting {
        width: 1920,
        height: 1080,
    },
    ResolutionSetting {
        width: 2560,
        height: 1440,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowModeSetting {
    Windowed,
    Fullscreen,
}

impl Default for WindowModeSetting {
    fn default() -> Self {
        Self::Windowed
    }
}

impl WindowModeSetting {
    pub const ALL: [Self; 2] = [Self::Windowed, Self::Fullscreen];

    pub fn next(self) -> Self {
        match self {
            Self::Windowed => Self::Fullscreen,
            Self::Fullscreen => Self::Windowed,
        }
    }

    pub fn to_bevy(self) -> WindowMode {
        match self {
            Self::Windowed => WindowMode::Windowed,
            Self::Fullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windowed => "Windowed",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsLimitSetting {
    Default60,
    Monitor,
    Unlimited,
}

impl Default for FpsLimitSetting {
    fn default() -> Self {
        Self::Default60
    }
}

impl FpsLimitSetting {
    pub const ALL: [Self; 3] = [Self::Default60, Self::Monitor, Self::Unlimited];

    pub fn next(self) -> Self {
        match self {
            Self::Default60 => Self::Monitor,
            Self::Monitor => Self::Unlimited,
            Self::Unlimited => Self::Default60,
        }
    }

    pub fn to_update_mode(self) -> UpdateMode {
        match self {
            Self::Default60 => UpdateMode::reactive(Duration::from_secs_f64(1.0 / 60.0)),
            Self::Monitor | Self::Unlimited => UpdateMode::Continuous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default60 => "60 FPS",
            Self::Monitor => "Monitor",
            Self::Unlimited => "Unlimited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSetting {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ResolutionSetting {
    pub fn presets() -> &'static [Self] {
        &RESOLUTION_PRESETS
    }

    pub fn next(self) -> Self {
        let index = RESOLUTION_PRESETS
            .iter()
            .position(|preset| *preset == self)
            .unwrap_or(0);
        RESOLUTION_PRESETS[(index + 1) % RESOLUTION_PRESETS.len()]
    }

    pub fn label(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub window_mode: WindowModeSetting,
    pub resolution: ResolutionSetting,
    pub vsync: bool,
    pub fps_limit: FpsLimitSetting,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeSetting::Windowed,
            resolution: ResolutionSetting::default(),
            vsync: true,
            fps_limit: FpsLimitSetting::Default60,
        }
    }
}

/// Orbit-camera tuning. Distances are world units from the orbit target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_distance: 10.0,
            damping: 0.05,
        }
    }
}

impl CameraSettings {
    /// Returns a copy with the bounds ordered and the damping factor kept
    /// inside (0, 1]. Malformed hand-edited files fall back to usable values.
    pub fn sanitized(self) -> Self {
        let min_distance = self.min_distance.max(0.1);
        let max_distance = self.max_distance.max(min_distance);
        let damping = if self.damping.is_finite() && self.damping > 0.0 {
            self.damping.min(1.0)
        } else {
            CameraSettings::default().damping
        };
        Self {
            min_distance,
            max_distance,
            damping,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct ViewerSettings {
    pub graphics: GraphicsSettings,
    pub camera: CameraSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            graphics: GraphicsSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
}

#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: ViewerSettings,
    path: PathBuf,
}

impl SettingsResource {
    pub fn new(current: ViewerSettings) -> Self {
        Self {
            current,
            path: PathBuf::from(SETTINGS_FILE_PATH),
        }
    }

    pub fn save_to_disk(&self) -> Result<(), SettingsIoError> {
        write_settings_to_path(&self.current, &self.path)
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_runtime_settings);
    }
}

pub fn load_settings_or_default() -> ViewerSettings {
    let path = Path::new(SETTINGS_FILE_PATH);

    if !path.exists() {
        return ViewerSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                SETTINGS_FILE_PATH, error
            );
            ViewerSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(settings: &ViewerSettings) -> Result<(), SettingsIoError> {
    let path = Path::new(SETTINGS_FILE_PATH);
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

pub fn present_mode_for(graphics: &GraphicsSettings) -> PresentMode {
    if matches!(graphics.fps_limit, FpsLimitSetting::Unlimited) {
        PresentMode::AutoNoVsync
    } else if graphics.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    }
}

fn load_settings_from_path(path: &Path) -> Result<ViewerSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    serde_yaml::from_str::<ViewerSettings>(&raw).map_err(SettingsIoError::Deserialize)
}

fn write_settings_to_path(settings: &ViewerSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

fn apply_runtime_settings(
    settings: Res<SettingsResource>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut winit_settings: ResMut<WinitSettings>,
    mut last_applied: Local<Option<ViewerSettings>>,
) {
    if last_applied.as_ref() == Some(&settings.current) {
        return;
    }

    if let Ok(mut window) = windows.single_mut() {
        let target_mode = settings.current.graphics.window_mode.to_bevy();
        window.mode = target_mode;

        // In borderless fullscreen, forcing a custom logical resolution can
        // produce a top-left viewport offset. Keep monitor/native size there.
        if matches!(target_mode, WindowMode::Windowed) {
            window.resolution = WindowResolution::new(
                settings.current.graphics.resolution.width,
                settings.current.graphics.resolution.height,
            );
        }

        window.present_mode = present_mode_for(&settings.current.graphics);
    }

    let update_mode = settings.current.graphics.fps_limit.to_update_mode();
    winit_settings.focused_mode = update_mode;
    winit_settings.unfocused_mode = update_mode;

    *last_applied = Some(settings.current.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_through_yaml() {
        let mut settings = ViewerSettings::default();
        settings.graphics.window_mode = WindowModeSetting::Fullscreen;
        settings.graphics.vsync = false;
        settings.camera.max_distance = 14.0;

        let encoded = serde_yaml::to_string(&settings).unwrap();
        let decoded: ViewerSettings = serde_yaml::from_str(&encoded).unwrap();

        assert_eq!(decoded, settings);
    }

    #[test]
    fn partial_yaml_fills_missing_fields_with_defaults() {
        let decoded: ViewerSettings =
            serde_yaml::from_str("graphics:\n  vsync: false\n").unwrap();

        assert!(!decoded.graphics.vsync);
        assert_eq!(decoded.graphics.resolution, ResolutionSetting::default());
        assert_eq!(decoded.camera, CameraSettings::default());
    }

    #[test]
    fn camera_settings_sanitize_reorders_bounds() {
        let fixed = CameraSettings {
            min_distance: 9.0,
            max_distance: 3.0,
            damping: 0.0,
        }
        .sanitized();

        assert!(fixed.min_distance <= fixed.max_distance);
        assert!(fixed.damping > 0.0 && fixed.damping <= 1.0);
    }

    #[test]
    fn unlimited_fps_never_requests_vsync() {
        let graphics = GraphicsSettings {
            vsync: true,
            fps_limit: FpsLimitSetting::Unlimited,
            ..GraphicsSettings::default()
        };

        assert_eq!(present_mode_for(&graphics), PresentMode::AutoNoVsync);
    }
}
